// SPDX-License-Identifier: BSD-3-Clause
//! The per-instruction trace stream.

use tracing::debug;

use crate::ir::instruction::Opcode;
use crate::ir::{Instruction, Name, OperandRef, Terminator, Type};
use crate::record;
use crate::sink::Sinks;

use super::names::{FunctionIndex, ValueNamer};
use super::transmitter;
use super::Options;

/// Counters the CFG function summary reports about the trace pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceStats {
    pub inst_count: usize,
    pub tx_count: usize,
    pub emitted: usize,
    pub truncated: bool,
}

/// A uniform view over ordinary instructions and terminators; the trace
/// covers both.
#[derive(Clone, Copy)]
enum View<'f> {
    Inst(&'f Instruction),
    Term(&'f Terminator),
}

impl<'f> View<'f> {
    fn op_name(self) -> &'f str {
        match self {
            View::Inst(i) => i.opcode.name(),
            View::Term(t) => t.opcode.name(),
        }
    }

    fn result(self) -> Option<&'f Name> {
        match self {
            View::Inst(i) => i.result.as_ref(),
            View::Term(t) => t.result.as_ref(),
        }
    }

    fn ty(self) -> &'f Type {
        match self {
            View::Inst(i) => &i.ty,
            View::Term(t) => &t.ty,
        }
    }

    fn operands(self) -> Vec<OperandRef<'f>> {
        match self {
            View::Inst(i) => i.opcode.operands(),
            View::Term(t) => t.opcode.operands(),
        }
    }

    fn is_phi(self) -> bool {
        matches!(
            self,
            View::Inst(Instruction {
                opcode: Opcode::Phi(_),
                ..
            })
        )
    }

    fn tx(self) -> Option<record::Tx> {
        match self {
            View::Inst(i) => transmitter::of_instruction(&i.opcode),
            View::Term(t) => transmitter::of_terminator(&t.opcode),
        }
    }

    fn predicates(self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            View::Inst(i) => match &i.opcode {
                Opcode::ICmp(c) => (Some(c.predicate.name()), None),
                Opcode::FCmp(c) => (None, Some(c.predicate.name())),
                _ => (None, None),
            },
            View::Term(_) => (None, None),
        }
    }
}

/// Walk every instruction in program order, classify transmitters, and
/// stream trace (and trace-index) records subject to the per-function cap.
/// Counters keep accumulating after the cap is hit.
pub(crate) fn emit<'f>(
    ix: &FunctionIndex<'f>,
    namer: &mut ValueNamer<'f>,
    opts: &Options,
    sinks: &mut Sinks,
) -> TraceStats {
    let mut stats = TraceStats::default();
    for ord in 0..ix.len() {
        let block = ix.block(ord);
        let pps = ix.pps(ord);
        let views = block
            .instrs
            .iter()
            .map(View::Inst)
            .chain(std::iter::once(View::Term(&block.term)));
        for (idx, view) in views.enumerate() {
            let pp = &pps[idx];
            debug!("pp {} : {}", pp, view.op_name());
            let tx = view.tx();
            if let Some(tx) = tx {
                stats.tx_count += 1;
                debug!("tx {} at {} (operand {})", tx.kind.as_str(), pp, tx.which);
            }
            stats.inst_count += 1;

            if !sinks.trace.enabled() {
                continue;
            }
            if opts.max_inst != 0 && stats.emitted >= opts.max_inst as usize {
                stats.truncated = true;
                continue;
            }

            let def = view.result().map(|n| namer.local_id(n));
            let is_phi = view.is_phi();
            let mut uses = Vec::new();
            let mut use_tys = opts.trace_types.then(Vec::new);
            for op in view.operands() {
                match op {
                    OperandRef::Block(name) => {
                        if !is_phi {
                            continue;
                        }
                        let label = match ix.ordinal(name) {
                            Some(o) => ix.label(o).to_string(),
                            None => name.to_string(),
                        };
                        uses.push(label);
                        if let Some(tys) = &mut use_tys {
                            tys.push(Type::Label.to_string());
                        }
                    }
                    OperandRef::Value(v) => {
                        uses.push(namer.operand_id(v));
                        if let Some(tys) = &mut use_tys {
                            tys.push(v.ty().to_string());
                        }
                    }
                    OperandRef::Const(c) => {
                        uses.push(c.id());
                        if let Some(tys) = &mut use_tys {
                            tys.push(c.ty().to_string());
                        }
                    }
                }
            }
            let (icmp_pred, fcmp_pred) = view.predicates();

            sinks.trace.emit(&record::Trace {
                r#fn: ix.func.name.clone(),
                bb: ix.label(ord).to_string(),
                pp: pp.clone(),
                op: view.op_name().to_string(),
                def: def.clone(),
                uses,
                def_ty: opts
                    .trace_types
                    .then(|| view.result().map(|_| view.ty().to_string())),
                use_tys,
                icmp_pred,
                fcmp_pred,
                tx,
            });
            stats.emitted += 1;

            if sinks.trace_index.enabled() {
                sinks.trace_index.emit(&record::TraceIndex {
                    kind: "trace_index",
                    r#fn: ix.func.name.clone(),
                    bb: ix.label(ord).to_string(),
                    pp: pp.clone(),
                    op: view.op_name().to_string(),
                    def,
                    line: sinks.trace.lines(),
                });
            }
        }
    }
    stats
}
