// SPDX-License-Identifier: BSD-3-Clause
//! Function summary, block, and edge records on the CFG stream.

use crate::ir::terminator::TermOpcode;
use crate::record;
use crate::sink::Sink;

use super::names::{FunctionIndex, ValueNamer};
use super::trace::TraceStats;
use super::Options;

/// Emit the function summary, then one block record per block in IR
/// order, then the outgoing edges of every block.
pub(crate) fn emit<'f>(
    ix: &FunctionIndex<'f>,
    namer: &mut ValueNamer<'f>,
    stats: &TraceStats,
    opts: &Options,
    sink: &mut Sink,
) {
    sink.emit(&record::Cfg::FuncSummary {
        r#fn: ix.func.name.clone(),
        inst_count: stats.inst_count,
        bb_count: ix.len(),
        tx_count: stats.tx_count,
        trace_emitted: stats.emitted,
        trace_truncated: stats.truncated,
        trace_max_inst: opts.max_inst,
    });

    for ord in 0..ix.len() {
        let term = &ix.block(ord).term.opcode;
        let succs = term
            .successors()
            .into_iter()
            .filter_map(|n| ix.ordinal(n))
            .map(|o| ix.label(o).to_string())
            .collect();
        let (cond, target) = match term {
            TermOpcode::CondBr(b) => (Some(namer.operand_id(&b.condition)), None),
            TermOpcode::Switch(s) => (Some(namer.operand_id(&s.condition)), None),
            TermOpcode::IndirectBr(ib) => (None, Some(namer.operand_id(&ib.target))),
            TermOpcode::Ret(_)
            | TermOpcode::Br(_)
            | TermOpcode::Unreachable
            | TermOpcode::Other(_) => (None, None),
        };
        sink.emit(&record::Cfg::Block {
            r#fn: ix.func.name.clone(),
            bb: ix.label(ord).to_string(),
            succs,
            term_pp: ix.term_pp(ord).to_string(),
            term_op: term.name().to_string(),
            cond,
            target,
        });
    }

    for ord in 0..ix.len() {
        emit_edges(ix, namer, ord, sink);
    }
}

/// Everything an edge record shares regardless of branch kind.
struct EdgeSite {
    func: String,
    from: String,
    term_pp: String,
}

impl EdgeSite {
    fn record(
        &self,
        to: &str,
        branch: &'static str,
        cond: Option<String>,
        sense: Option<&'static str>,
        case_value: Option<String>,
        is_default: Option<bool>,
        target: Option<String>,
    ) -> record::Cfg {
        record::Cfg::Edge {
            r#fn: self.func.clone(),
            from: self.from.clone(),
            to: to.to_string(),
            term_pp: self.term_pp.clone(),
            branch,
            cond,
            sense,
            case_value,
            is_default,
            target,
        }
    }
}

/// One record per outgoing control-flow edge: conditional branches label
/// their edges with a sense, switches with a case value or the default
/// flag, indirect branches with the target ID. Terminators the CFG does
/// not branch on (returns, unreachable, everything else) emit nothing.
fn emit_edges<'f>(ix: &FunctionIndex<'f>, namer: &mut ValueNamer<'f>, ord: usize, sink: &mut Sink) {
    let site = EdgeSite {
        func: ix.func.name.clone(),
        from: ix.label(ord).to_string(),
        term_pp: ix.term_pp(ord).to_string(),
    };

    match &ix.block(ord).term.opcode {
        TermOpcode::Br(b) => {
            if let Some(to) = ix.ordinal(&b.dest) {
                sink.emit(&site.record(ix.label(to), "uncond", None, None, None, None, None));
            }
        }
        TermOpcode::CondBr(b) => {
            let cond = namer.operand_id(&b.condition);
            for (i, dest) in [&b.true_dest, &b.false_dest].into_iter().enumerate() {
                let Some(to) = ix.ordinal(dest) else { continue };
                sink.emit(&site.record(
                    ix.label(to),
                    "cond",
                    Some(cond.clone()),
                    Some(if i == 0 { "true" } else { "false" }),
                    None,
                    None,
                    None,
                ));
            }
        }
        TermOpcode::Switch(s) => {
            let cond = namer.operand_id(&s.condition);
            for case in &s.cases {
                let Some(to) = ix.ordinal(&case.dest) else { continue };
                sink.emit(&site.record(
                    ix.label(to),
                    "switch",
                    Some(cond.clone()),
                    None,
                    Some(case.value.id()),
                    None,
                    None,
                ));
            }
            if let Some(to) = s.default_dest.as_ref().and_then(|d| ix.ordinal(d)) {
                sink.emit(&site.record(
                    ix.label(to),
                    "switch",
                    Some(cond.clone()),
                    None,
                    None,
                    Some(true),
                    None,
                ));
            }
        }
        TermOpcode::IndirectBr(ib) => {
            let target = namer.operand_id(&ib.target);
            for dest in &ib.dests {
                let Some(to) = ix.ordinal(dest) else { continue };
                sink.emit(&site.record(
                    ix.label(to),
                    "indirect",
                    None,
                    None,
                    None,
                    None,
                    Some(target.clone()),
                ));
            }
        }
        TermOpcode::Ret(_) | TermOpcode::Unreachable | TermOpcode::Other(_) => (),
    }
}
