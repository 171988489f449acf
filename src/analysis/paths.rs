// SPDX-License-Identifier: BSD-3-Clause
//! Bounded depth-first path enumeration with constant-folded branch
//! pruning and path-condition construction.
//!
//! Enumeration is syntactic, not feasibility analysis: termination in the
//! presence of loops comes from the per-block revisit bound, and a branch
//! is only pruned when its controlling value is literally a constant.
//! The textual condition and the structured expression for a decision are
//! always derived together so the two forms cannot drift.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::ir::constant::Constant;
use crate::ir::terminator::{CondBr, IndirectBr, Switch, TermOpcode};
use crate::ir::{Name, Operand};
use crate::record::{self, CondExpr, Decision, DecisionKind};
use crate::sink::Sink;

use super::names::{FunctionIndex, ValueNamer};
use super::Options;

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    emitted: usize,
    next_path_id: usize,
    truncated: bool,
    cutoff_depth: bool,
    cutoff_loop: bool,
    const_pruned_br: u64,
    const_pruned_switch: u64,
    const_pruned_indirect: u64,
    dfs_calls: u64,
    dfs_leaves: u64,
    prune_max_paths: u64,
    prune_max_depth: u64,
    prune_loop: u64,
}

/// Enumerate paths from the entry block and emit one `path` record per
/// complete path, then `pp_coverage` records (when enabled) and the
/// closing `path_summary`. A zero path cap disables enumeration and emits
/// the degenerate summary only.
pub(crate) fn emit<'f>(
    ix: &FunctionIndex<'f>,
    namer: &mut ValueNamer<'f>,
    opts: &Options,
    sink: &mut Sink,
) {
    if opts.max_paths == 0 {
        sink.emit(&record::Cfg::PathSummary {
            r#fn: ix.func.name.clone(),
            paths_emitted: 0,
            disabled: Some(true),
            truncated: None,
            max_paths: opts.max_paths,
            max_depth: opts.max_path_depth,
            max_loop_iters: opts.max_loop_iters,
            cutoff_depth: None,
            cutoff_loop: None,
            const_pruned_br: None,
            const_pruned_switch: None,
            const_pruned_indirect: None,
            dfs_calls: None,
            dfs_leaves: None,
            dfs_prune_max_paths: None,
            dfs_prune_max_depth: None,
            dfs_prune_loop: None,
        });
        return;
    }

    let mut enumerator = Enumerator {
        ix,
        namer,
        opts,
        sink,
        path: Vec::new(),
        decisions: Vec::new(),
        conds: Vec::new(),
        cond_exprs: Vec::new(),
        visits: vec![0; ix.len()],
        pp_paths: IndexMap::new(),
        counters: Counters::default(),
    };
    if !ix.is_empty() {
        enumerator.dfs(0);
    }
    enumerator.finish();
}

struct Enumerator<'a, 'f> {
    ix: &'a FunctionIndex<'f>,
    namer: &'a mut ValueNamer<'f>,
    opts: &'a Options,
    sink: &'a mut Sink,
    /// Block ordinals on the current path.
    path: Vec<usize>,
    /// Parallel stacks, one entry per decision taken so far.
    decisions: Vec<Decision>,
    conds: Vec<String>,
    cond_exprs: Vec<CondExpr>,
    /// Times each block occurs on the current path.
    visits: Vec<u32>,
    /// pp -> ids of emitted paths crossing it, in first-seen order.
    pp_paths: IndexMap<&'a str, Vec<usize>>,
    counters: Counters,
}

impl<'a, 'f> Enumerator<'a, 'f> {
    fn dfs(&mut self, bb: usize) {
        self.counters.dfs_calls += 1;
        if self.counters.emitted >= self.opts.max_paths as usize {
            self.counters.truncated = true;
            self.counters.prune_max_paths += 1;
            return;
        }
        if self.path.len() >= self.opts.max_path_depth as usize {
            self.counters.cutoff_depth = true;
            self.counters.prune_max_depth += 1;
            return;
        }
        if self.visits[bb] > self.opts.max_loop_iters {
            self.counters.cutoff_loop = true;
            self.counters.prune_loop += 1;
            return;
        }

        self.visits[bb] += 1;
        self.path.push(bb);

        if self.ix.successors(bb).is_empty() {
            self.leaf();
        } else {
            match &self.ix.block(bb).term.opcode {
                TermOpcode::Br(b) => {
                    if let Some(next) = self.ix.ordinal(&b.dest) {
                        self.dfs(next);
                    }
                }
                TermOpcode::CondBr(b) => self.cond_br(bb, b),
                TermOpcode::Switch(s) => self.switch(bb, s),
                TermOpcode::IndirectBr(ib) => self.indirect(bb, ib),
                TermOpcode::Other(o) => {
                    for dest in &o.dests {
                        if let Some(next) = self.ix.ordinal(dest) {
                            self.dfs(next);
                        }
                    }
                }
                // Successor-free by definition, so unreachable here.
                TermOpcode::Ret(_) | TermOpcode::Unreachable => (),
            }
        }

        self.path.pop();
        self.visits[bb] -= 1;
    }

    fn cond_br(&mut self, bb: usize, br: &'f CondBr) {
        let cond_id = self.namer.operand_id(&br.condition);
        if let Some((_, value)) = br.condition.constant_int() {
            self.counters.const_pruned_br += 1;
            let (dest, sense) = if value != 0 {
                (&br.true_dest, true)
            } else {
                (&br.false_dest, false)
            };
            self.take_br_edge(bb, &cond_id, dest, sense);
        } else {
            self.take_br_edge(bb, &cond_id, &br.true_dest, true);
            self.take_br_edge(bb, &cond_id, &br.false_dest, false);
        }
    }

    fn take_br_edge(&mut self, bb: usize, cond_id: &str, dest: &'f Name, sense: bool) {
        let Some(next) = self.ix.ordinal(dest) else {
            return;
        };
        let rhs = if sense { "const:i1:1" } else { "const:i1:0" };
        let decision = Decision {
            pp: self.ix.term_pp(bb).to_string(),
            kind: DecisionKind::Br,
            succ: self.ix.label(next).to_string(),
            cond: Some(cond_id.to_string()),
            sense: Some(if sense { "true" } else { "false" }),
            case_value: None,
            is_default: None,
            target: None,
        };
        let text = format!("{}=={}", cond_id, rhs);
        let expr = CondExpr::eq(cond_id, rhs);
        self.take(decision, text, expr, next);
    }

    fn switch(&mut self, bb: usize, sw: &'f Switch) {
        let cond_id = self.namer.operand_id(&sw.condition);
        if let Some((bits, value)) = sw.condition.constant_int() {
            self.counters.const_pruned_switch += 1;
            let hit = sw.cases.iter().find(|c| {
                matches!(c.value, Constant::Int { bits: b, value: v } if b == bits && v == value)
            });
            if let Some(case) = hit {
                self.take_case_edge(bb, &cond_id, &case.value, &case.dest);
            } else if let Some(default) = &sw.default_dest {
                self.take_default_edge(bb, sw, &cond_id, default);
            }
            // No matching case and no default: this branch dead-ends.
        } else {
            for case in &sw.cases {
                self.take_case_edge(bb, &cond_id, &case.value, &case.dest);
            }
            if let Some(default) = &sw.default_dest {
                self.take_default_edge(bb, sw, &cond_id, default);
            }
        }
    }

    fn take_case_edge(&mut self, bb: usize, cond_id: &str, value: &Constant, dest: &'f Name) {
        let Some(next) = self.ix.ordinal(dest) else {
            return;
        };
        let case_id = value.id();
        let decision = Decision {
            pp: self.ix.term_pp(bb).to_string(),
            kind: DecisionKind::Switch,
            succ: self.ix.label(next).to_string(),
            cond: Some(cond_id.to_string()),
            sense: None,
            case_value: Some(case_id.clone()),
            is_default: None,
            target: None,
        };
        let text = format!("{}=={}", cond_id, case_id);
        let expr = CondExpr::eq(cond_id, case_id);
        self.take(decision, text, expr, next);
    }

    /// The default edge carries the conjunction of `cond != case` over all
    /// cases: textually joined with ` && `, structurally a single `!=`
    /// term or an `and` of them (`cond!=<any>` when there are no cases).
    fn take_default_edge(&mut self, bb: usize, sw: &'f Switch, cond_id: &str, default: &'f Name) {
        let Some(next) = self.ix.ordinal(default) else {
            return;
        };
        let case_ids: Vec<String> = sw.cases.iter().map(|c| c.value.id()).collect();
        let text = if case_ids.is_empty() {
            format!("{}!=<any>", cond_id)
        } else {
            case_ids
                .iter()
                .map(|id| format!("{}!={}", cond_id, id))
                .collect::<Vec<_>>()
                .join(" && ")
        };
        let mut terms: Vec<CondExpr> = case_ids
            .iter()
            .map(|id| CondExpr::ne(cond_id, id.clone()))
            .collect();
        let expr = match terms.len() {
            0 => CondExpr::ne(cond_id, "<any>"),
            1 => terms.remove(0),
            _ => CondExpr::and(terms),
        };
        let decision = Decision {
            pp: self.ix.term_pp(bb).to_string(),
            kind: DecisionKind::Switch,
            succ: self.ix.label(next).to_string(),
            cond: Some(cond_id.to_string()),
            sense: None,
            case_value: None,
            is_default: Some(true),
            target: None,
        };
        self.take(decision, text, expr, next);
    }

    fn indirect(&mut self, bb: usize, ib: &'f IndirectBr) {
        let target_id = self.namer.operand_id(&ib.target);
        if let Operand::Constant(Constant::BlockAddress { block }) = &ib.target {
            self.counters.const_pruned_indirect += 1;
            self.take_indirect_edge(bb, &target_id, block);
        } else {
            for dest in &ib.dests {
                self.take_indirect_edge(bb, &target_id, dest);
            }
        }
    }

    fn take_indirect_edge(&mut self, bb: usize, target_id: &str, dest: &'f Name) {
        let Some(next) = self.ix.ordinal(dest) else {
            return;
        };
        let succ = self.ix.label(next).to_string();
        let decision = Decision {
            pp: self.ix.term_pp(bb).to_string(),
            kind: DecisionKind::Indirect,
            succ: succ.clone(),
            cond: None,
            sense: None,
            case_value: None,
            is_default: None,
            target: Some(target_id.to_string()),
        };
        let text = format!("{}==label:{}", target_id, succ);
        let expr = CondExpr::eq(target_id, format!("label:{}", succ));
        self.take(decision, text, expr, next);
    }

    /// Push one decision (with its two condition forms), recurse, unwind.
    fn take(&mut self, decision: Decision, text: String, expr: CondExpr, next: usize) {
        self.decisions.push(decision);
        self.conds.push(text);
        self.cond_exprs.push(expr);
        self.dfs(next);
        self.decisions.pop();
        self.conds.pop();
        self.cond_exprs.pop();
    }

    /// The current path is complete: assign it an id and emit its record.
    fn leaf(&mut self) {
        let ix = self.ix;
        self.counters.dfs_leaves += 1;
        let path_id = self.counters.next_path_id;
        self.counters.next_path_id += 1;

        let mut pp_seq: Vec<&'a str> = Vec::new();
        if self.opts.include_pp_seq || self.opts.pp_coverage {
            for &ord in &self.path {
                pp_seq.extend(ix.pps(ord).iter().map(|s| s.as_str()));
            }
        }
        if self.opts.pp_coverage {
            // Each pp is recorded at most once per path.
            let mut seen = HashSet::with_capacity(pp_seq.len());
            for &pp in &pp_seq {
                if seen.insert(pp) {
                    self.pp_paths.entry(pp).or_default().push(path_id);
                }
            }
        }

        self.sink.emit(&record::Cfg::Path {
            r#fn: ix.func.name.clone(),
            path_id,
            bbs: self.path.iter().map(|&o| ix.label(o).to_string()).collect(),
            decisions: self.decisions.clone(),
            pp_seq: self
                .opts
                .include_pp_seq
                .then(|| pp_seq.iter().map(|s| s.to_string()).collect()),
            path_cond: self.opts.cond_format.text().then(|| self.conds.clone()),
            path_cond_json: self
                .opts
                .cond_format
                .json()
                .then(|| self.cond_exprs.clone()),
        });
        self.counters.emitted += 1;
    }

    fn finish(self) {
        let Enumerator {
            ix,
            opts,
            sink,
            pp_paths,
            counters,
            ..
        } = self;
        if opts.pp_coverage {
            let limit = opts.max_pp_path_ids as usize;
            for (pp, ids) in &pp_paths {
                sink.emit(&record::Cfg::PpCoverage {
                    r#fn: ix.func.name.clone(),
                    pp: (*pp).to_string(),
                    path_count: ids.len(),
                    path_ids: ids.iter().copied().take(limit).collect(),
                    truncated: (ids.len() > limit).then_some(true),
                });
            }
        }
        sink.emit(&record::Cfg::PathSummary {
            r#fn: ix.func.name.clone(),
            paths_emitted: counters.emitted,
            disabled: None,
            truncated: Some(counters.truncated),
            max_paths: opts.max_paths,
            max_depth: opts.max_path_depth,
            max_loop_iters: opts.max_loop_iters,
            cutoff_depth: Some(counters.cutoff_depth),
            cutoff_loop: Some(counters.cutoff_loop),
            const_pruned_br: Some(counters.const_pruned_br),
            const_pruned_switch: Some(counters.const_pruned_switch),
            const_pruned_indirect: Some(counters.const_pruned_indirect),
            dfs_calls: Some(counters.dfs_calls),
            dfs_leaves: Some(counters.dfs_leaves),
            dfs_prune_max_paths: Some(counters.prune_max_paths),
            dfs_prune_max_depth: Some(counters.prune_max_depth),
            dfs_prune_loop: Some(counters.prune_loop),
        });
    }
}
