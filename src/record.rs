// SPDX-License-Identifier: BSD-3-Clause
//! NDJSON record shapes. Field declaration order is the key order on the
//! wire. Optional keys are omitted when absent; the trace `def` field is
//! the one consumers expect as an explicit `null`.

use serde::Serialize;

/// One trace line per instruction. The trace stream carries no `kind` tag.
#[derive(Clone, Debug, Serialize)]
pub struct Trace {
    pub r#fn: String,
    pub bb: String,
    pub pp: String,
    pub op: String,
    pub def: Option<String>,
    pub uses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def_ty: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icmp_pred: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcmp_pred: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<Tx>,
}

/// Transmitter annotation: which operand a side-channel observer learns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tx {
    pub kind: TxKind,
    pub which: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TxKind {
    #[serde(rename = "load.addr")]
    LoadAddr,
    #[serde(rename = "store.addr")]
    StoreAddr,
    #[serde(rename = "br.cond")]
    BrCond,
    #[serde(rename = "switch.cond")]
    SwitchCond,
    #[serde(rename = "indirectbr.target")]
    IndirectTarget,
}

impl TxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::LoadAddr => "load.addr",
            TxKind::StoreAddr => "store.addr",
            TxKind::BrCond => "br.cond",
            TxKind::SwitchCond => "switch.cond",
            TxKind::IndirectTarget => "indirectbr.target",
        }
    }
}

/// Index line pointing at a trace line (1-based).
#[derive(Clone, Debug, Serialize)]
pub struct TraceIndex {
    pub kind: &'static str,
    pub r#fn: String,
    pub bb: String,
    pub pp: String,
    pub op: String,
    pub def: Option<String>,
    pub line: u64,
}

/// One decision per path transition through a branching terminator.
#[derive(Clone, Debug, Serialize)]
pub struct Decision {
    pub pp: String,
    pub kind: DecisionKind,
    pub succ: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cond: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sense: Option<&'static str>,
    #[serde(rename = "case", skip_serializing_if = "Option::is_none")]
    pub case_value: Option<String>,
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Br,
    Switch,
    Indirect,
}

/// A structured path-condition term: a comparison or an n-ary conjunction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op")]
pub enum CondExpr {
    #[serde(rename = "==")]
    Eq { lhs: String, rhs: String },
    #[serde(rename = "!=")]
    Ne { lhs: String, rhs: String },
    #[serde(rename = "and")]
    And { terms: Vec<CondExpr> },
}

impl CondExpr {
    pub fn eq(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        CondExpr::Eq {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn ne(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        CondExpr::Ne {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn and(terms: Vec<CondExpr>) -> Self {
        CondExpr::And { terms }
    }
}

/// Records on the CFG/path stream, discriminated by `kind`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cfg {
    FuncSummary {
        r#fn: String,
        inst_count: usize,
        bb_count: usize,
        tx_count: usize,
        trace_emitted: usize,
        trace_truncated: bool,
        trace_max_inst: u32,
    },
    Block {
        r#fn: String,
        bb: String,
        succs: Vec<String>,
        term_pp: String,
        term_op: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cond: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Edge {
        r#fn: String,
        from: String,
        to: String,
        term_pp: String,
        branch: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        cond: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sense: Option<&'static str>,
        #[serde(rename = "case", skip_serializing_if = "Option::is_none")]
        case_value: Option<String>,
        #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
        is_default: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Path {
        r#fn: String,
        path_id: usize,
        bbs: Vec<String>,
        decisions: Vec<Decision>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pp_seq: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        path_cond: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        path_cond_json: Option<Vec<CondExpr>>,
    },
    PpCoverage {
        r#fn: String,
        pp: String,
        path_count: usize,
        path_ids: Vec<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        truncated: Option<bool>,
    },
    PathSummary {
        r#fn: String,
        paths_emitted: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        disabled: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        truncated: Option<bool>,
        max_paths: u32,
        max_depth: u32,
        max_loop_iters: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        cutoff_depth: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cutoff_loop: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        const_pruned_br: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        const_pruned_switch: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        const_pruned_indirect: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dfs_calls: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dfs_leaves: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dfs_prune_max_paths: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dfs_prune_max_depth: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dfs_prune_loop: Option<u64>,
    },
}
