// SPDX-License-Identifier: BSD-3-Clause
//! The per-function analysis passes: program-point trace, CFG and edge
//! records, and bounded path enumeration.

use tracing::{info, warn};

use crate::ir::{Function, Module};
use crate::sink::Sinks;

pub mod cfg;
pub mod names;
pub mod paths;
pub mod trace;
pub mod transmitter;

/// Which representation of path conditions to emit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CondFormat {
    #[default]
    Text,
    Json,
    Both,
}

impl CondFormat {
    /// Lenient parse: unknown values warn once and fall back to `string`.
    pub fn parse(s: &str) -> CondFormat {
        match s {
            "string" => CondFormat::Text,
            "json" => CondFormat::Json,
            "both" => CondFormat::Both,
            other => {
                warn!("unknown path-cond-format {:?}, defaulting to string", other);
                CondFormat::Text
            }
        }
    }

    pub fn text(self) -> bool {
        matches!(self, CondFormat::Text | CondFormat::Both)
    }

    pub fn json(self) -> bool {
        matches!(self, CondFormat::Json | CondFormat::Both)
    }
}

/// Per-invocation configuration. Sink destinations live in [`Sinks`].
#[derive(Clone, Debug)]
pub struct Options {
    /// Include `def_ty` / `use_tys` in trace records.
    pub trace_types: bool,
    /// Trace records per function; 0 is unlimited.
    pub max_inst: u32,
    /// Paths per function; 0 disables path enumeration.
    pub max_paths: u32,
    /// Maximum blocks on a path.
    pub max_path_depth: u32,
    /// Re-entries allowed per block on a single path.
    pub max_loop_iters: u32,
    pub cond_format: CondFormat,
    /// Include the instruction-level `pp_seq` in each path record.
    pub include_pp_seq: bool,
    /// Emit `pp_coverage` records after enumeration.
    pub pp_coverage: bool,
    /// Path ids listed per `pp_coverage` record.
    pub max_pp_path_ids: u32,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            trace_types: false,
            max_inst: 0,
            max_paths: 200,
            max_path_depth: 256,
            max_loop_iters: 0,
            cond_format: CondFormat::Text,
            include_pp_seq: false,
            pp_coverage: false,
            max_pp_path_ids: 64,
        }
    }
}

/// Analyze every function in the module, in declaration order.
pub fn run_module(module: &Module, opts: &Options, sinks: &mut Sinks) {
    for f in &module.functions {
        run_function(f, opts, sinks);
    }
}

/// Analyze one function: the trace pass runs first, then CFG records,
/// then path enumeration. All three share one value namer so fresh `vN`
/// ids allocate in trace order, which is what keeps reanalysis output
/// byte-identical.
pub fn run_function(func: &Function, opts: &Options, sinks: &mut Sinks) {
    info!("analyzing function {}", func.name);
    let ix = names::FunctionIndex::new(func);
    let mut namer = names::ValueNamer::new(func);
    let stats = trace::emit(&ix, &mut namer, opts, sinks);
    if sinks.cfg.enabled() {
        cfg::emit(&ix, &mut namer, &stats, opts, &mut sinks.cfg);
        paths::emit(&ix, &mut namer, opts, &mut sinks.cfg);
    }
}
