// SPDX-License-Identifier: BSD-3-Clause
use std::path::PathBuf;

/// Per-function trace, CFG, and path enumeration for side-channel audits
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Serialized IR module (JSON)
    #[arg()]
    pub module: PathBuf,

    /// Write the per-instruction NDJSON trace to this path
    #[arg(long)]
    pub trace_out: Option<PathBuf>,

    /// Write NDJSON trace-index records to this path
    #[arg(long)]
    pub trace_index_out: Option<PathBuf>,

    /// Include type strings in trace records
    #[arg(long)]
    pub trace_types: bool,

    /// Trace instructions emitted per function; 0 is unlimited
    #[arg(long, default_value_t = 0)]
    pub max_inst: u32,

    /// Write NDJSON CFG and path records to this path
    #[arg(long)]
    pub cfg_out: Option<PathBuf>,

    /// Paths emitted per function; 0 disables path enumeration
    #[arg(long, default_value_t = 200)]
    pub max_paths: u32,

    /// Maximum basic blocks per path
    #[arg(long, default_value_t = 256)]
    pub max_path_depth: u32,

    /// Block re-entries allowed on a single path
    #[arg(long, default_value_t = 0)]
    pub max_loop_iters: u32,

    /// Path condition format: string|json|both
    #[arg(long, default_value = "string")]
    pub path_cond_format: String,

    /// Include the instruction-level pp_seq in each path record
    #[arg(long)]
    pub path_include_pp_seq: bool,

    /// Emit pp_coverage records mapping each pp to the paths crossing it
    #[arg(long)]
    pub pp_coverage: bool,

    /// Path ids listed per pp_coverage record
    #[arg(long, default_value_t = 64)]
    pub max_pp_path_ids: u32,

    /// Errors only
    #[arg(long)]
    pub quiet: bool,

    /// Debug-level diagnostics
    #[arg(long)]
    pub verbose: bool,
}
