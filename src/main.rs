// SPDX-License-Identifier: BSD-3-Clause
use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;

use pubdata::analysis::{self, CondFormat, Options};
use pubdata::cli;
use pubdata::ir::Module;
use pubdata::sink::{Sink, Sinks};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let level = if args.quiet {
        LevelFilter::ERROR
    } else if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let module_string = std::fs::read_to_string(&args.module)
        .with_context(|| format!("Couldn't read module at {}", args.module.display()))?;
    let module: Module =
        serde_json::from_str(&module_string).context("Couldn't deserialize module")?;
    module.validate().context("Malformed module")?;

    let opts = Options {
        trace_types: args.trace_types,
        max_inst: args.max_inst,
        max_paths: args.max_paths,
        max_path_depth: args.max_path_depth,
        max_loop_iters: args.max_loop_iters,
        cond_format: CondFormat::parse(&args.path_cond_format),
        include_pp_seq: args.path_include_pp_seq,
        pp_coverage: args.pp_coverage,
        max_pp_path_ids: args.max_pp_path_ids,
    };
    let mut sinks = Sinks {
        trace: Sink::from_path(args.trace_out),
        trace_index: Sink::from_path(args.trace_index_out),
        cfg: Sink::from_path(args.cfg_out),
    };

    analysis::run_module(&module, &opts, &mut sinks);
    sinks.flush();

    Ok(())
}
