// SPDX-License-Identifier: BSD-3-Clause
//! Per-function static analysis over a typed SSA IR for constant-time and
//! side-channel auditing. For every function three NDJSON streams can be
//! produced: a per-instruction trace (each instruction labeled with its
//! `fn:bb:iN` program point, its stable operand IDs, and any transmitter
//! annotation), an index into that trace, and a CFG stream carrying the
//! function summary, block and edge records, enumerated paths with their
//! decision sequences and path conditions, and a closing summary.
//!
//! The analyzer performs no semantic execution: transmitters are
//! syntactic, path enumeration is bounded and feasibility-blind, and the
//! IR is never rewritten.

pub mod analysis;
pub mod cli;
pub mod ir;
pub mod record;
pub mod sink;

pub use analysis::{CondFormat, Options};
pub use ir::{Block, Function, Instruction, Module, Name, Operand, Parameter, Terminator, Type};
pub use sink::{Sink, Sinks};
