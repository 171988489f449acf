// SPDX-License-Identifier: BSD-3-Clause
//! The typed SSA IR the analyzer consumes. The shapes mirror the module
//! structure of LLVM-style IRs closely enough that a frontend can lower
//! into them mechanically, but the analyzer owns the types: every block
//! carries exactly one terminator by construction, floats are kept in
//! printed form so everything stays `Eq` and `Hash`, and the whole tree
//! derives `Deserialize` so serialized modules can be fed straight in.

use std::collections::HashSet;

use serde::Deserialize;

pub mod constant;
mod error;
pub use error::*;
mod name;
pub use name::*;
mod operand;
pub use operand::*;
pub mod instruction;
pub mod terminator;
pub use terminator::*;
mod types;
pub use types::*;

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Instruction {
    #[serde(default)]
    pub result: Option<Name>,
    #[serde(default)]
    pub ty: Type,
    pub opcode: instruction::Opcode,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Terminator {
    #[serde(default)]
    pub result: Option<Name>,
    #[serde(default)]
    pub ty: Type,
    pub opcode: terminator::TermOpcode,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub name: Name,
    #[serde(default)]
    pub instrs: Vec<Instruction>,
    pub term: Terminator,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    pub name: Name,
    pub ty: Type,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl Module {
    /// Structural checks a frontend can get wrong: block names must be
    /// unique within a function, successors must name blocks, and an
    /// instruction has a result exactly when its type is non-void.
    pub fn validate(&self) -> Result<(), Error> {
        for f in &self.functions {
            let mut names = HashSet::with_capacity(f.blocks.len());
            for b in &f.blocks {
                if !names.insert(&b.name) {
                    return Err(Error(format!("duplicate block %{} in {}", b.name, f.name)));
                }
            }
            for b in &f.blocks {
                for succ in b.term.opcode.successors() {
                    if !names.contains(succ) {
                        return Err(Error(format!(
                            "{}: successor %{} of block %{} is not a block",
                            f.name, succ, b.name
                        )));
                    }
                }
                for i in &b.instrs {
                    if i.result.is_some() == i.ty.is_void() {
                        return Err(Error(format!(
                            "{}: result/type mismatch on a {} in block %{}",
                            f.name,
                            i.opcode.name(),
                            b.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
