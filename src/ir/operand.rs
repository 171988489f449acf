// SPDX-License-Identifier: BSD-3-Clause
use serde::Deserialize;

use super::constant::Constant;
use super::name::Name;
use super::types::Type;

/// An instruction operand.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Reference to a local value: a function argument or an instruction
    /// result.
    Local { name: Name, ty: Type },
    Constant(Constant),
    /// Reference to a basic block of the enclosing function.
    Block(Name),
}

impl Operand {
    /// The raw bits of an integer-constant operand.
    pub fn constant_int(&self) -> Option<(u32, u64)> {
        match self {
            Operand::Constant(Constant::Int { bits, value }) => Some((*bits, *value)),
            _ => None,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Operand::Local { ty, .. } => ty.clone(),
            Operand::Constant(c) => c.ty(),
            Operand::Block(_) => Type::Label,
        }
    }
}

/// A borrowed view of one operand position in an instruction's ordered
/// operand list.
#[derive(Clone, Copy, Debug)]
pub enum OperandRef<'a> {
    Value(&'a Operand),
    Const(&'a Constant),
    Block(&'a Name),
}
