// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use serde::Deserialize;

/// Result and operand types, kept just rich enough for printing and for
/// the void-result rule.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Void,
    Int { bits: u32 },
    Fp(FpType),
    Pointer,
    Label,
    Other(String),
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FpType {
    Half,
    Float,
    Double,
    Fp128,
}

impl Type {
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl Default for Type {
    fn default() -> Self {
        Type::Void
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int { bits } => write!(f, "i{}", bits),
            Type::Fp(fp) => write!(f, "{}", fp),
            Type::Pointer => write!(f, "ptr"),
            Type::Label => write!(f, "label"),
            Type::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Display for FpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FpType::Half => write!(f, "half"),
            FpType::Float => write!(f, "float"),
            FpType::Double => write!(f, "double"),
            FpType::Fp128 => write!(f, "fp128"),
        }
    }
}
