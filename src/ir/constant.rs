// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use serde::Deserialize;

use super::name::Name;
use super::types::{FpType, Type};

/// A constant value. Identity for output purposes is content-addressed:
/// [`Constant::id`] depends only on the kind and printed form, never on
/// where the constant appears, so downstream consumers can join on it
/// across functions.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    /// Integer constant. `value` holds the raw (zero-extended) bits.
    Int { bits: u32, value: u64 },
    /// Floating-point constant, kept in printed form so the type stays
    /// `Eq` and the ID stays stable.
    Float { ty: FpType, printed: String },
    Null,
    Undef(Type),
    Poison(Type),
    /// Address of a basic block of the enclosing function.
    BlockAddress { block: Name },
    Other { ty: Type, printed: String },
}

/// Signed two's-complement reading of a `bits`-wide raw value.
pub(crate) fn signed_int(bits: u32, value: u64) -> i128 {
    if bits == 0 || bits >= 64 {
        return value as i64 as i128;
    }
    let value = value & ((1u64 << bits) - 1);
    if (value >> (bits - 1)) & 1 == 1 {
        value as i128 - (1i128 << bits)
    } else {
        value as i128
    }
}

impl Constant {
    /// Stable content-addressed ID.
    ///
    /// Integers render the signed reading of the stored bits; an i1 holding
    /// 1 renders as `const:i1:-1`. The decimal form is what downstream
    /// joins are keyed on.
    pub fn id(&self) -> String {
        match self {
            Constant::Int { bits, value } => {
                format!("const:i{}:{}", bits, signed_int(*bits, *value))
            }
            Constant::Float { printed, .. } => format!("const:fp:{}", printed),
            Constant::Null => "const:null".to_string(),
            Constant::Undef(_) => "const:undef".to_string(),
            Constant::Poison(_) => "const:poison".to_string(),
            c => format!("const:{}", c),
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Constant::Int { bits, .. } => Type::Int { bits: *bits },
            Constant::Float { ty, .. } => Type::Fp(*ty),
            Constant::Null | Constant::BlockAddress { .. } => Type::Pointer,
            Constant::Undef(ty) | Constant::Poison(ty) => ty.clone(),
            Constant::Other { ty, .. } => ty.clone(),
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int { bits, value } => {
                write!(f, "i{} {}", bits, signed_int(*bits, *value))
            }
            Constant::Float { printed, .. } => write!(f, "{}", printed),
            Constant::Null => write!(f, "null"),
            Constant::Undef(_) => write!(f, "undef"),
            Constant::Poison(_) => write!(f, "poison"),
            Constant::BlockAddress { block } => write!(f, "blockaddress(%{})", block),
            Constant::Other { printed, .. } => write!(f, "{}", printed),
        }
    }
}
