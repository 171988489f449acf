// SPDX-License-Identifier: BSD-3-Clause
use serde::Deserialize;

use super::constant::Constant;
use super::name::Name;
use super::operand::{Operand, OperandRef};

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Ret {
    #[serde(default)]
    pub value: Option<Operand>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Br {
    pub dest: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct CondBr {
    pub condition: Operand,
    pub true_dest: Name,
    pub false_dest: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct SwitchCase {
    pub value: Constant,
    pub dest: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Switch {
    pub condition: Operand,
    #[serde(default)]
    pub cases: Vec<SwitchCase>,
    #[serde(default)]
    pub default_dest: Option<Name>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct IndirectBr {
    pub target: Operand,
    #[serde(default)]
    pub dests: Vec<Name>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct OtherTerm {
    pub opcode: String,
    #[serde(default)]
    pub operands: Vec<Operand>,
    #[serde(default)]
    pub dests: Vec<Name>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermOpcode {
    Ret(Ret),
    Br(Br),
    CondBr(CondBr),
    Switch(Switch),
    IndirectBr(IndirectBr),
    Unreachable,
    Other(OtherTerm),
}

impl TermOpcode {
    pub fn name(&self) -> &str {
        match self {
            TermOpcode::Ret(_) => "ret",
            TermOpcode::Br(_) | TermOpcode::CondBr(_) => "br",
            TermOpcode::Switch(_) => "switch",
            TermOpcode::IndirectBr(_) => "indirectbr",
            TermOpcode::Unreachable => "unreachable",
            TermOpcode::Other(o) => &o.opcode,
        }
    }

    /// Ordered operand list as the trace sees it. Controlling values come
    /// first, so a conditional branch's condition, a switch's scrutinee,
    /// and an indirect branch's target are all operand 0.
    pub fn operands(&self) -> Vec<OperandRef<'_>> {
        use OperandRef::{Block, Const, Value};
        match self {
            TermOpcode::Ret(r) => r.value.iter().map(Value).collect(),
            TermOpcode::Br(b) => vec![Block(&b.dest)],
            TermOpcode::CondBr(b) => vec![
                Value(&b.condition),
                Block(&b.true_dest),
                Block(&b.false_dest),
            ],
            TermOpcode::Switch(s) => {
                let mut ops = vec![Value(&s.condition)];
                if let Some(d) = &s.default_dest {
                    ops.push(Block(d));
                }
                for case in &s.cases {
                    ops.push(Const(&case.value));
                    ops.push(Block(&case.dest));
                }
                ops
            }
            TermOpcode::IndirectBr(ib) => {
                let mut ops = vec![Value(&ib.target)];
                ops.extend(ib.dests.iter().map(Block));
                ops
            }
            TermOpcode::Unreachable => Vec::new(),
            TermOpcode::Other(o) => {
                let mut ops: Vec<_> = o.operands.iter().map(Value).collect();
                ops.extend(o.dests.iter().map(Block));
                ops
            }
        }
    }

    /// Successor blocks in IR order: a conditional branch lists the taken
    /// edge first, a switch lists its default destination first.
    pub fn successors(&self) -> Vec<&Name> {
        match self {
            TermOpcode::Ret(_) | TermOpcode::Unreachable => Vec::new(),
            TermOpcode::Br(b) => vec![&b.dest],
            TermOpcode::CondBr(b) => vec![&b.true_dest, &b.false_dest],
            TermOpcode::Switch(s) => {
                let mut ss = Vec::with_capacity(s.cases.len() + 1);
                if let Some(d) = &s.default_dest {
                    ss.push(d);
                }
                ss.extend(s.cases.iter().map(|c| &c.dest));
                ss
            }
            TermOpcode::IndirectBr(ib) => ib.dests.iter().collect(),
            TermOpcode::Other(o) => o.dests.iter().collect(),
        }
    }
}
