// SPDX-License-Identifier: BSD-3-Clause
//! Transmitter classification: which operand of an instruction a
//! side-channel observer can infer. Purely syntactic.

use crate::ir::instruction::Opcode;
use crate::ir::terminator::TermOpcode;
use crate::record::{Tx, TxKind};

/// Classify a non-terminator instruction.
pub fn of_instruction(op: &Opcode) -> Option<Tx> {
    match op {
        Opcode::Load(_) => Some(Tx {
            kind: TxKind::LoadAddr,
            which: 0,
        }),
        Opcode::Store(_) => Some(Tx {
            kind: TxKind::StoreAddr,
            which: 1,
        }),
        // No `_` pattern to ensure this is updated if the type changes
        Opcode::Alloca(_)
        | Opcode::Binary(_)
        | Opcode::Call(_)
        | Opcode::Cast(_)
        | Opcode::FCmp(_)
        | Opcode::GetElementPtr(_)
        | Opcode::ICmp(_)
        | Opcode::Phi(_)
        | Opcode::Select(_)
        | Opcode::Other(_) => None,
    }
}

/// Classify a terminator. Unconditional branches transmit nothing.
pub fn of_terminator(op: &TermOpcode) -> Option<Tx> {
    match op {
        TermOpcode::CondBr(_) => Some(Tx {
            kind: TxKind::BrCond,
            which: 0,
        }),
        TermOpcode::Switch(_) => Some(Tx {
            kind: TxKind::SwitchCond,
            which: 0,
        }),
        TermOpcode::IndirectBr(_) => Some(Tx {
            kind: TxKind::IndirectTarget,
            which: 0,
        }),
        // No `_` pattern to ensure this is updated if the type changes
        TermOpcode::Ret(_) | TermOpcode::Br(_) | TermOpcode::Unreachable | TermOpcode::Other(_) => {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::instruction::{Load, Store};
    use crate::ir::terminator::{Br, CondBr};
    use crate::ir::{Name, Operand, Type};

    fn ptr(name: &str) -> Operand {
        Operand::Local {
            name: Name::from(name),
            ty: Type::Pointer,
        }
    }

    #[test]
    fn memory_ops() {
        let load = Opcode::Load(Load { address: ptr("p") });
        assert_eq!(
            of_instruction(&load),
            Some(Tx {
                kind: TxKind::LoadAddr,
                which: 0
            })
        );
        let store = Opcode::Store(Store {
            value: ptr("v"),
            address: ptr("p"),
        });
        assert_eq!(
            of_instruction(&store),
            Some(Tx {
                kind: TxKind::StoreAddr,
                which: 1
            })
        );
    }

    #[test]
    fn unconditional_branches_are_silent() {
        let br = TermOpcode::Br(Br {
            dest: Name::from("next"),
        });
        assert_eq!(of_terminator(&br), None);
        let cond = TermOpcode::CondBr(CondBr {
            condition: ptr("c"),
            true_dest: Name::from("a"),
            false_dest: Name::from("b"),
        });
        assert_eq!(
            of_terminator(&cond),
            Some(Tx {
                kind: TxKind::BrCond,
                which: 0
            })
        );
    }
}
