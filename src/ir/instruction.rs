use serde::Deserialize;

use super::name::Name;
use super::operand::{Operand, OperandRef};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,
    And,
    Or,
    Xor,
    Shl,
    LShr,
    AShr,
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::UDiv => "udiv",
            BinaryOp::SDiv => "sdiv",
            BinaryOp::URem => "urem",
            BinaryOp::SRem => "srem",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::LShr => "lshr",
            BinaryOp::AShr => "ashr",
            BinaryOp::FAdd => "fadd",
            BinaryOp::FSub => "fsub",
            BinaryOp::FMul => "fmul",
            BinaryOp::FDiv => "fdiv",
            BinaryOp::FRem => "frem",
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastOp {
    Trunc,
    ZExt,
    SExt,
    FPTrunc,
    FPExt,
    FPToUI,
    FPToSI,
    UIToFP,
    SIToFP,
    PtrToInt,
    IntToPtr,
    BitCast,
    AddrSpaceCast,
}

impl CastOp {
    pub fn name(self) -> &'static str {
        match self {
            CastOp::Trunc => "trunc",
            CastOp::ZExt => "zext",
            CastOp::SExt => "sext",
            CastOp::FPTrunc => "fptrunc",
            CastOp::FPExt => "fpext",
            CastOp::FPToUI => "fptoui",
            CastOp::FPToSI => "fptosi",
            CastOp::UIToFP => "uitofp",
            CastOp::SIToFP => "sitofp",
            CastOp::PtrToInt => "ptrtoint",
            CastOp::IntToPtr => "inttoptr",
            CastOp::BitCast => "bitcast",
            CastOp::AddrSpaceCast => "addrspacecast",
        }
    }
}

/// Integer comparison predicates, with their canonical names.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntPredicate {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

impl IntPredicate {
    pub fn name(self) -> &'static str {
        match self {
            IntPredicate::Eq => "eq",
            IntPredicate::Ne => "ne",
            IntPredicate::Ugt => "ugt",
            IntPredicate::Uge => "uge",
            IntPredicate::Ult => "ult",
            IntPredicate::Ule => "ule",
            IntPredicate::Sgt => "sgt",
            IntPredicate::Sge => "sge",
            IntPredicate::Slt => "slt",
            IntPredicate::Sle => "sle",
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatPredicate {
    False,
    Oeq,
    Ogt,
    Oge,
    Olt,
    Ole,
    One,
    Ord,
    Ueq,
    Ugt,
    Uge,
    Ult,
    Ule,
    Une,
    Uno,
    True,
}

impl FloatPredicate {
    pub fn name(self) -> &'static str {
        match self {
            FloatPredicate::False => "false",
            FloatPredicate::Oeq => "oeq",
            FloatPredicate::Ogt => "ogt",
            FloatPredicate::Oge => "oge",
            FloatPredicate::Olt => "olt",
            FloatPredicate::Ole => "ole",
            FloatPredicate::One => "one",
            FloatPredicate::Ord => "ord",
            FloatPredicate::Ueq => "ueq",
            FloatPredicate::Ugt => "ugt",
            FloatPredicate::Uge => "uge",
            FloatPredicate::Ult => "ult",
            FloatPredicate::Ule => "ule",
            FloatPredicate::Une => "une",
            FloatPredicate::Uno => "uno",
            FloatPredicate::True => "true",
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Alloca {
    pub num_elements: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Binary {
    pub op: BinaryOp,
    pub operand0: Operand,
    pub operand1: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Call {
    pub callee: Operand,
    #[serde(default)]
    pub args: Vec<Operand>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Cast {
    pub op: CastOp,
    pub operand: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct FCmp {
    pub predicate: FloatPredicate,
    pub operand0: Operand,
    pub operand1: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct GetElementPtr {
    pub address: Operand,
    pub indices: Vec<Operand>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct ICmp {
    pub predicate: IntPredicate,
    pub operand0: Operand,
    pub operand1: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Load {
    pub address: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Incoming {
    pub value: Operand,
    pub block: Name,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Phi {
    pub incoming: Vec<Incoming>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Select {
    pub condition: Operand,
    pub true_value: Operand,
    pub false_value: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Store {
    pub value: Operand,
    pub address: Operand,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
pub struct Other {
    pub opcode: String,
    #[serde(default)]
    pub operands: Vec<Operand>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    Alloca(Alloca),
    Binary(Binary),
    Call(Call),
    Cast(Cast),
    FCmp(FCmp),
    GetElementPtr(GetElementPtr),
    ICmp(ICmp),
    Load(Load),
    Phi(Phi),
    Select(Select),
    Store(Store),
    Other(Other),
}

impl Opcode {
    pub fn name(&self) -> &str {
        match self {
            Opcode::Alloca(_) => "alloca",
            Opcode::Binary(b) => b.op.name(),
            Opcode::Call(_) => "call",
            Opcode::Cast(c) => c.op.name(),
            Opcode::FCmp(_) => "fcmp",
            Opcode::GetElementPtr(_) => "getelementptr",
            Opcode::ICmp(_) => "icmp",
            Opcode::Load(_) => "load",
            Opcode::Phi(_) => "phi",
            Opcode::Select(_) => "select",
            Opcode::Store(_) => "store",
            Opcode::Other(o) => &o.opcode,
        }
    }

    /// Ordered operand list as the trace sees it. A store is (value,
    /// address); a call lists its arguments with the callee last; phi
    /// incoming blocks interleave with their values.
    pub fn operands(&self) -> Vec<OperandRef<'_>> {
        use OperandRef::{Block, Value};
        match self {
            Opcode::Alloca(a) => vec![Value(&a.num_elements)],
            Opcode::Binary(b) => vec![Value(&b.operand0), Value(&b.operand1)],
            Opcode::Call(c) => {
                let mut ops: Vec<_> = c.args.iter().map(Value).collect();
                ops.push(Value(&c.callee));
                ops
            }
            Opcode::Cast(c) => vec![Value(&c.operand)],
            Opcode::FCmp(c) => vec![Value(&c.operand0), Value(&c.operand1)],
            Opcode::GetElementPtr(g) => {
                let mut ops = vec![Value(&g.address)];
                ops.extend(g.indices.iter().map(Value));
                ops
            }
            Opcode::ICmp(c) => vec![Value(&c.operand0), Value(&c.operand1)],
            Opcode::Load(l) => vec![Value(&l.address)],
            Opcode::Phi(p) => p
                .incoming
                .iter()
                .flat_map(|inc| [Value(&inc.value), Block(&inc.block)])
                .collect(),
            Opcode::Select(s) => vec![
                Value(&s.condition),
                Value(&s.true_value),
                Value(&s.false_value),
            ],
            Opcode::Store(s) => vec![Value(&s.value), Value(&s.address)],
            Opcode::Other(o) => o.operands.iter().map(Value).collect(),
        }
    }
}
