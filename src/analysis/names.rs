// SPDX-License-Identifier: BSD-3-Clause
//! Block ordinals, program points, and stable value identifiers.

use std::collections::HashMap;

use crate::ir::{Block, Function, Name, Operand};

/// Render the program point of instruction `idx` of block `bb` in `func`.
pub fn program_point(func: &str, bb: &str, idx: usize) -> String {
    format!("{}:{}:i{}", func, bb, idx)
}

/// Per-function block index: ordinals in declaration order, printable
/// labels, and the program points of every instruction (terminator last).
pub struct FunctionIndex<'f> {
    pub func: &'f Function,
    ordinals: HashMap<&'f Name, usize>,
    labels: Vec<String>,
    pps: Vec<Vec<String>>,
}

impl<'f> FunctionIndex<'f> {
    pub fn new(func: &'f Function) -> Self {
        let mut ordinals = HashMap::with_capacity(func.blocks.len());
        let mut labels = Vec::with_capacity(func.blocks.len());
        for (ord, b) in func.blocks.iter().enumerate() {
            ordinals.insert(&b.name, ord);
            labels.push(match b.name.given() {
                Some(s) => s.to_string(),
                None => format!("bb{}", ord),
            });
        }
        let mut pps = Vec::with_capacity(func.blocks.len());
        for (ord, b) in func.blocks.iter().enumerate() {
            let mut seq = Vec::with_capacity(b.instrs.len() + 1);
            for idx in 0..=b.instrs.len() {
                seq.push(program_point(&func.name, &labels[ord], idx));
            }
            pps.push(seq);
        }
        FunctionIndex {
            func,
            ordinals,
            labels,
            pps,
        }
    }

    pub fn len(&self) -> usize {
        self.func.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.func.blocks.is_empty()
    }

    pub fn block(&self, ord: usize) -> &'f Block {
        &self.func.blocks[ord]
    }

    pub fn label(&self, ord: usize) -> &str {
        &self.labels[ord]
    }

    pub fn ordinal(&self, name: &Name) -> Option<usize> {
        self.ordinals.get(name).copied()
    }

    /// Program points of block `ord`, one per instruction with the
    /// terminator's last.
    pub fn pps(&self, ord: usize) -> &[String] {
        &self.pps[ord]
    }

    pub fn term_pp(&self, ord: usize) -> &str {
        self.pps[ord].last().map(|s| s.as_str()).unwrap_or("")
    }

    /// Resolved successor ordinals of block `ord`. Names that do not
    /// resolve are dropped, so pathological IR just has fewer successors.
    pub fn successors(&self, ord: usize) -> Vec<usize> {
        self.block(ord)
            .term
            .opcode
            .successors()
            .into_iter()
            .filter_map(|n| self.ordinal(n))
            .collect()
    }
}

/// Stable per-function value identifiers: constants are content-addressed,
/// arguments use their given name or `argN`, named locals pass through
/// verbatim, and unnamed locals get fresh `vN` ids in first-use order.
pub struct ValueNamer<'f> {
    params: HashMap<&'f Name, usize>,
    ids: HashMap<&'f Name, String>,
    next: usize,
}

impl<'f> ValueNamer<'f> {
    pub fn new(func: &'f Function) -> Self {
        let mut params = HashMap::with_capacity(func.params.len());
        for (argno, p) in func.params.iter().enumerate() {
            params.insert(&p.name, argno);
        }
        ValueNamer {
            params,
            ids: HashMap::new(),
            next: 0,
        }
    }

    /// ID of the local (argument or instruction result) called `name`.
    pub fn local_id(&mut self, name: &'f Name) -> String {
        if let Some(argno) = self.params.get(name) {
            return match name.given() {
                Some(s) => s.to_string(),
                None => format!("arg{}", argno),
            };
        }
        if let Some(s) = name.given() {
            return s.to_string();
        }
        if let Some(id) = self.ids.get(name) {
            return id.clone();
        }
        let id = format!("v{}", self.next);
        self.next += 1;
        self.ids.insert(name, id.clone());
        id
    }

    /// ID of a value operand. Block operands are the caller's business
    /// (their printable form is the block label, which lives in the
    /// [`FunctionIndex`]); the raw name is a fallback only.
    pub fn operand_id(&mut self, op: &'f Operand) -> String {
        match op {
            Operand::Constant(c) => c.id(),
            Operand::Local { name, .. } => self.local_id(name),
            Operand::Block(name) => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::constant::Constant;
    use crate::ir::{Parameter, Type};

    fn func_with_params(params: Vec<Parameter>) -> Function {
        Function {
            name: "f".to_string(),
            params,
            blocks: Vec::new(),
        }
    }

    #[test]
    fn pp_format() {
        assert_eq!(program_point("f", "entry", 0), "f:entry:i0");
        assert_eq!(program_point("f", "bb2", 11), "f:bb2:i11");
    }

    #[test]
    fn argument_ids() {
        let i32t = Type::Int { bits: 32 };
        let f = func_with_params(vec![
            Parameter {
                name: Name::from("p"),
                ty: i32t.clone(),
            },
            Parameter {
                name: Name::from(1usize),
                ty: i32t,
            },
        ]);
        let mut namer = ValueNamer::new(&f);
        assert_eq!(namer.local_id(&f.params[0].name), "p");
        assert_eq!(namer.local_id(&f.params[1].name), "arg1");
    }

    #[test]
    fn fresh_ids_are_memoized() {
        let f = func_with_params(Vec::new());
        let a = Name::from(4usize);
        let b = Name::from(7usize);
        let named = Name::from("x");
        let mut namer = ValueNamer::new(&f);
        assert_eq!(namer.local_id(&a), "v0");
        assert_eq!(namer.local_id(&b), "v1");
        assert_eq!(namer.local_id(&a), "v0");
        assert_eq!(namer.local_id(&named), "x");
    }

    #[test]
    fn constants_bypass_the_counter() {
        let f = func_with_params(Vec::new());
        let op = Operand::Constant(Constant::Int { bits: 32, value: 3 });
        let fresh = Name::from(0usize);
        let mut namer = ValueNamer::new(&f);
        assert_eq!(namer.operand_id(&op), "const:i32:3");
        assert_eq!(namer.local_id(&fresh), "v0");
    }
}
