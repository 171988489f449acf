use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use pubdata::analysis::{self, Options};
use pubdata::ir::constant::Constant;
use pubdata::ir::instruction::{Opcode, Store};
use pubdata::ir::terminator::{Br, CondBr, IndirectBr, Ret, Switch, SwitchCase, TermOpcode};
use pubdata::{
    Block, Function, Instruction, Name, Operand, Parameter, Sink, Sinks, Terminator, Type,
};

// ------------------------------------------------------------------
// Helpers

#[derive(Clone, Default)]
struct Buf(Arc<Mutex<Vec<u8>>>);

impl Write for Buf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Buf {
    fn lines(&self) -> Vec<Value> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

fn i1t() -> Type {
    Type::Int { bits: 1 }
}

fn i32t() -> Type {
    Type::Int { bits: 32 }
}

fn local(name: &str, ty: Type) -> Operand {
    Operand::Local {
        name: Name::from(name),
        ty,
    }
}

fn store(value: Operand, address: Operand) -> Instruction {
    Instruction {
        result: None,
        ty: Type::Void,
        opcode: Opcode::Store(Store { value, address }),
    }
}

fn ret() -> Terminator {
    Terminator {
        result: None,
        ty: Type::Void,
        opcode: TermOpcode::Ret(Ret { value: None }),
    }
}

fn br(dest: &str) -> Terminator {
    Terminator {
        result: None,
        ty: Type::Void,
        opcode: TermOpcode::Br(Br {
            dest: Name::from(dest),
        }),
    }
}

fn cond_br(condition: Operand, true_dest: &str, false_dest: &str) -> Terminator {
    Terminator {
        result: None,
        ty: Type::Void,
        opcode: TermOpcode::CondBr(CondBr {
            condition,
            true_dest: Name::from(true_dest),
            false_dest: Name::from(false_dest),
        }),
    }
}

fn switch(condition: Operand, cases: Vec<(u64, &str)>, default_dest: Option<&str>) -> Terminator {
    Terminator {
        result: None,
        ty: Type::Void,
        opcode: TermOpcode::Switch(Switch {
            condition,
            cases: cases
                .into_iter()
                .map(|(value, dest)| SwitchCase {
                    value: Constant::Int { bits: 32, value },
                    dest: Name::from(dest),
                })
                .collect(),
            default_dest: default_dest.map(Name::from),
        }),
    }
}

fn block(name: &str, instrs: Vec<Instruction>, term: Terminator) -> Block {
    Block {
        name: Name::from(name),
        instrs,
        term,
    }
}

fn function(name: &str, params: Vec<Parameter>, blocks: Vec<Block>) -> Function {
    Function {
        name: name.to_string(),
        params,
        blocks,
    }
}

fn run_cfg(func: &Function, opts: &Options) -> Vec<Value> {
    let cfg = Buf::default();
    let mut sinks = Sinks {
        trace: Sink::disabled(),
        trace_index: Sink::disabled(),
        cfg: Sink::from_writer(Box::new(cfg.clone())),
    };
    analysis::run_function(func, opts, &mut sinks);
    cfg.lines()
}

fn of_kind<'v>(lines: &'v [Value], kind: &str) -> Vec<&'v Value> {
    lines.iter().filter(|l| l["kind"] == kind).collect()
}

fn diamond() -> Function {
    function(
        "foo",
        vec![Parameter {
            name: Name::from("c"),
            ty: i1t(),
        }],
        vec![
            block("entry", vec![], cond_br(local("c", i1t()), "then", "else")),
            block("then", vec![], br("merge")),
            block("else", vec![], br("merge")),
            block(
                "merge",
                vec![store(local("x", i32t()), local("p", Type::Pointer))],
                ret(),
            ),
        ],
    )
}

// ------------------------------------------------------------------

#[test]
fn summary_then_blocks_then_edges() {
    let lines = run_cfg(&diamond(), &Options::default());
    assert_eq!(lines[0]["kind"], "func_summary");

    let kinds: Vec<&str> = lines.iter().map(|l| l["kind"].as_str().unwrap()).collect();
    let first_block = kinds.iter().position(|k| *k == "block").unwrap();
    let last_block = kinds.iter().rposition(|k| *k == "block").unwrap();
    let first_edge = kinds.iter().position(|k| *k == "edge").unwrap();
    assert!(last_block < first_edge);
    assert_eq!(last_block - first_block + 1, 4);
}

#[test]
fn function_summary_counts() {
    let lines = run_cfg(&diamond(), &Options::default());
    let summary = &lines[0];
    assert_eq!(summary["fn"], "foo");
    assert_eq!(summary["bb_count"], 4);
    assert_eq!(summary["inst_count"], 5); // one store plus four terminators
    assert_eq!(summary["tx_count"], 2); // the branch condition and the store address

    // Trace is disabled, so nothing was emitted or truncated.
    assert_eq!(summary["trace_emitted"], 0);
    assert_eq!(summary["trace_truncated"], false);
}

#[test]
fn block_records_carry_successors_and_terminators() {
    let lines = run_cfg(&diamond(), &Options::default());
    let blocks = of_kind(&lines, "block");

    assert_eq!(blocks[0]["bb"], "entry");
    assert_eq!(blocks[0]["succs"], json!(["then", "else"]));
    assert_eq!(blocks[0]["term_op"], "br");
    assert_eq!(blocks[0]["cond"], "c");
    assert_eq!(blocks[0]["term_pp"], "foo:entry:i0");

    assert_eq!(blocks[1]["bb"], "then");
    assert_eq!(blocks[1]["succs"], json!(["merge"]));
    assert!(blocks[1].get("cond").is_none());

    assert_eq!(blocks[3]["bb"], "merge");
    assert_eq!(blocks[3]["succs"], json!([]));
    assert_eq!(blocks[3]["term_op"], "ret");
    assert_eq!(blocks[3]["term_pp"], "foo:merge:i1");
}

#[test]
fn conditional_edges_have_senses() {
    let lines = run_cfg(&diamond(), &Options::default());
    let edges = of_kind(&lines, "edge");

    assert_eq!(edges[0]["from"], "entry");
    assert_eq!(edges[0]["to"], "then");
    assert_eq!(edges[0]["branch"], "cond");
    assert_eq!(edges[0]["cond"], "c");
    assert_eq!(edges[0]["sense"], "true");
    assert_eq!(edges[1]["to"], "else");
    assert_eq!(edges[1]["sense"], "false");

    assert_eq!(edges[2]["from"], "then");
    assert_eq!(edges[2]["branch"], "uncond");
    assert!(edges[2].get("cond").is_none());
    assert_eq!(edges[3]["from"], "else");
}

#[test]
fn switch_edges_list_cases_then_default() {
    let f = function(
        "dispatch",
        vec![Parameter {
            name: Name::from("s"),
            ty: i32t(),
        }],
        vec![
            block(
                "entry",
                vec![],
                switch(local("s", i32t()), vec![(1, "a"), (7, "b")], Some("d")),
            ),
            block("a", vec![], ret()),
            block("b", vec![], ret()),
            block("d", vec![], ret()),
        ],
    );
    let lines = run_cfg(&f, &Options::default());

    // The block record lists the default destination first, IR order.
    let blocks = of_kind(&lines, "block");
    assert_eq!(blocks[0]["succs"], json!(["d", "a", "b"]));
    assert_eq!(blocks[0]["term_op"], "switch");
    assert_eq!(blocks[0]["cond"], "s");

    let edges = of_kind(&lines, "edge");
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0]["to"], "a");
    assert_eq!(edges[0]["branch"], "switch");
    assert_eq!(edges[0]["case"], "const:i32:1");
    assert_eq!(edges[1]["to"], "b");
    assert_eq!(edges[1]["case"], "const:i32:7");
    assert_eq!(edges[2]["to"], "d");
    assert_eq!(edges[2]["default"], true);
    assert!(edges[2].get("case").is_none());
}

#[test]
fn indirect_edges_carry_the_target_id() {
    let f = function(
        "jump",
        vec![Parameter {
            name: Name::from("t"),
            ty: Type::Pointer,
        }],
        vec![
            block(
                "entry",
                vec![],
                Terminator {
                    result: None,
                    ty: Type::Void,
                    opcode: TermOpcode::IndirectBr(IndirectBr {
                        target: local("t", Type::Pointer),
                        dests: vec![Name::from("a"), Name::from("b")],
                    }),
                },
            ),
            block("a", vec![], ret()),
            block("b", vec![], ret()),
        ],
    );
    let lines = run_cfg(&f, &Options::default());

    let blocks = of_kind(&lines, "block");
    assert_eq!(blocks[0]["target"], "t");
    assert_eq!(blocks[0]["term_op"], "indirectbr");

    let edges = of_kind(&lines, "edge");
    assert_eq!(edges.len(), 2);
    for e in &edges {
        assert_eq!(e["branch"], "indirect");
        assert_eq!(e["target"], "t");
    }
}

#[test]
fn degenerate_switch_is_a_leaf() {
    let f = function(
        "stuck",
        vec![Parameter {
            name: Name::from("s"),
            ty: i32t(),
        }],
        vec![block("entry", vec![], switch(local("s", i32t()), vec![], None))],
    );
    let lines = run_cfg(&f, &Options::default());

    let blocks = of_kind(&lines, "block");
    assert_eq!(blocks[0]["succs"], json!([]));
    assert!(of_kind(&lines, "edge").is_empty());

    // Path enumeration treats the block as a leaf.
    let paths = of_kind(&lines, "path");
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0]["bbs"], json!(["entry"]));
    assert_eq!(paths[0]["decisions"], json!([]));
}

#[test]
fn unnamed_blocks_get_ordinal_labels() {
    let f = function(
        "anon",
        Vec::new(),
        vec![
            Block {
                name: Name::from(0usize),
                instrs: Vec::new(),
                term: br_to_number(1),
            },
            Block {
                name: Name::from(1usize),
                instrs: Vec::new(),
                term: ret(),
            },
        ],
    );
    let lines = run_cfg(&f, &Options::default());
    let blocks = of_kind(&lines, "block");
    assert_eq!(blocks[0]["bb"], "bb0");
    assert_eq!(blocks[0]["succs"], json!(["bb1"]));
    assert_eq!(blocks[0]["term_pp"], "anon:bb0:i0");
}

fn br_to_number(dest: usize) -> Terminator {
    Terminator {
        result: None,
        ty: Type::Void,
        opcode: TermOpcode::Br(Br {
            dest: Name::from(dest),
        }),
    }
}
