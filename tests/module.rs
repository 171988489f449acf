use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use pubdata::analysis::{self, Options};
use pubdata::ir::terminator::{Br, Ret, TermOpcode};
use pubdata::{Block, Function, Module, Name, Sink, Sinks, Terminator, Type};

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

fn load_demo() -> Module {
    let text = std::fs::read_to_string("demos/linear.json").unwrap();
    serde_json::from_str(&text).unwrap()
}

// ------------------------------------------------------------------

#[test]
fn demo_module_parses_and_validates() {
    let module = load_demo();
    assert_eq!(module.name, "linear");
    assert_eq!(module.functions.len(), 2);
    module.validate().unwrap();
}

#[test]
fn demo_module_analyzes_end_to_end() {
    let module = load_demo();
    let (trace, cfg) = (Buf::default(), Buf::default());
    let mut sinks = Sinks {
        trace: Sink::from_writer(Box::new(trace.clone())),
        trace_index: Sink::disabled(),
        cfg: Sink::from_writer(Box::new(cfg.clone())),
    };
    analysis::run_module(&module, &Options::default(), &mut sinks);

    let cfg_lines = cfg.lines();
    let summaries: Vec<_> = cfg_lines
        .iter()
        .filter(|l| l["kind"] == "func_summary")
        .collect();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["fn"], "linear_arith");
    assert_eq!(summaries[0]["tx_count"], 0);
    // foo: a load, a store, and a conditional branch.
    assert_eq!(summaries[1]["fn"], "foo");
    assert_eq!(summaries[1]["tx_count"], 3);

    let paths: Vec<_> = cfg_lines
        .iter()
        .filter(|l| l["kind"] == "path" && l["fn"] == "foo")
        .collect();
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0]["bbs"], json!(["entry", "then", "merge"]));
    assert_eq!(paths[1]["bbs"], json!(["entry", "merge"]));

    // Both sinks saw both functions, trace stream first by construction.
    let trace_lines = trace.lines();
    assert!(trace_lines.iter().any(|l| l["fn"] == "linear_arith"));
    let phi = trace_lines
        .iter()
        .find(|l| l["op"] == "phi")
        .expect("no phi record");
    assert_eq!(phi["uses"], json!(["y2", "then", "y", "entry"]));
}

#[test]
fn validation_rejects_duplicate_blocks() {
    let ret = || Terminator {
        result: None,
        ty: Type::Void,
        opcode: TermOpcode::Ret(Ret { value: None }),
    };
    let module = Module {
        name: String::new(),
        functions: vec![Function {
            name: "dup".to_string(),
            params: Vec::new(),
            blocks: vec![
                Block {
                    name: Name::from("entry"),
                    instrs: Vec::new(),
                    term: ret(),
                },
                Block {
                    name: Name::from("entry"),
                    instrs: Vec::new(),
                    term: ret(),
                },
            ],
        }],
    };
    assert!(module.validate().is_err());
}

#[test]
fn validation_rejects_dangling_successors() {
    let module = Module {
        name: String::new(),
        functions: vec![Function {
            name: "dangle".to_string(),
            params: Vec::new(),
            blocks: vec![Block {
                name: Name::from("entry"),
                instrs: Vec::new(),
                term: Terminator {
                    result: None,
                    ty: Type::Void,
                    opcode: TermOpcode::Br(Br {
                        dest: Name::from("nowhere"),
                    }),
                },
            }],
        }],
    };
    assert!(module.validate().is_err());
}
