// SPDX-License-Identifier: BSD-3-Clause
//! NDJSON output sinks. A sink opens its file lazily on the first write;
//! if the open or a write fails it logs one diagnostic and disables
//! itself, and analysis carries on without it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::error;

enum State {
    Pending(PathBuf),
    Open(Box<dyn Write>),
    Disabled,
}

pub struct Sink {
    state: State,
    lines: u64,
}

impl Sink {
    /// A sink that writes to `path`, opened on first use.
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Sink {
            state: State::Pending(path.into()),
            lines: 0,
        }
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Sink {
            state: State::Disabled,
            lines: 0,
        }
    }

    /// A sink over an already-open writer.
    pub fn from_writer(writer: Box<dyn Write>) -> Self {
        Sink {
            state: State::Open(writer),
            lines: 0,
        }
    }

    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Sink::to_path(p),
            None => Sink::disabled(),
        }
    }

    /// Whether writes can currently reach this sink. Does not force the
    /// lazy open; a pending sink whose open will fail still reports true.
    pub fn enabled(&self) -> bool {
        !matches!(self.state, State::Disabled)
    }

    /// Lines written so far; after an emit this is the 1-based line number
    /// of the record just written.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    fn writer(&mut self) -> Option<&mut dyn Write> {
        self.state = match std::mem::replace(&mut self.state, State::Disabled) {
            State::Pending(path) => match File::create(&path) {
                Ok(f) => State::Open(Box::new(BufWriter::new(f))),
                Err(e) => {
                    error!("failed to open {}: {}", path.display(), e);
                    State::Disabled
                }
            },
            other => other,
        };
        match &mut self.state {
            State::Open(w) => Some(w.as_mut()),
            _ => None,
        }
    }

    /// Write one record as a single NDJSON line.
    pub fn emit<T: Serialize>(&mut self, record: &T) {
        let Some(w) = self.writer() else { return };
        let result = serde_json::to_writer(&mut *w, record)
            .map_err(io::Error::from)
            .and_then(|()| w.write_all(b"\n"));
        match result {
            Ok(()) => self.lines += 1,
            Err(e) => {
                error!("write failed, disabling sink: {}", e);
                self.state = State::Disabled;
            }
        }
    }

    pub fn flush(&mut self) {
        if let State::Open(w) = &mut self.state {
            if let Err(e) = w.flush() {
                error!("flush failed: {}", e);
            }
        }
    }
}

/// The three output streams, constructed once per process and handed into
/// the analyzer.
pub struct Sinks {
    pub trace: Sink,
    pub trace_index: Sink,
    pub cfg: Sink,
}

impl Sinks {
    pub fn flush(&mut self) {
        self.trace.flush();
        self.trace_index.flush();
        self.cfg.flush();
    }
}
