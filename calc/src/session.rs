//! Incremental, line-by-line evaluation for interactive use.

use calc_interp::{Interpreter, Outcome, RuntimeError, Store, UndefinedVariable};
use calc_parser::parser::ParseError;
use calc_source::{Diagnostic, DiagnosticKind, Source};
use std::io::Write;

/// What happened to the buffered input after a line was fed.
#[derive(Debug)]
pub enum Status {
    /// The buffer parsed and ran to completion.
    Evaluated(Vec<Outcome>),
    /// The buffer ends in the middle of a statement. It is kept for the next line.
    Incomplete,
    /// The buffer can never parse. It has been discarded.
    Rejected(ParseError),
    /// Evaluation aborted. Statements before the failure keep their effects.
    Failed(RuntimeError),
}

#[derive(Debug)]
pub struct Feed {
    pub status: Status,
    /// Lexical diagnostics of the consumed buffer. Empty while the buffer is incomplete.
    pub diagnostics: Vec<Diagnostic>,
    pub warnings: Vec<UndefinedVariable>,
}

impl Feed {
    fn new(status: Status) -> Self {
        Self {
            status,
            diagnostics: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// One interactive session: a persistent [`Store`] plus the not-yet-parsed input.
#[derive(Debug, Default)]
pub struct Session {
    store: Store,
    buffer: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns `true` if earlier lines are waiting for the rest of a statement.
    pub fn is_buffering(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Appends `line` to the buffer and tries to parse and run everything buffered so far.
    pub fn feed(&mut self, line: &str, out: impl Write) -> Feed {
        self.buffer.push_str(line);
        self.buffer.push('\n');

        let (parsed, diagnostics) = {
            let source = Source::new(&self.buffer);
            let parsed = crate::parse_program(&source);
            let diagnostics: Vec<Diagnostic> = source
                .errors
                .diagnostics()
                .into_iter()
                .filter(|diagnostic| diagnostic.kind == DiagnosticKind::Lexical)
                .collect();
            (parsed, diagnostics)
        };

        let program = match parsed {
            Ok(program) => program,
            Err(error) if error.is_incomplete() => return Feed::new(Status::Incomplete),
            Err(error) => {
                self.buffer.clear();
                return Feed {
                    diagnostics,
                    ..Feed::new(Status::Rejected(error))
                };
            }
        };
        self.buffer.clear();

        let mut interpreter = Interpreter::new(&mut self.store, out);
        let status = match interpreter.evaluate(&program) {
            Ok(results) => Status::Evaluated(results),
            Err(error) => Status::Failed(error),
        };
        Feed {
            status,
            diagnostics,
            warnings: interpreter.warnings().to_vec(),
        }
    }
}
