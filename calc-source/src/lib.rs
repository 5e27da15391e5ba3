//! Source text representation and diagnostic management.

use std::{cell::RefCell, fmt};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated diagnostics.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated diagnostics. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// The stage that produced a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An unrecognized character or malformed literal. Lexing skips it and continues.
    Lexical,
    /// A grammar violation.
    Syntax,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "Lexical error"),
            DiagnosticKind::Syntax => write!(f, "Syntax error"),
        }
    }
}

/// A message tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// 1-based line number.
    pub line: usize,
}

impl Diagnostic {
    /// Create a new diagnostic with the specified `kind`, `message` and `line`.
    pub fn new(kind: DiagnosticKind, message: impl ToString, line: usize) -> Self {
        Self {
            kind,
            message: message.to_string(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{kind}: {message} at line {line}",
            kind = self.kind,
            message = self.message,
            line = self.line
        )
    }
}

/// Manages all the diagnostics of a [`Source`].
pub struct ErrorReporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Adds a diagnostic to the `ErrorReporter`.
    /// This method uses the interior mutability pattern so that the lexer can report through a shared `&Source`.
    pub fn add_error(&self, diagnostic: Diagnostic) {
        // This should be the only place where self.diagnostics is borrowed mutably.
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Returns a copy of the accumulated diagnostics, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in self.diagnostics.borrow().iter() {
            writeln!(f, "{}", diagnostic)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_accumulates_in_order() {
        let source: Source = "x = 1".into();
        assert!(source.has_no_errors());

        source
            .errors
            .add_error(Diagnostic::new(DiagnosticKind::Lexical, "Illegal character '$'", 1));
        source
            .errors
            .add_error(Diagnostic::new(DiagnosticKind::Lexical, "Illegal character '@'", 3));

        assert!(!source.has_no_errors());
        assert_eq!(source.errors.len(), 2);
        assert_eq!(source.errors.diagnostics()[1].line, 3);
        assert_eq!(
            source.errors.to_string(),
            "Lexical error: Illegal character '$' at line 1\n\
             Lexical error: Illegal character '@' at line 3\n"
        );
    }
}
