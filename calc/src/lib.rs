//! Text in, printed output and statement results out.

pub mod session;

use calc_interp::{evaluate, Outcome, RuntimeError, Store};
use calc_parser::ast::Program;
use calc_parser::parser::{ParseError, Parser};
use calc_source::Source;
use std::io::Write;
use thiserror::Error;

pub use session::{Feed, Session, Status};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Parses `source` into a [`Program`].
/// Lexical errors do not fail the parse, they are left in `source.errors`.
pub fn parse_program(source: &Source) -> Result<Program, ParseError> {
    Parser::new(source).parse_program()
}

/// Parses and evaluates `text` against `store`, writing printed values to `out`.
pub fn run(text: &str, store: &mut Store, out: impl Write) -> Result<Vec<Outcome>, Error> {
    let source = Source::new(text);
    let program = parse_program(&source)?;
    Ok(evaluate(&program, store, out)?)
}
