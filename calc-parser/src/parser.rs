use crate::ast::{Program, Stmt};
use crate::lexer::{Lexer, SpannedToken, Token};
use calc_source::{Diagnostic, DiagnosticKind, Source};
use std::mem;
use thiserror::Error;

mod expr;
mod stmt;

/// Deepest nesting of blocks, parentheses and unary operators the parser accepts.
pub const MAX_DEPTH: usize = 256;

/// A grammar violation. Parsing stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at '{found}', line {line}")]
    UnexpectedToken { found: String, line: usize },
    #[error("Syntax error at end of input")]
    UnexpectedEof,
    #[error("Syntax error: nesting too deep, line {line}")]
    TooDeep { line: usize },
}

impl ParseError {
    /// Returns `true` if more input could still turn the source into a valid program.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseError::UnexpectedEof)
    }
}

pub struct Parser<'a> {
    /// Cached token for peeking.
    current_token: Token,
    /// Line of `current_token`.
    current_line: usize,
    lexer: Lexer<'a>,
    /// Source code
    source: &'a Source<'a>,
    /// Current nesting of blocks and sub-expressions.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut parser = Self {
            current_token: Token::Eof,
            current_line: 1,
            lexer: Lexer::new(source),
            source,
            depth: 0,
        };
        parser.next();
        parser
    }
}

impl<'a> Parser<'a> {
    /// Parses the whole source. A program is one or more statements followed by the end of input.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let program = self.parse_block()?;
        if self.current_token != Token::Eof {
            return Err(self.unexpected());
        }
        Ok(program)
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn next(&mut self) -> Token {
        match self.lexer.next() {
            Some(SpannedToken { token, line }) => {
                self.current_token = token;
                self.current_line = line;
            }
            None => {
                self.current_token = Token::Eof;
                self.current_line = self.lexer.line();
            }
        }
        self.current_token.clone()
    }

    /// Predicate that tests whether the next token has the same discriminant and eats the next token if yes as a side effect.
    fn eat(&mut self, tok: Token) -> bool {
        if mem::discriminant(&self.current_token) == mem::discriminant(&tok) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Token) -> Result<(), ParseError> {
        if self.eat(tok) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current_token {
            Token::Identifier(ident) => {
                let ident = ident.clone();
                self.next();
                Ok(ident)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Enters one level of nesting. Every successful call is paired with [`Self::leave`].
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.source.errors.add_error(Diagnostic::new(
                DiagnosticKind::Syntax,
                "Nesting too deep",
                self.current_line,
            ));
            return Err(ParseError::TooDeep {
                line: self.current_line,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Builds an unexpected token error for the current token and records it on the source.
    fn unexpected(&self) -> ParseError {
        let error = match self.current_token {
            Token::Eof => ParseError::UnexpectedEof,
            ref token => ParseError::UnexpectedToken {
                found: token.to_string(),
                line: self.current_line,
            },
        };
        self.source.errors.add_error(Diagnostic::new(
            DiagnosticKind::Syntax,
            format!("Unexpected {}", self.current_token),
            self.current_line,
        ));
        error
    }
}
