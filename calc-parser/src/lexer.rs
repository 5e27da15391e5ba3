use calc_source::{Diagnostic, DiagnosticKind, Source};
use logos::{Logos, Skip};
use std::fmt;

#[derive(Debug, Logos, Clone, PartialEq)]
#[logos(extras = usize)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")] // comments run to the end of the line
pub enum Token {
    // literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    NumberLit(i64),
    #[regex(r#""[^"]*""#, |lex| lex.slice()[1..lex.slice().len() - 1].to_string())]
    StringLit(String),

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Equals,
    // - comparison
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEquals,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEquals,

    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(",")]
    Comma,

    // keywords
    #[token("if", ignore(ascii_case))]
    If,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("endif", ignore(ascii_case))]
    EndIf,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("to", ignore(ascii_case))]
    To,
    #[token("do", ignore(ascii_case))]
    Do,
    #[token("endfor", ignore(ascii_case))]
    EndFor,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("endwhile", ignore(ascii_case))]
    EndWhile,
    #[token("print", ignore(ascii_case))]
    Print,

    // misc
    /// Never emitted, newlines only advance the line counter.
    #[regex(r"\n", newline)]
    Newline,

    /// Only generated in parse phase when `lexer.next()` returns `None`.
    Eof,
}

fn newline(lex: &mut logos::Lexer<Token>) -> Skip {
    lex.extras += 1;
    Skip
}

impl Token {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` is reserved for accepting any expression.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Additive */
            Token::Plus | Token::Minus => Some((8, 9)),
            /* Multiplicative */
            Token::Asterisk | Token::Slash => Some((10, 11)),
            _ => None,
        }
    }

    /// Returns the prefix binding power or `None` if the token is not a prefix operator.
    /// Unary minus binds tighter than any binary operator.
    pub fn prefix_bp(&self) -> Option<u8> {
        match self {
            Token::Minus => Some(12),
            _ => None,
        }
    }

    /// Returns `true` if the token can begin a statement.
    pub fn starts_stmt(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_) | Token::If | Token::For | Token::While | Token::Print
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::NumberLit(val) => return write!(f, "{}", val),
            Token::StringLit(val) => return write!(f, "\"{}\"", val),
            Token::Identifier(ident) => return write!(f, "{}", ident),
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Asterisk => "*",
            Token::Slash => "/",
            Token::Equals => "=",
            Token::EqualsEquals => "==",
            Token::NotEquals => "!=",
            Token::GreaterThan => ">",
            Token::GreaterThanEquals => ">=",
            Token::LessThan => "<",
            Token::LessThanEquals => "<=",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Comma => ",",
            Token::If => "if",
            Token::Then => "then",
            Token::Else => "else",
            Token::EndIf => "endif",
            Token::For => "for",
            Token::To => "to",
            Token::Do => "do",
            Token::EndFor => "endfor",
            Token::While => "while",
            Token::EndWhile => "endwhile",
            Token::Print => "print",
            Token::Newline => "newline",
            Token::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A [`Token`] tagged with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Token stream over a [`Source`].
/// Unrecognized input is reported to `source.errors` and skipped.
///
/// The stream is finite and restartable: cloning a `Lexer` (or creating a new one) replays from that point.
#[derive(Clone)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, Token>,
    source: &'a Source<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            inner: Token::lexer_with_extras(source.content, 1),
            source,
        }
    }

    /// The line the lexer is currently on.
    pub fn line(&self) -> usize {
        self.inner.extras
    }

    fn report(&self, slice: &str, line: usize) {
        let message = if slice.chars().count() == 1 {
            format!("Illegal character '{}'", slice)
        } else {
            format!("Invalid token '{}'", slice)
        };
        tracing::debug!(line, "{}", message);
        self.source
            .errors
            .add_error(Diagnostic::new(DiagnosticKind::Lexical, message, line));
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<SpannedToken> {
        loop {
            let result = self.inner.next()?;
            let line = self.inner.extras;
            let slice = self.inner.slice();

            if result.is_err() && slice.starts_with('"') && slice.len() > 1 {
                // unterminated string: skip only the quote and lex the rest again
                self.report("\"", line);
                let rest = &self.inner.source()[self.inner.span().start + 1..];
                self.inner = Token::lexer_with_extras(rest, line);
                continue;
            }

            // strings (and malformed input) may span lines
            self.inner.extras += slice.matches('\n').count();

            match result {
                Ok(token) => return Some(SpannedToken { token, line }),
                Err(()) => self.report(slice, line),
            }
        }
    }
}
