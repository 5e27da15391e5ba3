use super::*;
use crate::ast::{BinaryOp, ComparisonOp, Condition, Expr, UnaryOp};

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any arithmetic expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> Result<Expr, ParseError> {
        // NOTE: prefix operators are handled here
        if let Some(prefix_bp) = self.current_token.prefix_bp() {
            self.next();
            self.enter()?;
            let arg = self.parse_expr_bp(prefix_bp)?;
            self.leave();
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                arg: Box::new(arg),
            });
        }

        match self.current_token.clone() {
            Token::NumberLit(val) => {
                self.next();
                Ok(Expr::NumberLit(val))
            }
            Token::StringLit(val) => {
                self.next();
                Ok(Expr::StringLit(val))
            }
            Token::Identifier(ident) => {
                self.next();
                Ok(Expr::Var(ident))
            }
            Token::OpenParen => {
                self.next();
                self.enter()?;
                let expr = self.parse_expr()?;
                self.leave();
                self.expect(Token::CloseParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_primary_expr()?;

        loop {
            let (l_bp, r_bp) = match self.current_token.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token is a valid binop
            let op = match BinaryOp::from_token(&self.current_token) {
                Some(op) => op,
                None => break,
            };
            self.next();

            let rhs = self.parse_expr_bp(r_bp)?;

            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            }
        }

        Ok(lhs)
    }

    /* Conditions */
    /// Parses `expr <cmp> expr`. Comparisons do not chain.
    pub fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let lhs = self.parse_expr()?;
        let op = ComparisonOp::from_token(&self.current_token).ok_or_else(|| self.unexpected())?;
        self.next();
        let rhs = self.parse_expr()?;
        Ok(Condition { lhs, op, rhs })
    }
}
