use super::*;

impl<'a> Parser<'a> {
    /// Parses one or more statements, stopping at the first token that cannot begin a statement.
    pub fn parse_block(&mut self) -> Result<Program, ParseError> {
        self.enter()?;
        let mut statements = vec![self.parse_stmt()?];
        while self.current_token.starts_stmt() {
            statements.push(self.parse_stmt()?);
        }
        self.leave();
        Ok(Program::new(statements))
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current_token {
            Token::Identifier(_) => self.parse_assign_stmt(),
            Token::If => self.parse_if_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::Print => self.parse_print_stmt(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let ident = self.expect_identifier()?;
        self.expect(Token::Equals)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign { ident, value })
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::If)?;
        let condition = self.parse_condition()?;
        self.expect(Token::Then)?;
        let then_block = self.parse_block()?;
        let else_block = if self.eat(Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        self.expect(Token::EndIf)?;
        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::For)?;
        let ident = self.expect_identifier()?;
        self.expect(Token::Equals)?;
        let start = self.parse_expr()?;
        self.expect(Token::To)?;
        let end = self.parse_expr()?;
        self.expect(Token::Do)?;
        let body = self.parse_block()?;
        self.expect(Token::EndFor)?;
        Ok(Stmt::For {
            ident,
            start,
            end,
            body,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::While)?;
        let condition = self.parse_condition()?;
        self.expect(Token::Do)?;
        let body = self.parse_block()?;
        self.expect(Token::EndWhile)?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_print_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Print)?;
        self.expect(Token::OpenParen)?;
        let expr = self.parse_expr()?;
        self.expect(Token::CloseParen)?;
        Ok(Stmt::Print(expr))
    }
}
