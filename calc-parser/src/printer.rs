//! Renders the AST back into canonical source text.
//!
//! Binary expressions are always parenthesised, so the printed text parses back into an equal tree.

use crate::ast::{BinaryOp, ComparisonOp, Condition, Expr, Program, Stmt, UnaryOp};
use std::fmt;

const INDENT: &str = "    ";

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("-"),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Greater => ">",
            ComparisonOp::Less => "<",
            ComparisonOp::GreaterEq => ">=",
            ComparisonOp::LessEq => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::NotEq => "!=",
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::NumberLit(val) => write!(f, "{}", val),
            Expr::StringLit(val) => write!(f, "\"{}\"", val),
            Expr::Var(ident) => write!(f, "{}", ident),
            Expr::Binary { lhs, op, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Unary { op, arg } => write!(f, "{}{}", op, arg),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, self, 0)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, program: &Program, depth: usize) -> fmt::Result {
    for stmt in &program.statements {
        write_stmt(f, stmt, depth)?;
    }
    Ok(())
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    match stmt {
        Stmt::Assign { ident, value } => writeln!(f, "{}{} = {}", indent, ident, value),
        Stmt::Print(expr) => writeln!(f, "{}print({})", indent, expr),
        Stmt::If {
            condition,
            then_block,
            else_block,
        } => {
            writeln!(f, "{}if {} then", indent, condition)?;
            write_block(f, then_block, depth + 1)?;
            if let Some(else_block) = else_block {
                writeln!(f, "{}else", indent)?;
                write_block(f, else_block, depth + 1)?;
            }
            writeln!(f, "{}endif", indent)
        }
        Stmt::For {
            ident,
            start,
            end,
            body,
        } => {
            writeln!(f, "{}for {} = {} to {} do", indent, ident, start, end)?;
            write_block(f, body, depth + 1)?;
            writeln!(f, "{}endfor", indent)
        }
        Stmt::While { condition, body } => {
            writeln!(f, "{}while {} do", indent, condition)?;
            write_block(f, body, depth + 1)?;
            writeln!(f, "{}endwhile", indent)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Program;
    use crate::parser::Parser;

    fn parse(source: &str) -> Program {
        let source = source.into();
        Parser::new(&source).parse_program().unwrap()
    }

    #[test]
    fn test_canonical_form() {
        let ast = parse(
            "X=2+3*-4 FOR i=1 TO x DO IF i>=2 THEN print(\"big\") ELSE print(i) ENDIF ENDFOR",
        );
        assert_eq!(
            ast.to_string(),
            "X = (2 + (3 * -4))\n\
             for i = 1 to x do\n\
             \x20   if i >= 2 then\n\
             \x20       print(\"big\")\n\
             \x20   else\n\
             \x20       print(i)\n\
             \x20   endif\n\
             endfor\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let sources = [
            "print(2 + 3 * 4)",
            "print((2 + 3) * 4)",
            "x = --(1 - 2) / 3 - 4",
            "n = 10 while n > 0 do n = n - 1 if n == 5 then print(\"half\") endif endwhile",
            "for i = -1 to 3 * 2 do s = s + \"#\" endfor print(s)",
        ];
        for source in sources {
            let ast = parse(source);
            let printed = ast.to_string();
            let reparsed = parse(&printed);
            assert_eq!(reparsed, ast, "round trip of {:?} via {:?}", source, printed);
            assert_eq!(reparsed.to_string(), printed);
        }
    }
}
