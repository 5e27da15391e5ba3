use crate::store::{Store, UndefinedVariable};
use calc_parser::ast::{BinaryOp, ComparisonOp, Condition, Expr, Program, Stmt, UnaryOp};
use calc_value::{OpError, Value};
use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Aborts the in-flight evaluation. Effects of earlier statements stay in the [`Store`].
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Op(#[from] OpError),
    #[error("for loop bound must be an int, got '{0}'")]
    NonIntegerBound(&'static str),
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, RuntimeError::Op(OpError::DivisionByZero))
    }
}

/// The result of a statement.
/// Blocks and loops produce a [`Outcome::Seq`], possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Seq(Vec<Outcome>),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(val) => write!(f, "{}", val),
            Outcome::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Tree-walking interpreter. `print` writes to `out`.
pub struct Interpreter<'s, W> {
    store: &'s mut Store,
    out: W,
    /// Undefined variable reads since construction.
    warnings: Vec<UndefinedVariable>,
}

impl<'s, W: Write> Interpreter<'s, W> {
    pub fn new(store: &'s mut Store, out: W) -> Self {
        Self {
            store,
            out,
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[UndefinedVariable] {
        &self.warnings
    }

    /// Evaluates every statement of `program` in order and returns the results of those that produced one.
    pub fn evaluate(&mut self, program: &Program) -> Result<Vec<Outcome>, RuntimeError> {
        tracing::debug!(statements = program.statements.len(), "evaluating program");
        self.eval_program(program)
    }

    fn eval_program(&mut self, program: &Program) -> Result<Vec<Outcome>, RuntimeError> {
        let mut results = Vec::new();
        for stmt in &program.statements {
            if let Some(outcome) = self.eval_stmt(stmt)? {
                results.push(outcome);
            }
        }
        Ok(results)
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Option<Outcome>, RuntimeError> {
        match stmt {
            Stmt::Assign { ident, value } => {
                let value = self.eval_expr(value)?;
                Ok(Some(Outcome::Value(self.store.set(ident.as_str(), value).clone())))
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                if self.eval_condition(condition)? {
                    Ok(Some(Outcome::Seq(self.eval_program(then_block)?)))
                } else if let Some(else_block) = else_block {
                    Ok(Some(Outcome::Seq(self.eval_program(else_block)?)))
                } else {
                    Ok(None)
                }
            }
            Stmt::For {
                ident,
                start,
                end,
                body,
            } => {
                // bounds are evaluated once, before the first iteration
                let start = self.eval_bound(start)?;
                let end = self.eval_bound(end)?;

                let mut results = Vec::new();
                for i in start..=end {
                    self.store.set(ident.as_str(), Value::Int(i));
                    results.push(Outcome::Seq(self.eval_program(body)?));
                }
                Ok(Some(Outcome::Seq(results)))
            }
            Stmt::While { condition, body } => {
                let mut results = Vec::new();
                while self.eval_condition(condition)? {
                    results.push(Outcome::Seq(self.eval_program(body)?));
                }
                Ok(Some(Outcome::Seq(results)))
            }
            Stmt::Print(expr) => {
                let value = self.eval_expr(expr)?;
                writeln!(self.out, "{}", value)?;
                Ok(Some(Outcome::Value(value)))
            }
        }
    }

    fn eval_bound(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        match self.eval_expr(expr)? {
            Value::Int(val) => Ok(val),
            other => Err(RuntimeError::NonIntegerBound(other.type_name())),
        }
    }

    fn eval_condition(&mut self, condition: &Condition) -> Result<bool, RuntimeError> {
        let lhs = self.eval_expr(&condition.lhs)?;
        let rhs = self.eval_expr(&condition.rhs)?;

        let result = match condition.op {
            ComparisonOp::Eq => lhs.loose_eq(&rhs),
            ComparisonOp::NotEq => !lhs.loose_eq(&rhs),
            ComparisonOp::Greater => lhs.try_cmp(&rhs, ">")? == Some(Ordering::Greater),
            ComparisonOp::Less => lhs.try_cmp(&rhs, "<")? == Some(Ordering::Less),
            ComparisonOp::GreaterEq => matches!(
                lhs.try_cmp(&rhs, ">=")?,
                Some(Ordering::Greater | Ordering::Equal)
            ),
            ComparisonOp::LessEq => matches!(
                lhs.try_cmp(&rhs, "<=")?,
                Some(Ordering::Less | Ordering::Equal)
            ),
        };
        Ok(result)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::NumberLit(val) => Ok(Value::Int(*val)),
            Expr::StringLit(val) => Ok(Value::Text(val.clone())),
            Expr::Var(ident) => match self.store.get(ident) {
                Ok(val) => Ok(val.clone()),
                Err(undefined) => {
                    // reading an undefined variable is lenient: warn and continue with 0
                    tracing::debug!("Semantic error: {}", undefined);
                    self.warnings.push(undefined);
                    Ok(Value::Int(0))
                }
            },
            Expr::Binary { lhs, op, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                let result = match op {
                    BinaryOp::Add => lhs.try_add(&rhs),
                    BinaryOp::Sub => lhs.try_sub(&rhs),
                    BinaryOp::Mul => lhs.try_mul(&rhs),
                    BinaryOp::Div => lhs.try_div(&rhs),
                };
                Ok(result?)
            }
            Expr::Unary { op, arg } => {
                let arg = self.eval_expr(arg)?;
                match op {
                    UnaryOp::Neg => Ok(arg.try_neg()?),
                }
            }
        }
    }
}

/// Evaluates `program` against `store` in a one-shot [`Interpreter`].
pub fn evaluate(
    program: &Program,
    store: &mut Store,
    out: impl Write,
) -> Result<Vec<Outcome>, RuntimeError> {
    Interpreter::new(store, out).evaluate(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_parser::parser::Parser;

    fn parse(source: &str) -> Program {
        let source = source.into();
        Parser::new(&source).parse_program().unwrap()
    }

    /// Runs `source` in a fresh store and returns the printed output.
    fn run(source: &str) -> String {
        let mut out = Vec::new();
        evaluate(&parse(source), &mut Store::new(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(run("print(2 + 3 * 4)"), "14\n");
        assert_eq!(run("print((2 + 3) * 4)"), "20\n");
        assert_eq!(run("print(-2 * 3)"), "-6\n");
        assert_eq!(run("print(10 - 4 - 3)"), "3\n");
    }

    #[test]
    fn test_top_level_results() {
        let mut store = Store::new();
        let results = evaluate(&parse("x = 5 print(x + 1)"), &mut store, Vec::new()).unwrap();
        assert_eq!(
            results,
            vec![Outcome::Value(Value::Int(5)), Outcome::Value(Value::Int(6))]
        );
    }

    #[test]
    fn test_if_without_taken_branch_yields_nothing() {
        let mut store = Store::new();
        let results = evaluate(&parse("if 1 > 2 then print(1) endif"), &mut store, Vec::new()).unwrap();
        assert!(results.is_empty());

        let results = evaluate(
            &parse("if 1 > 2 then print(1) else print(2) endif"),
            &mut store,
            Vec::new(),
        )
        .unwrap();
        assert_eq!(
            results,
            vec![Outcome::Seq(vec![Outcome::Value(Value::Int(2))])]
        );
    }

    #[test]
    fn test_for_collects_each_iteration() {
        let mut store = Store::new();
        let mut out = Vec::new();
        let results = evaluate(&parse("for i = 1 to 3 do print(i) endfor"), &mut store, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n2\n3\n");
        assert_eq!(results[0].to_string(), "[[1], [2], [3]]");
        assert_eq!(store.get("i"), Ok(&Value::Int(3)));
    }

    #[test]
    fn test_for_bounds_evaluated_once() {
        assert_eq!(
            run("n = 3 for i = 1 to n do n = n + 1 endfor print(n)"),
            "6\n"
        );
    }

    #[test]
    fn test_for_bound_must_be_int() {
        let mut store = Store::new();
        let err = evaluate(&parse("for i = 1 to 5 / 2 do print(i) endfor"), &mut store, Vec::new())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::NonIntegerBound("real")));
    }

    #[test]
    fn test_while() {
        assert_eq!(
            run("n = 3 while n > 0 do print(n) n = n - 1 endwhile"),
            "3\n2\n1\n"
        );
        assert_eq!(run("while 1 < 0 do print(1) endwhile print(0)"), "0\n");
    }

    #[test]
    fn test_undefined_variable_defaults_to_zero() {
        let mut store = Store::new();
        let mut out = Vec::new();
        let program = parse("print(y + 1)");
        let mut interpreter = Interpreter::new(&mut store, &mut out);
        interpreter.evaluate(&program).unwrap();
        assert_eq!(
            interpreter.warnings(),
            &[UndefinedVariable {
                name: "y".to_string()
            }]
        );
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
    }

    #[test]
    fn test_division_by_zero_aborts_but_keeps_prior_effects() {
        let mut store = Store::new();
        let mut out = Vec::new();
        let err = evaluate(&parse("x = 1 print(x) print(1 / 0) x = 2"), &mut store, &mut out)
            .unwrap_err();
        assert!(err.is_division_by_zero());
        assert_eq!(err.to_string(), "division by zero");
        assert_eq!(String::from_utf8(out).unwrap(), "1\n");
        assert_eq!(store.get("x"), Ok(&Value::Int(1)));
    }

    #[test]
    fn test_strings() {
        assert_eq!(run("s = \"ab\" print(s + \"cd\") print(s * 2)"), "abcd\nabab\n");
        assert_eq!(
            run("if \"abc\" < \"abd\" then print(\"lt\") endif if 1 != \"1\" then print(\"ne\") endif"),
            "lt\nne\n"
        );
    }

    #[test]
    fn test_type_error_aborts() {
        let mut store = Store::new();
        let err = evaluate(&parse("print(\"a\" - 1)"), &mut store, Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "unsupported operand types for -: 'str' and 'int'");
    }

    #[test]
    fn test_unordered_reals_compare_false() {
        assert_eq!(
            run(r#"
                x = 1 / 1
                n = 0
                while n < 400 do x = x * 1000 n = n + 1 endwhile
                y = x - x
                if y < 1 then print("lt") else print("not lt") endif
                if y >= 1 then print("ge") else print("not ge") endif
                if y != y then print("ne") endif"#),
            "not lt\nnot ge\nne\n"
        );
    }

    #[test]
    fn test_repetition_overflow_aborts() {
        let mut store = Store::new();
        let err = evaluate(&parse("print(\"abc\" * 9223372036854775807)"), &mut store, Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "repeated text would exceed 268435456 bytes");
    }

    #[test]
    fn test_reassignment_changes_kind() {
        assert_eq!(run("x = 1 x = x / 2 print(x) x = \"done\" print(x)"), "0.5\ndone\n");
    }
}
