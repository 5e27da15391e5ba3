//! Scalar values and the operator rules for every pairing of value kinds.

use num_traits::{ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Longest text that repetition may produce, in bytes.
pub const MAX_TEXT_LEN: usize = 1 << 28;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    /// Only produced by division.
    Real(f64),
    Text(String),
}

/// Failure of a single operator application.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("unsupported operand types for {op}: '{lhs}' and '{rhs}'")]
    Unsupported {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("bad operand type for unary -: '{0}'")]
    BadUnaryOperand(&'static str),
    #[error("integer overflow in {0}")]
    Overflow(&'static str),
    #[error("repeated text would exceed {} bytes", MAX_TEXT_LEN)]
    TextTooLong,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Text(_) => "str",
        }
    }

    /// Returns the numeric value widened to `f64`, or `None` for text.
    pub fn cast_to_number(&self) -> Option<f64> {
        match self {
            Value::Int(val) => val.to_f64(),
            Value::Real(val) => Some(*val),
            Value::Text(_) => None,
        }
    }

    fn unsupported(&self, op: &'static str, rhs: &Value) -> OpError {
        OpError::Unsupported {
            op,
            lhs: self.type_name(),
            rhs: rhs.type_name(),
        }
    }

    /// Applies a numeric operator: checked on two ints, widened to real otherwise.
    fn arithmetic(
        &self,
        rhs: &Value,
        op: &'static str,
        int_op: fn(i64, i64) -> Option<i64>,
        real_op: fn(f64, f64) -> f64,
    ) -> Result<Value, OpError> {
        if let (Value::Int(a), Value::Int(b)) = (self, rhs) {
            return int_op(*a, *b).map(Value::Int).ok_or(OpError::Overflow(op));
        }
        match (self.cast_to_number(), rhs.cast_to_number()) {
            (Some(a), Some(b)) => Ok(Value::Real(real_op(a, b))),
            _ => Err(self.unsupported(op, rhs)),
        }
    }

    pub fn try_add(&self, rhs: &Value) -> Result<Value, OpError> {
        match (self, rhs) {
            // handle string concatenation
            (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{}{}", a, b))),
            _ => self.arithmetic(rhs, "+", i64::checked_add, |a, b| a + b),
        }
    }

    pub fn try_sub(&self, rhs: &Value) -> Result<Value, OpError> {
        self.arithmetic(rhs, "-", i64::checked_sub, |a, b| a - b)
    }

    pub fn try_mul(&self, rhs: &Value) -> Result<Value, OpError> {
        match (self, rhs) {
            // text repetition, a negative count gives empty text
            (Value::Text(text), Value::Int(count)) | (Value::Int(count), Value::Text(text)) => {
                let count = usize::try_from(*count).unwrap_or(0);
                match text.len().checked_mul(count) {
                    Some(len) if len <= MAX_TEXT_LEN => Ok(Value::Text(text.repeat(count))),
                    _ => Err(OpError::TextTooLong),
                }
            }
            _ => self.arithmetic(rhs, "*", i64::checked_mul, |a, b| a * b),
        }
    }

    /// True division. Always produces a [`Value::Real`].
    pub fn try_div(&self, rhs: &Value) -> Result<Value, OpError> {
        match (self.cast_to_number(), rhs.cast_to_number()) {
            (Some(_), Some(b)) if b.is_zero() => Err(OpError::DivisionByZero),
            (Some(a), Some(b)) => Ok(Value::Real(a / b)),
            _ => Err(self.unsupported("/", rhs)),
        }
    }

    pub fn try_neg(&self) -> Result<Value, OpError> {
        match self {
            Value::Int(val) => val.checked_neg().map(Value::Int).ok_or(OpError::Overflow("-")),
            Value::Real(val) => Ok(Value::Real(-val)),
            Value::Text(_) => Err(OpError::BadUnaryOperand(self.type_name())),
        }
    }

    /// Equality across kinds. A number never equals text.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Text(_), _) | (_, Value::Text(_)) => false,
            _ => self.cast_to_number() == other.cast_to_number(),
        }
    }

    /// Ordering for `<`, `>`, `<=` and `>=`. Numbers and text are not ordered against each other.
    /// `Ok(None)` means both sides are numbers but unordered (NaN), so every ordering test is false.
    pub fn try_cmp(&self, other: &Value, op: &'static str) -> Result<Option<Ordering>, OpError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
            (Value::Text(a), Value::Text(b)) => Ok(Some(a.cmp(b))),
            _ => match (self.cast_to_number(), other.cast_to_number()) {
                (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
                _ => Err(self.unsupported(op, other)),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(val) => write!(f, "{}", val),
            Value::Real(val) => write_real(f, *val),
            Value::Text(val) => write!(f, "{}", val),
        }
    }
}

/// Shortest round-trip form with a fractional part (`2.0`), signed two-digit exponents (`1e+16`, `1e-05`).
fn write_real(f: &mut fmt::Formatter<'_>, val: f64) -> fmt::Result {
    if val.is_nan() {
        return f.write_str("nan");
    }
    // `Debug` keeps the fractional part, so `2.0` does not print as `2`
    let repr = format!("{:?}", val);
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&repr),
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::Int(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Real(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}
