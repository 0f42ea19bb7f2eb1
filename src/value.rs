//! Runtime values and the operator rules defined over them.

use serde::Serialize;
use std::fmt;

use crate::error::RuntimeError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
}

/// Kind discriminator of a [`Value`], used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Nil,
    Number,
    String,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Nil => "nil",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
        };

        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Nil => ValueKind::Nil,
        }
    }

    /// `nil`, `0`, `""` and `false` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bool(b) => *b,
        }
    }

    /// Values of different kinds are never equal.  Numbers follow IEEE‑754,
    /// so `NaN` is unequal to itself.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }

    /// `+`: numeric addition or string concatenation.
    pub fn plus(self, rhs: Value) -> Result<Value, RuntimeError> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (a, b) => Err(operands_error("+", &a, &b)),
        }
    }

    pub fn minus(self, rhs: Value) -> Result<Value, RuntimeError> {
        let (a, b) = numbers("-", &self, &rhs)?;
        Ok(Value::Number(a - b))
    }

    pub fn times(self, rhs: Value) -> Result<Value, RuntimeError> {
        let (a, b) = numbers("*", &self, &rhs)?;
        Ok(Value::Number(a * b))
    }

    /// Division by zero is not an error: it yields `inf`, `-inf` or `NaN`.
    pub fn divide(self, rhs: Value) -> Result<Value, RuntimeError> {
        let (a, b) = numbers("/", &self, &rhs)?;
        Ok(Value::Number(a / b))
    }

    /// Ordering comparison for `>`, `>=`, `<`, `<=`.
    pub fn compare(
        &self,
        operator: &str,
        rhs: &Value,
        cmp: fn(f64, f64) -> bool,
    ) -> Result<Value, RuntimeError> {
        let (a, b) = numbers(operator, self, rhs)?;
        Ok(Value::Bool(cmp(a, b)))
    }

    pub fn negate(self) -> Result<Value, RuntimeError> {
        match self {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(RuntimeError::InvalidOperand {
                operator: "-".to_string(),
                kind: other.kind(),
            }),
        }
    }

    pub fn invert(&self) -> Value {
        Value::Bool(!self.is_truthy())
    }
}

/// Both operands must share a kind before the operator itself is checked.
fn operands_error(operator: &str, left: &Value, right: &Value) -> RuntimeError {
    if left.kind() != right.kind() {
        RuntimeError::MismatchedTypes {
            left: left.kind(),
            right: right.kind(),
        }
    } else {
        RuntimeError::InvalidOperands {
            operator: operator.to_string(),
            kind: left.kind(),
        }
    }
}

fn numbers(operator: &str, left: &Value, right: &Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        (a, b) => Err(operands_error(operator, a, b)),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `{}` on f64 prints 2.0 as "2", never uses exponents, and
            // renders infinity as "inf".
            Value::Number(n) => write!(f, "{}", n),

            Value::String(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),
        }
    }
}
