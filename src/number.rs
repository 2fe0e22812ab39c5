use crate::error::{evaluation_error, Result};
use std::fmt::{self, Display, Formatter};

/// Numeric scalar. Source text containing only an integer literal becomes
/// `Int`, anything else that parses as a float becomes `Float`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn parse(text: &str) -> Option<Number> {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::Int(n));
        }
        text.parse::<f64>().ok().map(Number::Float)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(n) => n == 0.0,
        }
    }

    pub fn checked_add(self, rhs: Number) -> Result<Number> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(n) => Ok(Number::Int(n)),
                None => overflow(a, "+", b),
            },
            (a, b) => Ok(Number::Float(a.as_f64() + b.as_f64())),
        }
    }

    pub fn checked_sub(self, rhs: Number) -> Result<Number> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(n) => Ok(Number::Int(n)),
                None => overflow(a, "-", b),
            },
            (a, b) => Ok(Number::Float(a.as_f64() - b.as_f64())),
        }
    }

    pub fn checked_mul(self, rhs: Number) -> Result<Number> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_mul(b) {
                Some(n) => Ok(Number::Int(n)),
                None => overflow(a, "*", b),
            },
            (a, b) => Ok(Number::Float(a.as_f64() * b.as_f64())),
        }
    }

    /// True division: the result is always a float.
    pub fn checked_div(self, rhs: Number) -> Result<Number> {
        if rhs.is_zero() {
            return evaluation_error(format!("division by zero ({} / {})", self, rhs));
        }
        Ok(Number::Float(self.as_f64() / rhs.as_f64()))
    }

    pub fn checked_neg(self) -> Result<Number> {
        match self {
            Number::Int(n) => match n.checked_neg() {
                Some(n) => Ok(Number::Int(n)),
                None => evaluation_error(format!("integer overflow negating {}", n)),
            },
            Number::Float(n) => Ok(Number::Float(-n)),
        }
    }
}

fn overflow(a: i64, op: &str, b: i64) -> Result<Number> {
    evaluation_error(format!("integer overflow in ({} {} {})", op, a, b))
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Float(n)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{:?}", n),
        }
    }
}
