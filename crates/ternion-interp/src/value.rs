//! Stack values

use std::cmp::Ordering;
use std::fmt;
use ternion_core::{ResultData, Trit};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Trit(Trit),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

/// Numeric view of a value; trits count as their signed magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    pub(crate) fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Trit(_) => "trit",
        }
    }

    pub(crate) fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(n) => Some(Number::Int(*n)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Trit(t) => Some(Number::Int(t.to_signed() as i64)),
            Value::Text(_) => None,
        }
    }

    /// Trit view of a value: numbers by sign.
    pub fn as_trit(&self) -> Option<Trit> {
        match self {
            Value::Trit(t) => Some(*t),
            Value::Int(n) => Some(Trit::from_signed(*n)),
            Value::Float(f) if *f > 0.0 => Some(Trit::Success),
            Value::Float(f) if *f < 0.0 => Some(Trit::Failed),
            Value::Float(_) => Some(Trit::Pending),
            Value::Text(_) => None,
        }
    }

    /// Equality across numeric kinds; text only equals text.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
                (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
                _ => false,
            },
        }
    }

    /// Ordering between two numbers or two texts. `None` for mixed kinds.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => match (self.as_number()?, other.as_number()?) {
                (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
                (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
            },
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(n) => Value::Int(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl From<Value> for ResultData {
    fn from(v: Value) -> Self {
        match v {
            Value::Int(n) => ResultData::Integer(n),
            Value::Float(f) => ResultData::Float(f),
            Value::Text(s) => ResultData::Text(s),
            Value::Trit(t) => ResultData::Trit(t),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Trit(t) => write!(f, "{}", t),
        }
    }
}
