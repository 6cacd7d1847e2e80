//! Tagged numeric value carried through validation results.
//!
//! Measured values and thresholds are stored as [`Numeric`] rather than as
//! loose `serde_json::Value`s, and leave the process only through
//! [`Numeric::to_interchange`]. Non-finite floats become the strings
//! `"NaN"`, `"Infinity"` and `"-Infinity"`, so conversion is total and the
//! original value can be recovered with [`Numeric::from_interchange`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const NAN_TOKEN: &str = "NaN";
const POS_INF_TOKEN: &str = "Infinity";
const NEG_INF_TOKEN: &str = "-Infinity";

/// A portable numeric value: float, integer, boolean or array thereof.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Float(f64),
    Int(i64),
    Bool(bool),
    Array(Vec<Numeric>),
}

impl Numeric {
    /// Convert to the interchange representation. Never fails.
    pub fn to_interchange(&self) -> Value {
        match self {
            Numeric::Float(x) if x.is_nan() => Value::String(NAN_TOKEN.to_string()),
            Numeric::Float(x) if x.is_infinite() => {
                let token = if *x > 0.0 { POS_INF_TOKEN } else { NEG_INF_TOKEN };
                Value::String(token.to_string())
            }
            Numeric::Float(x) => serde_json::Number::from_f64(*x)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(NAN_TOKEN.to_string())),
            Numeric::Int(i) => Value::Number((*i).into()),
            Numeric::Bool(b) => Value::Bool(*b),
            Numeric::Array(items) => Value::Array(items.iter().map(Numeric::to_interchange).collect()),
        }
    }

    /// Inverse of [`Numeric::to_interchange`]; `None` for values that are not numeric.
    pub fn from_interchange(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Numeric::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Numeric::Int)
                .or_else(|| n.as_f64().map(Numeric::Float)),
            Value::String(s) => match s.as_str() {
                NAN_TOKEN => Some(Numeric::Float(f64::NAN)),
                POS_INF_TOKEN => Some(Numeric::Float(f64::INFINITY)),
                NEG_INF_TOKEN => Some(Numeric::Float(f64::NEG_INFINITY)),
                _ => None,
            },
            Value::Array(items) => items
                .iter()
                .map(Numeric::from_interchange)
                .collect::<Option<Vec<_>>>()
                .map(Numeric::Array),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Scalar view as f64. Booleans map to 0/1, arrays have no scalar view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Float(x) => Some(*x),
            Numeric::Int(i) => Some(*i as f64),
            Numeric::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Numeric::Array(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Numeric::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True when the value (or every element) is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Numeric::Float(x) => x.is_finite(),
            Numeric::Int(_) | Numeric::Bool(_) => true,
            Numeric::Array(items) => items.iter().all(Numeric::is_finite),
        }
    }
}

impl std::fmt::Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Float(x) if x.is_finite() && x.abs() >= 1e6 => write!(f, "{x:.4e}"),
            Numeric::Float(x) if x.is_finite() && x.fract() != 0.0 => write!(f, "{x:.4}"),
            Numeric::Float(x) => write!(f, "{x}"),
            Numeric::Int(i) => write!(f, "{i}"),
            Numeric::Bool(b) => write!(f, "{b}"),
            Numeric::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_interchange().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Numeric::from_interchange(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("not a numeric value: {value}")))
    }
}

impl From<f64> for Numeric {
    fn from(x: f64) -> Self {
        Numeric::Float(x)
    }
}

impl From<f32> for Numeric {
    fn from(x: f32) -> Self {
        Numeric::Float(f64::from(x))
    }
}

impl From<i64> for Numeric {
    fn from(i: i64) -> Self {
        Numeric::Int(i)
    }
}

impl From<i32> for Numeric {
    fn from(i: i32) -> Self {
        Numeric::Int(i64::from(i))
    }
}

impl From<u32> for Numeric {
    fn from(i: u32) -> Self {
        Numeric::Int(i64::from(i))
    }
}

impl From<usize> for Numeric {
    fn from(i: usize) -> Self {
        i64::try_from(i)
            .map(Numeric::Int)
            .unwrap_or(Numeric::Float(i as f64))
    }
}

impl From<u64> for Numeric {
    fn from(i: u64) -> Self {
        i64::try_from(i)
            .map(Numeric::Int)
            .unwrap_or(Numeric::Float(i as f64))
    }
}

impl From<bool> for Numeric {
    fn from(b: bool) -> Self {
        Numeric::Bool(b)
    }
}

impl<T: Into<Numeric>> From<Vec<T>> for Numeric {
    fn from(items: Vec<T>) -> Self {
        Numeric::Array(items.into_iter().map(Into::into).collect())
    }
}
