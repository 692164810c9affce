//! Hyperparameter and fidelity values.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A concrete value of a hyperparameter, a fidelity or a table cell.
///
/// Values are totally ordered so they can key sorted indices: numbers compare
/// numerically regardless of variant, and every number sorts before every
/// string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParameterValue {
    /// Parse a raw table cell: integer first, then float, else string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Self::Int(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return Self::Float(v);
        }
        Self::Str(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(_) => None,
        }
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl Ord for ParameterValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Str(_), _) => Ordering::Greater,
            (_, Self::Str(_)) => Ordering::Less,
            (Self::Int(a), Self::Float(b)) => cmp_int_float(*a, *b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Self::Float(a), Self::Float(b)) => cmp_floats(*a, *b),
        }
    }
}

/// Numeric order, with NaN placed by `total_cmp` so the order stays total.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer with a float, without rounding the integer
/// through `f64`.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63 is exactly representable; i64 covers [-2^63, 2^63).
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return (i as f64).total_cmp(&f);
    }
    if f >= BOUND {
        return Ordering::Less;
    }
    if f < -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => cmp_floats(0.0, f - whole),
        unequal => unequal,
    }
}

impl PartialOrd for ParameterValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParameterValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParameterValue {}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}
