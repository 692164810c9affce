//! Fidelity ranges.

use serde::{Deserialize, Serialize};

use crate::errors::{HgError, HgResult};
use crate::scaling::normalize;
use crate::value::ParameterValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FidelityKind {
    Int,
    Float,
}

/// A steppable range a benchmark can be evaluated over, cheap at `min` and
/// expensive at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fidelity {
    pub kind: FidelityKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Whether evaluation can resume from a lower fidelity (e.g. epochs).
    pub supports_continuation: bool,
}

impl Fidelity {
    pub fn int(min: i64, max: i64, step: i64) -> HgResult<Self> {
        Self::new(FidelityKind::Int, min as f64, max as f64, step as f64)
    }

    pub fn float(min: f64, max: f64, step: f64) -> HgResult<Self> {
        Self::new(FidelityKind::Float, min, max, step)
    }

    fn new(kind: FidelityKind, min: f64, max: f64, step: f64) -> HgResult<Self> {
        if !(min <= max) {
            return Err(HgError::Validation(format!(
                "fidelity range must satisfy min <= max, got ({min}, {max})"
            )));
        }
        if !(step > 0.0) {
            return Err(HgError::Validation(format!(
                "fidelity step must be positive, got {step}"
            )));
        }
        Ok(Self {
            kind,
            min,
            max,
            step,
            supports_continuation: false,
        })
    }

    pub fn with_continuation(mut self, supports_continuation: bool) -> Self {
        self.supports_continuation = supports_continuation;
        self
    }

    /// Convert a raw number into a value of this fidelity's kind.
    pub fn value(&self, x: f64) -> ParameterValue {
        match self.kind {
            FidelityKind::Int => ParameterValue::Int(x.round() as i64),
            FidelityKind::Float => ParameterValue::Float(x),
        }
    }

    pub fn min_value(&self) -> ParameterValue {
        self.value(self.min)
    }

    pub fn max_value(&self) -> ParameterValue {
        self.value(self.max)
    }

    /// The legal discretized values `min, min + step, ...` up to `max`.
    pub fn values(&self) -> impl Iterator<Item = ParameterValue> + '_ {
        // Tolerate float drift at the upper end.
        let tol = self.step * 1e-9;
        (0usize..)
            .map(move |i| self.min + i as f64 * self.step)
            .take_while(move |x| *x <= self.max + tol)
            .map(move |x| self.value(x.min(self.max)))
    }

    /// Position of `value` in the range, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max == self.min {
            return 1.0;
        }
        normalize(value, (self.min, self.max))
    }

    /// Share of the full evaluation spent reaching `value`: the number of
    /// steps up to and including it over the number of steps up to `max`.
    ///
    /// Always positive, so `min` costs exactly one step.
    pub fn budget_fraction(&self, value: f64) -> f64 {
        let value = value.clamp(self.min, self.max);
        (value - self.min + self.step) / (self.max - self.min + self.step)
    }
}
