//! Metric and cost descriptors.

use serde::{Deserialize, Serialize};

use crate::errors::{HgError, HgResult};
use crate::scaling::normalize;

/// Whether a measure is minimized or maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Default for Direction {
    fn default() -> Self {
        Self::Minimize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    Metric,
    Cost,
}

/// A metric or cost a benchmark reports, with its value bounds.
///
/// Bounds may be infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub bounds: (f64, f64),
    pub direction: Direction,
    pub kind: MeasureKind,
}

impl Measure {
    pub fn metric(bounds: (f64, f64), minimize: bool) -> HgResult<Self> {
        Self::new(bounds, minimize, MeasureKind::Metric)
    }

    pub fn cost(bounds: (f64, f64), minimize: bool) -> HgResult<Self> {
        Self::new(bounds, minimize, MeasureKind::Cost)
    }

    fn new(bounds: (f64, f64), minimize: bool, kind: MeasureKind) -> HgResult<Self> {
        if bounds.0.is_nan() || bounds.1.is_nan() || bounds.0 > bounds.1 {
            return Err(HgError::Validation(format!(
                "measure bounds must satisfy lower <= upper, got {bounds:?}"
            )));
        }
        let direction = if minimize {
            Direction::Minimize
        } else {
            Direction::Maximize
        };
        Ok(Self {
            bounds,
            direction,
            kind,
        })
    }

    pub fn minimize(&self) -> bool {
        self.direction == Direction::Minimize
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.bounds.0 && value <= self.bounds.1
    }

    /// Flip maximized values so that lower is always better.
    pub fn as_minimize(&self, value: f64) -> f64 {
        match self.direction {
            Direction::Minimize => value,
            Direction::Maximize => -value,
        }
    }

    /// Map a value into the unit range. Only meaningful for finite bounds.
    pub fn normalize(&self, value: f64) -> HgResult<f64> {
        if !self.bounds.0.is_finite() || !self.bounds.1.is_finite() {
            return Err(HgError::Validation(format!(
                "cannot normalize with unbounded measure {:?}",
                self.bounds
            )));
        }
        Ok(normalize(value, self.bounds))
    }
}
