//! Configuration space definitions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Config;
use crate::errors::{HgError, HgResult};
use crate::value::ParameterValue;

/// A single hyperparameter dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    /// Hyperparameter name (e.g. "learning_rate").
    pub name: String,
    /// The kind of range.
    pub kind: ParameterKind,
}

/// Describes how a hyperparameter is sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Continuous uniform range [low, high].
    FloatRange { low: f64, high: f64 },
    /// Integer range [low, high] inclusive.
    IntRange { low: i64, high: i64 },
    /// Log-uniform range (sampled in log-space then exponentiated).
    LogUniform { low: f64, high: f64 },
    /// Categorical choices.
    Choice { values: Vec<ParameterValue> },
}

impl ParameterKind {
    fn contains(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (Self::FloatRange { low, high } | Self::LogUniform { low, high }, v) => v
                .as_f64()
                .map(|x| x >= *low && x <= *high)
                .unwrap_or(false),
            (Self::IntRange { low, high }, ParameterValue::Int(v)) => v >= low && v <= high,
            (Self::IntRange { .. }, _) => false,
            (Self::Choice { values }, v) => values.contains(v),
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            Self::FloatRange { low, high } => ParameterValue::Float(rng.random_range(*low..=*high)),
            Self::IntRange { low, high } => ParameterValue::Int(rng.random_range(*low..=*high)),
            Self::LogUniform { low, high } => {
                let log_val: f64 = rng.random_range(low.ln()..=high.ln());
                ParameterValue::Float(log_val.exp().clamp(*low, *high))
            }
            Self::Choice { values } => values[rng.random_range(0..values.len())].clone(),
        }
    }
}

/// An ordered list of hyperparameter definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub parameters: Vec<ParameterDef>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }

    pub fn add_float(mut self, name: impl Into<String>, low: f64, high: f64) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            kind: ParameterKind::FloatRange { low, high },
        });
        self
    }

    pub fn add_int(mut self, name: impl Into<String>, low: i64, high: i64) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            kind: ParameterKind::IntRange { low, high },
        });
        self
    }

    pub fn add_log_uniform(mut self, name: impl Into<String>, low: f64, high: f64) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            kind: ParameterKind::LogUniform { low, high },
        });
        self
    }

    pub fn add_choice(mut self, name: impl Into<String>, values: Vec<ParameterValue>) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            kind: ParameterKind::Choice { values },
        });
        self
    }

    /// Check every range is sampleable.
    pub fn validate(&self) -> HgResult<()> {
        for param in &self.parameters {
            let ok = match &param.kind {
                ParameterKind::FloatRange { low, high } => low <= high,
                ParameterKind::IntRange { low, high } => low <= high,
                ParameterKind::LogUniform { low, high } => *low > 0.0 && low <= high,
                ParameterKind::Choice { values } => !values.is_empty(),
            };
            if !ok {
                return Err(HgError::Validation(format!(
                    "invalid range for hyperparameter '{}': {:?}",
                    param.name, param.kind
                )));
            }
        }
        Ok(())
    }

    /// Draw one configuration, failing if any range is not sampleable.
    pub fn sample<R: Rng>(&self, rng: &mut R, config_id: impl Into<String>) -> HgResult<Config> {
        self.validate()?;
        let values: BTreeMap<String, ParameterValue> = self
            .parameters
            .iter()
            .map(|param| (param.name.clone(), param.kind.sample(rng)))
            .collect();
        Ok(Config::new(config_id, values))
    }

    /// Whether `config` names exactly these hyperparameters, each within range.
    pub fn contains(&self, config: &Config) -> bool {
        config.values.len() == self.parameters.len()
            && self.parameters.iter().all(|param| {
                config
                    .get(&param.name)
                    .map(|v| param.kind.contains(v))
                    .unwrap_or(false)
            })
    }
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self::new()
    }
}

/// The space a benchmark's configs come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigSpace {
    /// A continuous/discrete search space to sample from.
    Search(SearchSpace),
    /// A finite list of configs, as served by a tabular benchmark.
    Listed(Vec<Config>),
}

impl ConfigSpace {
    /// Draw one configuration. Listed configs keep their own ids.
    pub fn sample<R: Rng>(&self, rng: &mut R, config_id: impl Into<String>) -> HgResult<Config> {
        match self {
            Self::Search(space) => space.sample(rng, config_id),
            Self::Listed(configs) if configs.is_empty() => {
                Err(HgError::Validation("cannot sample from an empty config list".to_string()))
            }
            Self::Listed(configs) => Ok(configs[rng.random_range(0..configs.len())].clone()),
        }
    }

    pub fn contains(&self, config: &Config) -> bool {
        match self {
            Self::Search(space) => space.contains(config),
            Self::Listed(configs) => configs.iter().any(|c| c.config_id == config.config_id),
        }
    }
}
