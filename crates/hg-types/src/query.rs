//! Queries, results and trajectories.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Config;
use crate::errors::{BenchmarkError, HgResult};
use crate::fidelity::Fidelity;
use crate::value::ParameterValue;

/// Which fidelity a query asks for.
///
/// Absent (`Option::None` on the query) means "as much fidelity as available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FidelitySpec {
    /// Pin one named fidelity.
    Single(String, ParameterValue),
    /// Pin each named fidelity present in the mapping.
    Many(BTreeMap<String, ParameterValue>),
}

impl FidelitySpec {
    pub fn single(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self::Single(name.into(), value.into())
    }

    /// The value pinned for `name`, if any.
    pub fn pinned(&self, name: &str) -> Option<&ParameterValue> {
        match self {
            Self::Single(key, value) => (key == name).then_some(value),
            Self::Many(values) => values.get(name),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(key, _) => vec![key.as_str()],
            Self::Many(values) => values.keys().map(String::as_str).collect(),
        }
    }
}

impl std::fmt::Display for FidelitySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(key, value) => write!(f, "({key}, {value})"),
            Self::Many(values) => {
                let parts: Vec<String> = values.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// A request to evaluate a config, optionally at a given fidelity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub query_id: String,
    pub config: Config,
    pub fidelity: Option<FidelitySpec>,
    /// Opaque data the optimizer wants echoed back in the result.
    pub optimizer_info: Option<serde_json::Value>,
    /// Ask for the learning curve up to the requested fidelity.
    pub request_trajectory: bool,
}

impl Query {
    pub fn new(
        query_id: impl Into<String>,
        config: Config,
        fidelity: Option<FidelitySpec>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            config,
            fidelity,
            optimizer_info: None,
            request_trajectory: false,
        }
    }

    pub fn config_id(&self) -> &str {
        &self.config.config_id
    }

    pub fn with_fidelity(&self, fidelity: Option<FidelitySpec>) -> Self {
        Self {
            fidelity,
            ..self.clone()
        }
    }

    pub fn with_optimizer_info(mut self, info: serde_json::Value) -> Self {
        self.optimizer_info = Some(info);
        self
    }

    pub fn with_trajectory(mut self, request_trajectory: bool) -> Self {
        self.request_trajectory = request_trajectory;
        self
    }

    /// Check the fidelity specifier against a benchmark's declared fidelities.
    ///
    /// No declared fidelities requires no specifier; named fidelities must be
    /// declared; the mapping shape needs at least two declared fidelities.
    pub fn check_fidelity(
        &self,
        benchmark: &str,
        declared: &BTreeMap<String, Fidelity>,
    ) -> HgResult<()> {
        let Some(spec) = &self.fidelity else {
            return Ok(());
        };

        if declared.is_empty() {
            return Err(BenchmarkError::FidelityShape {
                benchmark: benchmark.to_string(),
                message: format!(
                    "no fidelities declared, but query {} asked for {spec}",
                    self.query_id
                ),
            }
            .into());
        }

        if let FidelitySpec::Many(_) = spec {
            if declared.len() < 2 {
                return Err(BenchmarkError::FidelityShape {
                    benchmark: benchmark.to_string(),
                    message: format!(
                        "single-fidelity benchmark takes a (name, value) pair, got mapping {spec}"
                    ),
                }
                .into());
            }
        }

        for name in spec.names() {
            if !declared.contains_key(name) {
                return Err(BenchmarkError::UnknownFidelity {
                    benchmark: benchmark.to_string(),
                    fidelity: name.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// A learning curve: metric values at increasing values of one fidelity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub fidelity: String,
    pub points: Vec<(ParameterValue, BTreeMap<String, f64>)>,
}

impl Trajectory {
    pub fn new(fidelity: impl Into<String>) -> Self {
        Self {
            fidelity: fidelity.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, at: ParameterValue, values: BTreeMap<String, f64>) {
        self.points.push((at, values));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn fidelities(&self) -> Vec<&ParameterValue> {
        self.points.iter().map(|(at, _)| at).collect()
    }

    /// The values of one metric along the curve.
    pub fn metric(&self, name: &str) -> Vec<Option<f64>> {
        self.points.iter().map(|(_, v)| v.get(name).copied()).collect()
    }
}

/// The outcome of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub query: Query,
    pub values: BTreeMap<String, f64>,
    /// The fidelity actually realized, empty when the benchmark has none.
    pub fidelity: BTreeMap<String, ParameterValue>,
    pub trajectory: Option<Trajectory>,
}

impl QueryResult {
    pub fn new(
        query: Query,
        values: BTreeMap<String, f64>,
        fidelity: BTreeMap<String, ParameterValue>,
    ) -> Self {
        Self {
            query,
            values,
            fidelity,
            trajectory: None,
        }
    }

    pub fn with_trajectory(mut self, trajectory: Trajectory) -> Self {
        self.trajectory = Some(trajectory);
        self
    }

    pub fn value(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }
}
