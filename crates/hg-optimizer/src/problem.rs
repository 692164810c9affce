//! Problems (optimizer x benchmark x objectives) and the runs made from them.

use chrono::{DateTime, Utc};
use hg_bench::BenchmarkDescription;
use hg_types::{first_n, mix_n, Fidelity, HgResult, Measure, ProblemError, QueryResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::optimizer::{Hyperparameters, OptimizerDescription};

/// Unique run identifier.
pub type RunId = Uuid;

/// How more than one objective is picked from a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiObjectiveGeneration {
    /// Alternate metrics and costs.
    #[default]
    MixMetricCost,
    MetricOnly,
}

/// How many objectives, fidelities and costs a problem uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemShape {
    pub objectives: usize,
    pub fidelities: usize,
    pub costs: usize,
    pub multi_objective_generation: MultiObjectiveGeneration,
}

impl Default for ProblemShape {
    fn default() -> Self {
        Self {
            objectives: 1,
            fidelities: 0,
            costs: 0,
            multi_objective_generation: MultiObjectiveGeneration::default(),
        }
    }
}

/// Total evaluation budget, counted in full-fidelity trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub trials: usize,
}

impl Budget {
    pub fn trials(trials: usize) -> HgResult<Self> {
        let budget = Self { trials };
        budget.validate()?;
        Ok(budget)
    }

    pub fn validate(&self) -> HgResult<()> {
        if self.trials == 0 {
            return Err(ProblemError::InvalidBudget {
                message: "a trial budget must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self { trials: 50 }
    }
}

/// An optimizer set against a benchmark with chosen objectives, fidelities
/// and costs.
#[derive(Debug, Clone)]
pub struct Problem {
    pub optimizer: OptimizerDescription,
    pub optimizer_hyperparameters: Hyperparameters,
    pub benchmark: BenchmarkDescription,
    /// In selection order; the first one ranks results.
    pub objectives: Vec<(String, Measure)>,
    pub fidelities: BTreeMap<String, Fidelity>,
    pub costs: BTreeMap<String, Measure>,
    pub budget: Budget,
}

impl Problem {
    pub fn new(
        optimizer: OptimizerDescription,
        optimizer_hyperparameters: Hyperparameters,
        benchmark: BenchmarkDescription,
        budget: Budget,
        shape: &ProblemShape,
    ) -> HgResult<Self> {
        budget.validate()?;

        let not_enough = |what: &str, requested: usize, available: usize| ProblemError::NotEnough {
            benchmark: benchmark.name.clone(),
            what: what.to_string(),
            requested,
            available,
        };

        let metrics = benchmark.metrics.iter().map(|(k, v)| (k.clone(), *v));
        let costs = benchmark.costs.iter().map(|(k, v)| (k.clone(), *v));
        let (objectives, available) = match (shape.objectives, shape.multi_objective_generation) {
            (0, _) => {
                return Err(hg_types::config_error!(
                    "a problem needs at least one objective"
                ))
            }
            (1, _) | (_, MultiObjectiveGeneration::MetricOnly) => {
                (first_n(shape.objectives, metrics), benchmark.metrics.len())
            }
            (n, MultiObjectiveGeneration::MixMetricCost) => (
                mix_n(n, metrics, costs),
                benchmark.metrics.len() + benchmark.costs.len(),
            ),
        };
        if objectives.len() < shape.objectives {
            return Err(not_enough("objectives", shape.objectives, available).into());
        }

        if shape.fidelities > benchmark.fidelities.len() {
            return Err(
                not_enough("fidelities", shape.fidelities, benchmark.fidelities.len()).into(),
            );
        }
        let fidelities = first_n(
            shape.fidelities,
            benchmark.fidelities.iter().map(|(k, v)| (k.clone(), *v)),
        )
        .into_iter()
        .collect();

        if shape.costs > benchmark.costs.len() {
            return Err(not_enough("costs", shape.costs, benchmark.costs.len()).into());
        }
        let costs = first_n(
            shape.costs,
            benchmark.costs.iter().map(|(k, v)| (k.clone(), *v)),
        )
        .into_iter()
        .collect();

        optimizer.support.check(
            &optimizer.name,
            &benchmark,
            shape.objectives,
            shape.fidelities,
            shape.costs,
        )?;

        Ok(Self {
            optimizer,
            optimizer_hyperparameters,
            benchmark,
            objectives,
            fidelities,
            costs,
            budget,
        })
    }

    /// A readable, filesystem-safe name for the problem.
    pub fn name(&self) -> String {
        let objectives: Vec<&str> = self.objectives.iter().map(|(k, _)| k.as_str()).collect();
        let fidelities: Vec<&str> = self.fidelities.keys().map(String::as_str).collect();
        let mut name = format!(
            "optimizer={}.benchmark={}.objectives={}",
            self.optimizer.name,
            self.benchmark.name,
            objectives.join(",")
        );
        if !fidelities.is_empty() {
            name.push_str(&format!(".fidelities={}", fidelities.join(",")));
        }
        if !self.costs.is_empty() {
            let costs: Vec<&str> = self.costs.keys().map(String::as_str).collect();
            name.push_str(&format!(".costs={}", costs.join(",")));
        }
        name.push_str(&format!(".budget={}", self.budget.trials));
        name
    }

    /// The objective results are ranked by.
    pub fn primary_objective(&self) -> Option<&(String, Measure)> {
        self.objectives.first()
    }

    /// Share of the budget one result consumes.
    ///
    /// 1 without fidelities; otherwise the mean step fraction of the realized
    /// fidelities, so every result costs something. A missing realized value
    /// counts as the maximum.
    pub fn budget_cost(&self, result: &QueryResult) -> f64 {
        if self.fidelities.is_empty() {
            return 1.0;
        }
        let total: f64 = self
            .fidelities
            .iter()
            .map(|(name, fidelity)| {
                let realized = result
                    .fidelity
                    .get(name)
                    .and_then(|v| v.as_f64())
                    .unwrap_or(fidelity.max);
                fidelity.budget_fraction(realized)
            })
            .sum();
        total / self.fidelities.len() as f64
    }
}

/// A problem fixed to a seed: the unit of execution.
#[derive(Debug, Clone)]
pub struct Run {
    pub id: RunId,
    pub problem: Problem,
    pub seed: u64,
    pub working_dir: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl Run {
    pub fn new(problem: Problem, seed: u64, expdir: &Path) -> Self {
        let working_dir = expdir.join(format!("{}.seed={seed}", problem.name()));
        Self {
            id: Uuid::new_v4(),
            problem,
            seed,
            working_dir,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> String {
        format!("{}.seed={}", self.problem.name(), self.seed)
    }
}
