//! Expanding optimizers x benchmarks x seeds into runs.

use hg_bench::BenchmarkDescription;
use hg_types::HgResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::optimizer::{Hyperparameters, OptimizerDescription};
use crate::problem::{Budget, MultiObjectiveGeneration, Problem, ProblemShape, Run};

/// What to do with a problem that can't be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnError {
    /// Log and skip.
    #[default]
    Warn,
    /// Fail the whole generation.
    Raise,
    /// Skip silently.
    Ignore,
}

/// Settings shared by every generated problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    #[serde(flatten)]
    pub shape: ProblemShape,
    pub budget: Budget,
    pub seeds: Vec<u64>,
    pub on_error: OnError,
    /// Parent of every run's working directory.
    pub expdir: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            shape: ProblemShape::default(),
            budget: Budget::default(),
            seeds: vec![0],
            on_error: OnError::default(),
            expdir: PathBuf::from("hpoglue-output"),
        }
    }
}

impl GenerateConfig {
    pub fn from_json_str(json: &str) -> HgResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_objectives(mut self, objectives: usize) -> Self {
        self.shape.objectives = objectives;
        self
    }

    pub fn with_fidelities(mut self, fidelities: usize) -> Self {
        self.shape.fidelities = fidelities;
        self
    }

    pub fn with_costs(mut self, costs: usize) -> Self {
        self.shape.costs = costs;
        self
    }

    pub fn with_multi_objective_generation(mut self, generation: MultiObjectiveGeneration) -> Self {
        self.shape.multi_objective_generation = generation;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_expdir(mut self, expdir: impl Into<PathBuf>) -> Self {
        self.expdir = expdir.into();
        self
    }
}

/// One run per valid (optimizer, benchmark) problem and seed, in input order.
pub fn generate_problems(
    optimizers: &[(OptimizerDescription, Hyperparameters)],
    benchmarks: &[BenchmarkDescription],
    config: &GenerateConfig,
) -> HgResult<Vec<Run>> {
    config.budget.validate()?;
    if config.seeds.is_empty() {
        return Err(hg_types::config_error!("at least one seed is required"));
    }

    let mut problems = Vec::new();
    let mut skipped = 0usize;
    for (optimizer, hyperparameters) in optimizers {
        for benchmark in benchmarks {
            match Problem::new(
                optimizer.clone(),
                hyperparameters.clone(),
                benchmark.clone(),
                config.budget,
                &config.shape,
            ) {
                Ok(problem) => problems.push(problem),
                Err(e) => {
                    skipped += 1;
                    match config.on_error {
                        OnError::Raise => return Err(e),
                        OnError::Warn => warn!(
                            "Skipping {} on {}: {}",
                            optimizer.name, benchmark.name, e
                        ),
                        OnError::Ignore => {}
                    }
                }
            }
        }
    }

    let runs: Vec<Run> = problems
        .into_iter()
        .flat_map(|problem| {
            config
                .seeds
                .iter()
                .map(move |&seed| Run::new(problem.clone(), seed, &config.expdir))
        })
        .collect();

    info!(
        "Generated {} runs ({} problems skipped) for {} optimizers x {} benchmarks x {} seeds",
        runs.len(),
        skipped,
        optimizers.len(),
        benchmarks.len(),
        config.seeds.len()
    );
    Ok(runs)
}
