//! In-process execution of a run.

use chrono::{DateTime, Utc};
use hg_types::{FidelitySpec, HgResult, Measure, ProblemError, Query, QueryResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::optimizer::OptimizerContext;
use crate::problem::{Run, RunId};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub name: String,
    pub seed: u64,
    /// The objective results are ranked by.
    pub objective: Option<(String, Measure)>,
    /// Every result, in the order the optimizer was told about them.
    pub history: Vec<QueryResult>,
    pub budget_used: f64,
    pub best: Option<QueryResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    fn new(run: &Run) -> Self {
        Self {
            run_id: run.id,
            name: run.name(),
            seed: run.seed,
            objective: run.problem.primary_objective().cloned(),
            history: Vec::new(),
            budget_used: 0.0,
            best: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record `result`, replacing the best one if it improves on it.
    pub fn record(&mut self, result: QueryResult) {
        if let Some((metric, measure)) = &self.objective {
            let improves = match (&self.best, result.value(metric)) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(best), Some(value)) => match best.value(metric) {
                    Some(current) => measure.as_minimize(value) < measure.as_minimize(current),
                    None => true,
                },
            };
            if improves {
                self.best = Some(result.clone());
            }
        }
        self.history.push(result);
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Objective value of the best result.
    pub fn best_value(&self) -> Option<f64> {
        let (metric, _) = self.objective.as_ref()?;
        self.best.as_ref()?.value(metric)
    }

    fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

impl Run {
    /// Drive the optimizer against the benchmark until the budget is spent.
    ///
    /// Any error aborts the run; nothing is retried.
    pub fn execute(&self) -> HgResult<RunReport> {
        let problem = &self.problem;
        info!("Starting run {} ({})", self.id, self.name());

        let benchmark = problem.benchmark.load()?;
        let config_space = benchmark.config_space().cloned().ok_or_else(|| {
            ProblemError::MissingConfigSpace {
                optimizer: problem.optimizer.name.clone(),
                benchmark: problem.benchmark.name.clone(),
            }
        })?;

        let mut optimizer = problem.optimizer.build(OptimizerContext {
            problem: problem.clone(),
            seed: self.seed,
            config_space,
            working_dir: self.working_dir.clone(),
            hyperparameters: problem.optimizer_hyperparameters.clone(),
        })?;

        let mut report = RunReport::new(self);
        let total = problem.budget.trials as f64;
        while report.budget_used < total {
            let query = optimizer.ask()?;
            query.check_fidelity(benchmark.name(), &benchmark.desc().fidelities)?;

            let mut result = benchmark.query(&query)?;
            if let Some(trajectory_query) = self.trajectory_query(&query, &result) {
                let trajectory = benchmark.trajectory(&trajectory_query, None, None)?;
                result = result.with_trajectory(trajectory);
            }

            report.budget_used += problem.budget_cost(&result);
            debug!(
                query_id = %query.query_id,
                config_id = %query.config_id(),
                budget_used = report.budget_used,
                "Trial finished"
            );

            optimizer.tell(&result)?;
            report.record(result);
        }
        report.mark_finished();

        info!(
            "Finished run {}: {} trials, budget used {:.3}, best {:?}",
            self.id,
            report.len(),
            report.budget_used,
            report.best_value()
        );
        Ok(report)
    }

    /// The query to fetch a learning curve for, if this result needs one.
    ///
    /// Either the optimizer asked for it on the query, or it needs learning
    /// curves and the problem has one fidelity that supports continuation.
    fn trajectory_query(&self, query: &Query, result: &QueryResult) -> Option<Query> {
        if query.request_trajectory {
            return Some(query.clone());
        }
        if !self.problem.optimizer.requires_learning_curve || self.problem.fidelities.len() != 1 {
            return None;
        }
        let (name, fidelity) = self.problem.fidelities.iter().next()?;
        if !fidelity.supports_continuation {
            return None;
        }
        match &query.fidelity {
            Some(FidelitySpec::Single(..)) => Some(query.clone()),
            _ => {
                let realized = result.fidelity.get(name)?.clone();
                Some(query.with_fidelity(Some(FidelitySpec::Single(name.clone(), realized))))
            }
        }
    }
}

/// Execute `runs` one after another, stopping at the first failure.
pub fn execute_all(runs: &[Run]) -> HgResult<Vec<RunReport>> {
    runs.iter().map(Run::execute).collect()
}
