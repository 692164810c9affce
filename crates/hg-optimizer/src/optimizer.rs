//! The optimizer contract and optimizer descriptors.

use hg_bench::BenchmarkDescription;
use hg_types::{ConfigSpace, Env, HgResult, Named, ProblemError, Query, QueryResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::problem::Problem;

/// Extra keyword arguments handed to an optimizer.
pub type Hyperparameters = BTreeMap<String, serde_json::Value>;

/// An ask/tell optimizer.
pub trait Optimizer: Send {
    /// Propose the next query to evaluate.
    fn ask(&mut self) -> HgResult<Query>;

    /// Report the outcome of a previously asked query.
    fn tell(&mut self, result: &QueryResult) -> HgResult<()>;
}

/// Everything an optimizer is constructed from.
#[derive(Debug, Clone)]
pub struct OptimizerContext {
    pub problem: Problem,
    pub seed: u64,
    pub config_space: ConfigSpace,
    /// Where the optimizer may keep its own state.
    pub working_dir: PathBuf,
    pub hyperparameters: Hyperparameters,
}

/// Builds an optimizer for one run.
pub type OptimizerFactory =
    Arc<dyn Fn(OptimizerContext) -> HgResult<Box<dyn Optimizer>> + Send + Sync>;

/// How many of something a problem asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    None,
    Single,
    Many,
}

impl Arity {
    pub fn of(count: usize) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Single,
            _ => Self::Many,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Many => "many",
        };
        f.write_str(s)
    }
}

/// The kinds of problems an optimizer can handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub objectives: Vec<Arity>,
    pub fidelities: Vec<Arity>,
    pub cost_awareness: Vec<Arity>,
    /// `Some(true)`: tabular only. `Some(false)`: never tabular. `None`: either.
    pub tabular: Option<bool>,
    pub conditionals: bool,
}

impl Default for Support {
    fn default() -> Self {
        Self {
            objectives: vec![Arity::Single],
            fidelities: vec![Arity::None],
            cost_awareness: vec![Arity::None],
            tabular: None,
            conditionals: false,
        }
    }
}

impl Support {
    pub fn with_objectives(mut self, objectives: Vec<Arity>) -> Self {
        self.objectives = objectives;
        self
    }

    pub fn with_fidelities(mut self, fidelities: Vec<Arity>) -> Self {
        self.fidelities = fidelities;
        self
    }

    pub fn with_cost_awareness(mut self, cost_awareness: Vec<Arity>) -> Self {
        self.cost_awareness = cost_awareness;
        self
    }

    pub fn with_tabular(mut self, tabular: Option<bool>) -> Self {
        self.tabular = tabular;
        self
    }

    pub fn with_conditionals(mut self, conditionals: bool) -> Self {
        self.conditionals = conditionals;
        self
    }

    /// Check the optimizer can take on a problem of this shape.
    pub fn check(
        &self,
        optimizer: &str,
        benchmark: &BenchmarkDescription,
        objectives: usize,
        fidelities: usize,
        costs: usize,
    ) -> HgResult<()> {
        let unsupported = |what: &str, requested: String| ProblemError::Unsupported {
            optimizer: optimizer.to_string(),
            benchmark: benchmark.name.clone(),
            what: what.to_string(),
            requested,
        };

        let arities = [
            ("objectives", &self.objectives, objectives),
            ("fidelities", &self.fidelities, fidelities),
            ("cost awareness", &self.cost_awareness, costs),
        ];
        for (what, supported, count) in arities {
            let arity = Arity::of(count);
            if !supported.contains(&arity) {
                return Err(unsupported(what, arity.to_string()).into());
            }
        }

        match (self.tabular, benchmark.is_tabular) {
            (Some(false), true) => {
                return Err(unsupported("benchmark kind", "tabular".into()).into())
            }
            (Some(true), false) => {
                return Err(unsupported("benchmark kind", "non-tabular".into()).into())
            }
            _ => {}
        }

        if benchmark.has_conditionals && !self.conditionals {
            return Err(unsupported("search spaces with", "conditionals".into()).into());
        }
        Ok(())
    }
}

/// Describes an optimizer without constructing it.
#[derive(Clone)]
pub struct OptimizerDescription {
    pub name: String,
    pub support: Support,
    /// Wants a learning curve with each result on single-fidelity problems.
    pub requires_learning_curve: bool,
    pub env: Env,
    pub mem_req_mb: u64,
    factory: OptimizerFactory,
}

impl OptimizerDescription {
    pub fn new<F>(name: impl Into<String>, support: Support, factory: F) -> Self
    where
        F: Fn(OptimizerContext) -> HgResult<Box<dyn Optimizer>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            support,
            requires_learning_curve: false,
            env: Env::empty(),
            mem_req_mb: 100,
            factory: Arc::new(factory),
        }
    }

    pub fn with_learning_curve(mut self, requires_learning_curve: bool) -> Self {
        self.requires_learning_curve = requires_learning_curve;
        self
    }

    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    pub fn with_mem_req_mb(mut self, mem_req_mb: u64) -> Self {
        self.mem_req_mb = mem_req_mb;
        self
    }

    pub fn build(&self, context: OptimizerContext) -> HgResult<Box<dyn Optimizer>> {
        (self.factory)(context)
    }
}

impl Named for OptimizerDescription {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for OptimizerDescription {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.support == other.support
            && self.requires_learning_curve == other.requires_learning_curve
            && self.env == other.env
            && self.mem_req_mb == other.mem_req_mb
    }
}

impl std::fmt::Debug for OptimizerDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizerDescription")
            .field("name", &self.name)
            .field("support", &self.support)
            .field("requires_learning_curve", &self.requires_learning_curve)
            .field("env", &self.env)
            .field("mem_req_mb", &self.mem_req_mb)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_types::{Fidelity, HgError, Measure};

    fn bench(tabular: bool, conditionals: bool) -> BenchmarkDescription {
        let desc = BenchmarkDescription::new(
            "b",
            BTreeMap::from([(
                "loss".to_string(),
                Measure::metric((0.0, 1.0), true).unwrap(),
            )]),
            |_| Err(HgError::Internal("unused".into())),
        )
        .with_fidelities(BTreeMap::from([(
            "epoch".to_string(),
            Fidelity::int(1, 10, 1).unwrap(),
        )]))
        .with_conditionals(conditionals);
        if tabular {
            desc.tabular()
        } else {
            desc
        }
    }

    #[test]
    fn arity_of_counts() {
        assert_eq!(Arity::of(0), Arity::None);
        assert_eq!(Arity::of(1), Arity::Single);
        assert_eq!(Arity::of(4), Arity::Many);
    }

    #[test]
    fn default_support_is_single_objective_blackbox() {
        let support = Support::default();
        assert!(support.check("opt", &bench(false, false), 1, 0, 0).is_ok());

        let err = support.check("opt", &bench(false, false), 2, 0, 0).unwrap_err();
        assert!(err.to_string().contains("does not support objectives 'many'"));

        let err = support.check("opt", &bench(false, false), 1, 1, 0).unwrap_err();
        assert!(err.to_string().contains("fidelities 'single'"));
    }

    #[test]
    fn tabular_and_conditionals() {
        let blackbox_only = Support::default().with_tabular(Some(false));
        assert!(blackbox_only.check("opt", &bench(true, false), 1, 0, 0).is_err());
        assert!(blackbox_only.check("opt", &bench(false, false), 1, 0, 0).is_ok());

        let tabular_only = Support::default().with_tabular(Some(true));
        assert!(tabular_only.check("opt", &bench(false, false), 1, 0, 0).is_err());
        assert!(tabular_only.check("opt", &bench(true, false), 1, 0, 0).is_ok());

        let err = Support::default()
            .check("opt", &bench(false, true), 1, 0, 0)
            .unwrap_err();
        assert!(matches!(err, HgError::Problem(ProblemError::Unsupported { .. })));
        assert!(Support::default()
            .with_conditionals(true)
            .check("opt", &bench(false, true), 1, 0, 0)
            .is_ok());
    }

    #[test]
    fn description_equality_ignores_factory() {
        let a = OptimizerDescription::new("opt", Support::default(), |_| {
            Err(HgError::Internal("a".into()))
        });
        let b = OptimizerDescription::new("opt", Support::default(), |_| {
            Err(HgError::Internal("b".into()))
        });
        assert_eq!(a, b);
        assert_ne!(a, b.with_learning_curve(true));
    }
}
