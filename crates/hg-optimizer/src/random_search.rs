//! Uniform random search.

use hg_types::{ConfigSpace, Fidelity, FidelitySpec, HgResult, Query, QueryResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::optimizer::{Arity, Optimizer, OptimizerContext, OptimizerDescription, Support};

/// Samples configs independently and evaluates them at full fidelity.
#[derive(Debug)]
pub struct RandomSearch {
    rng: StdRng,
    config_space: ConfigSpace,
    fidelities: Vec<(String, Fidelity)>,
    asked: usize,
}

impl RandomSearch {
    pub const NAME: &'static str = "random_search";

    pub fn new(context: OptimizerContext) -> Self {
        Self {
            rng: StdRng::seed_from_u64(context.seed),
            config_space: context.config_space,
            fidelities: context
                .problem
                .fidelities
                .iter()
                .map(|(name, fidelity)| (name.clone(), *fidelity))
                .collect(),
            asked: 0,
        }
    }

    pub fn support() -> Support {
        Support::default().with_fidelities(vec![Arity::None, Arity::Single])
    }

    pub fn description() -> OptimizerDescription {
        OptimizerDescription::new(Self::NAME, Self::support(), |context| {
            Ok(Box::new(RandomSearch::new(context)) as Box<dyn Optimizer>)
        })
        .with_mem_req_mb(50)
    }

    fn max_fidelity(&self) -> Option<FidelitySpec> {
        match self.fidelities.as_slice() {
            [] => None,
            [(name, fidelity)] => Some(FidelitySpec::Single(name.clone(), fidelity.max_value())),
            many => Some(FidelitySpec::Many(
                many.iter()
                    .map(|(name, fidelity)| (name.clone(), fidelity.max_value()))
                    .collect(),
            )),
        }
    }
}

impl Optimizer for RandomSearch {
    fn ask(&mut self) -> HgResult<Query> {
        let n = self.asked;
        self.asked += 1;
        let config = self.config_space.sample(&mut self.rng, n.to_string())?;
        debug!("Random search proposal {}: config {}", n, config.config_id);
        Ok(Query::new(format!("q{n}"), config, self.max_fidelity()))
    }

    fn tell(&mut self, _result: &QueryResult) -> HgResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::Hyperparameters;
    use crate::problem::{Budget, Problem, ProblemShape};
    use hg_bench::{ackley_bench, BenchmarkDescription};
    use hg_types::{Config, HgError, Measure, ParameterValue, SearchSpace};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn context(problem: Problem, config_space: ConfigSpace, seed: u64) -> OptimizerContext {
        OptimizerContext {
            problem,
            seed,
            config_space,
            working_dir: PathBuf::from("unused"),
            hyperparameters: Hyperparameters::new(),
        }
    }

    fn ackley_problem() -> Problem {
        Problem::new(
            RandomSearch::description(),
            Hyperparameters::new(),
            ackley_bench().unwrap().description(),
            Budget::default(),
            &ProblemShape::default(),
        )
        .unwrap()
    }

    fn space() -> ConfigSpace {
        ConfigSpace::Search(SearchSpace::new().add_float("x0", -1.0, 1.0).add_int("x1", 0, 3))
    }

    #[test]
    fn same_seed_same_proposals() {
        let mut a = RandomSearch::new(context(ackley_problem(), space(), 42));
        let mut b = RandomSearch::new(context(ackley_problem(), space(), 42));
        for _ in 0..5 {
            let (qa, qb) = (a.ask().unwrap(), b.ask().unwrap());
            assert_eq!(qa.config, qb.config);
            assert!(space().contains(&qa.config));
            assert!(qa.fidelity.is_none());
        }
    }

    #[test]
    fn query_and_config_ids_are_sequential() {
        let mut rs = RandomSearch::new(context(ackley_problem(), space(), 0));
        let first = rs.ask().unwrap();
        let second = rs.ask().unwrap();
        assert_eq!((first.query_id.as_str(), first.config_id()), ("q0", "0"));
        assert_eq!((second.query_id.as_str(), second.config_id()), ("q1", "1"));
    }

    #[test]
    fn listed_configs_keep_their_ids() {
        let listed = ConfigSpace::Listed(vec![
            Config::from_pairs("7", [("x0", 0.5)]),
            Config::from_pairs("9", [("x0", 0.25)]),
        ]);
        let mut rs = RandomSearch::new(context(ackley_problem(), listed, 3));
        for _ in 0..10 {
            let q = rs.ask().unwrap();
            assert!(["7", "9"].contains(&q.config_id()));
        }
    }

    #[test]
    fn asks_for_max_fidelity() {
        let desc = BenchmarkDescription::new(
            "mf",
            BTreeMap::from([("loss".to_string(), Measure::metric((0.0, 1.0), true).unwrap())]),
            |_| Err(HgError::Internal("unused".into())),
        )
        .with_fidelities(BTreeMap::from([(
            "epoch".to_string(),
            Fidelity::int(1, 50, 1).unwrap(),
        )]));
        let problem = Problem::new(
            RandomSearch::description(),
            Hyperparameters::new(),
            desc,
            Budget::default(),
            &ProblemShape {
                fidelities: 1,
                ..ProblemShape::default()
            },
        )
        .unwrap();

        let mut rs = RandomSearch::new(context(problem, space(), 0));
        let q = rs.ask().unwrap();
        assert_eq!(q.fidelity, Some(FidelitySpec::single("epoch", ParameterValue::Int(50))));
    }

    #[test]
    fn description_builds_an_optimizer() {
        let desc = RandomSearch::description();
        assert_eq!(desc.name, "random_search");
        let mut opt = desc.build(context(ackley_problem(), space(), 1)).unwrap();
        assert!(opt.ask().is_ok());
    }
}
