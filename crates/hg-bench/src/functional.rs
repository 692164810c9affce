//! Benchmarks backed by a plain function.

use hg_types::{
    BenchmarkError, ConfigSpace, Env, Fidelity, HgResult, Measure, ParameterValue, Query,
    QueryResult, Trajectory,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::benchmark::{Benchmark, QueryFn, TrajectoryFn};
use crate::description::BenchmarkDescription;

/// Wraps a pure `Query -> QueryResult` function.
///
/// Constructing it is loading it: the description's loader hands back a
/// clone. Queries go straight to the function with no caching or extra
/// validation.
#[derive(Clone)]
pub struct FunctionalBenchmark {
    desc: BenchmarkDescription,
    query_fn: QueryFn,
    config_space: Option<ConfigSpace>,
    trajectory_fn: Option<TrajectoryFn>,
}

impl FunctionalBenchmark {
    pub fn new<F>(name: impl Into<String>, metrics: BTreeMap<String, Measure>, query: F) -> Self
    where
        F: Fn(&Query) -> HgResult<QueryResult> + Send + Sync + 'static,
    {
        let query_fn: QueryFn = Arc::new(query);
        let desc = BenchmarkDescription::new(name, metrics, |_| {
            Err(hg_types::internal_error!("functional benchmark loader not linked"))
        });
        let mut bench = Self {
            desc,
            query_fn,
            config_space: None,
            trajectory_fn: None,
        };
        bench.link();
        bench
    }

    /// Point the description's loader at this benchmark's current parts.
    fn link(&mut self) {
        let query_fn = self.query_fn.clone();
        let config_space = self.config_space.clone();
        let trajectory_fn = self.trajectory_fn.clone();
        self.desc.set_loader(Arc::new(move |desc: &BenchmarkDescription| -> HgResult<Benchmark> {
            Ok(Benchmark::Functional(FunctionalBenchmark {
                desc: desc.clone(),
                query_fn: query_fn.clone(),
                config_space: config_space.clone(),
                trajectory_fn: trajectory_fn.clone(),
            }))
        }));
    }

    pub fn with_config_space(mut self, config_space: ConfigSpace) -> Self {
        self.config_space = Some(config_space);
        self.link();
        self
    }

    pub fn with_trajectory<F>(mut self, trajectory: F) -> Self
    where
        F: Fn(&Query, Option<&ParameterValue>, Option<&ParameterValue>) -> HgResult<Trajectory>
            + Send
            + Sync
            + 'static,
    {
        self.trajectory_fn = Some(Arc::new(trajectory));
        self.link();
        self
    }

    pub fn with_fidelities(mut self, fidelities: BTreeMap<String, Fidelity>) -> Self {
        self.desc = self.desc.with_fidelities(fidelities);
        self
    }

    pub fn with_costs(mut self, costs: BTreeMap<String, Measure>) -> Self {
        self.desc = self.desc.with_costs(costs);
        self
    }

    pub fn with_test_metrics(mut self, test_metrics: BTreeMap<String, Measure>) -> Self {
        self.desc = self.desc.with_test_metrics(test_metrics);
        self
    }

    pub fn with_env(mut self, env: Env) -> Self {
        self.desc = self.desc.with_env(env);
        self
    }

    pub fn with_mem_req_mb(mut self, mem_req_mb: u64) -> Self {
        self.desc = self.desc.with_mem_req_mb(mem_req_mb);
        self
    }

    pub fn desc(&self) -> &BenchmarkDescription {
        &self.desc
    }

    /// A description whose loader returns this benchmark.
    pub fn description(&self) -> BenchmarkDescription {
        self.desc.clone()
    }

    pub fn load(&self) -> Benchmark {
        Benchmark::Functional(self.clone())
    }

    pub fn config_space(&self) -> Option<&ConfigSpace> {
        self.config_space.as_ref()
    }

    pub fn query(&self, query: &Query) -> HgResult<QueryResult> {
        (self.query_fn)(query)
    }

    pub fn trajectory(
        &self,
        query: &Query,
        frm: Option<&ParameterValue>,
        to: Option<&ParameterValue>,
    ) -> HgResult<Trajectory> {
        match &self.trajectory_fn {
            Some(f) => f(query, frm, to),
            None => Err(BenchmarkError::TrajectoryNotImplemented {
                benchmark: self.desc.name.clone(),
                reason: "no trajectory function was supplied".to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for FunctionalBenchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionalBenchmark")
            .field("desc", &self.desc)
            .field("config_space", &self.config_space)
            .field("has_trajectory", &self.trajectory_fn.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_types::{Config, FidelitySpec, SearchSpace};

    fn sphere() -> FunctionalBenchmark {
        let metrics = BTreeMap::from([(
            "value".to_string(),
            Measure::metric((0.0, f64::INFINITY), true).unwrap(),
        )]);
        FunctionalBenchmark::new("sphere", metrics, |query: &Query| {
            let xs = query.config.numeric_values()?;
            let value = xs.iter().map(|x| x * x).sum();
            Ok(QueryResult::new(
                query.clone(),
                BTreeMap::from([("value".to_string(), value)]),
                BTreeMap::new(),
            ))
        })
        .with_config_space(ConfigSpace::Search(SearchSpace::new().add_float("x", -1.0, 1.0)))
    }

    fn query_at(x: f64) -> Query {
        Query::new("q", Config::from_pairs("0", [("x", x)]), None)
    }

    #[test]
    fn query_calls_function() {
        let result = sphere().query(&query_at(0.5)).unwrap();
        assert_eq!(result.value("value"), Some(0.25));
        assert!(result.fidelity.is_empty());
    }

    #[test]
    fn description_loads_same_benchmark() {
        let bench = sphere();
        let desc = bench.description();
        assert!(!desc.is_tabular);

        let loaded = desc.load().unwrap();
        assert!(matches!(loaded, Benchmark::Functional(_)));
        assert_eq!(loaded.name(), "sphere");
        assert!(loaded.config_space().is_some());
        assert_eq!(loaded.query(&query_at(-1.0)).unwrap().value("value"), Some(1.0));
    }

    #[test]
    fn trajectory_needs_function() {
        let q = query_at(0.1).with_fidelity(Some(FidelitySpec::single("epoch", 3)));
        let err = sphere().trajectory(&q, None, None).unwrap_err();
        assert!(err.to_string().contains("Trajectory not implemented"));

        let with_traj = sphere().with_trajectory(|query, _frm, _to| {
            let mut traj = Trajectory::new("epoch");
            traj.push(ParameterValue::Int(1), BTreeMap::from([("value".to_string(), 1.0)]));
            if let Some(FidelitySpec::Single(_, v)) = &query.fidelity {
                traj.push(v.clone(), BTreeMap::from([("value".to_string(), 0.5)]));
            }
            Ok(traj)
        });
        let traj = with_traj.trajectory(&q, None, None).unwrap();
        assert_eq!(traj.len(), 2);

        // The loaded copy keeps the trajectory function.
        let loaded = with_traj.description().load().unwrap();
        assert_eq!(loaded.trajectory(&q, None, None).unwrap().len(), 2);
    }
}
