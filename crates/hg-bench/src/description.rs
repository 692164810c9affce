//! Lazy benchmark descriptors.

use hg_types::{Env, Fidelity, HgResult, Measure, Named};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::benchmark::Benchmark;

/// Loads the concrete benchmark a description advertises.
pub type LoadFn = Arc<dyn Fn(&BenchmarkDescription) -> HgResult<Benchmark> + Send + Sync>;

/// Describes a benchmark without loading it.
///
/// Built once at registration time. `load` may be expensive (reading a
/// table, constructing a model) and its result is not cached here.
#[derive(Clone)]
pub struct BenchmarkDescription {
    /// Globally unique benchmark name.
    pub name: String,
    load: LoadFn,
    pub metrics: BTreeMap<String, Measure>,
    pub test_metrics: BTreeMap<String, Measure>,
    pub costs: BTreeMap<String, Measure>,
    /// Declared fidelities; their name order is the declaration order.
    pub fidelities: BTreeMap<String, Fidelity>,
    pub has_conditionals: bool,
    pub is_tabular: bool,
    pub env: Env,
    pub mem_req_mb: u64,
}

impl BenchmarkDescription {
    pub fn new<F>(name: impl Into<String>, metrics: BTreeMap<String, Measure>, load: F) -> Self
    where
        F: Fn(&BenchmarkDescription) -> HgResult<Benchmark> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            load: Arc::new(load),
            metrics,
            test_metrics: BTreeMap::new(),
            costs: BTreeMap::new(),
            fidelities: BTreeMap::new(),
            has_conditionals: false,
            is_tabular: false,
            env: Env::empty(),
            mem_req_mb: 100,
        }
    }

    pub fn with_test_metrics(mut self, test_metrics: BTreeMap<String, Measure>) -> Self {
        self.test_metrics = test_metrics;
        self
    }

    pub fn with_costs(mut self, costs: BTreeMap<String, Measure>) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_fidelities(mut self, fidelities: BTreeMap<String, Fidelity>) -> Self {
        self.fidelities = fidelities;
        self
    }

    pub fn with_conditionals(mut self, has_conditionals: bool) -> Self {
        self.has_conditionals = has_conditionals;
        self
    }

    pub fn tabular(mut self) -> Self {
        self.is_tabular = true;
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

    pub(crate) fn set_loader(&mut self, load: LoadFn) {
        self.load = load;
    }

    /// Materialize the benchmark.
    pub fn load(&self) -> HgResult<Benchmark> {
        info!("Loading benchmark: {}", self.name);
        (self.load)(self)
    }

    /// Metrics, then test metrics, then costs.
    pub fn result_keys(&self) -> Vec<String> {
        self.metrics
            .keys()
            .chain(self.test_metrics.keys())
            .chain(self.costs.keys())
            .cloned()
            .collect()
    }

    pub fn fidelity_keys(&self) -> Vec<String> {
        self.fidelities.keys().cloned().collect()
    }
}

impl Named for BenchmarkDescription {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for BenchmarkDescription {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.metrics == other.metrics
            && self.test_metrics == other.test_metrics
            && self.costs == other.costs
            && self.fidelities == other.fidelities
            && self.has_conditionals == other.has_conditionals
            && self.is_tabular == other.is_tabular
            && self.env == other.env
            && self.mem_req_mb == other.mem_req_mb
    }
}

impl std::fmt::Debug for BenchmarkDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkDescription")
            .field("name", &self.name)
            .field("metrics", &self.metrics)
            .field("test_metrics", &self.test_metrics)
            .field("costs", &self.costs)
            .field("fidelities", &self.fidelities)
            .field("has_conditionals", &self.has_conditionals)
            .field("is_tabular", &self.is_tabular)
            .field("env", &self.env)
            .field("mem_req_mb", &self.mem_req_mb)
            .finish_non_exhaustive()
    }
}
