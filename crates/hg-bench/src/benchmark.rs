//! The loaded, queryable form of a benchmark.

use hg_types::{ConfigSpace, HgResult, ParameterValue, Query, QueryResult, Trajectory};
use std::sync::Arc;
use tracing::debug;

use crate::description::BenchmarkDescription;
use crate::functional::FunctionalBenchmark;
use crate::surrogate::SurrogateBenchmark;
use crate::tabular::TabularBenchmark;

/// Evaluates a query.
pub type QueryFn = Arc<dyn Fn(&Query) -> HgResult<QueryResult> + Send + Sync>;

/// Produces a learning curve for `query` between `frm` and `to`, inclusive.
pub type TrajectoryFn = Arc<
    dyn Fn(&Query, Option<&ParameterValue>, Option<&ParameterValue>) -> HgResult<Trajectory>
        + Send
        + Sync,
>;

/// A loaded benchmark. Read-only once constructed.
#[derive(Debug, Clone)]
pub enum Benchmark {
    Functional(FunctionalBenchmark),
    Tabular(TabularBenchmark),
    Surrogate(SurrogateBenchmark),
}

impl Benchmark {
    pub fn desc(&self) -> &BenchmarkDescription {
        match self {
            Self::Functional(b) => b.desc(),
            Self::Tabular(b) => b.desc(),
            Self::Surrogate(b) => b.desc(),
        }
    }

    pub fn name(&self) -> &str {
        &self.desc().name
    }

    /// The configs this benchmark can evaluate, if it declares them.
    pub fn config_space(&self) -> Option<&ConfigSpace> {
        match self {
            Self::Functional(b) => b.config_space(),
            Self::Tabular(b) => Some(b.config_space()),
            Self::Surrogate(b) => Some(b.config_space()),
        }
    }

    pub fn query(&self, query: &Query) -> HgResult<QueryResult> {
        debug!(
            benchmark = %self.name(),
            query_id = %query.query_id,
            config_id = %query.config_id(),
            "Querying benchmark"
        );
        match self {
            Self::Functional(b) => b.query(query),
            Self::Tabular(b) => b.query(query),
            Self::Surrogate(b) => b.query(query),
        }
    }

    pub fn trajectory(
        &self,
        query: &Query,
        frm: Option<&ParameterValue>,
        to: Option<&ParameterValue>,
    ) -> HgResult<Trajectory> {
        match self {
            Self::Functional(b) => b.trajectory(query, frm, to),
            Self::Tabular(b) => b.trajectory(query, frm, to),
            Self::Surrogate(b) => b.trajectory(query, frm, to),
        }
    }
}
