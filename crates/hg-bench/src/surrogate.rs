//! Benchmarks backed by a trained model.

use hg_types::{
    BenchmarkError, ConfigSpace, FidelitySpec, HgResult, ParameterValue, Query, QueryResult,
    Trajectory,
};
use std::any::{type_name, Any};
use std::sync::Arc;

use crate::benchmark::TrajectoryFn;
use crate::description::BenchmarkDescription;

type Model = Arc<dyn Any + Send + Sync>;
type ErasedQueryFn =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &Query) -> HgResult<QueryResult> + Send + Sync>;

/// Wraps an opaque model and a function that queries it.
#[derive(Clone)]
pub struct SurrogateBenchmark {
    desc: BenchmarkDescription,
    config_space: ConfigSpace,
    model: Model,
    query_fn: ErasedQueryFn,
    trajectory_fn: Option<TrajectoryFn>,
}

impl SurrogateBenchmark {
    pub fn new<M, F>(
        desc: BenchmarkDescription,
        config_space: ConfigSpace,
        model: M,
        query: F,
    ) -> Self
    where
        M: Any + Send + Sync,
        F: Fn(&M, &Query) -> HgResult<QueryResult> + Send + Sync + 'static,
    {
        let benchmark = desc.name.clone();
        let query_fn: ErasedQueryFn = Arc::new(
            move |model: &(dyn Any + Send + Sync), q: &Query| -> HgResult<QueryResult> {
                let model = model.downcast_ref::<M>().ok_or_else(|| {
                    BenchmarkError::ModelTypeMismatch {
                        benchmark: benchmark.clone(),
                        expected: type_name::<M>().to_string(),
                    }
                })?;
                query(model, q)
            },
        );
        Self {
            desc,
            config_space,
            model: Arc::new(model),
            query_fn,
            trajectory_fn: None,
        }
    }

    pub fn with_trajectory<F>(mut self, trajectory: F) -> Self
    where
        F: Fn(&Query, Option<&ParameterValue>, Option<&ParameterValue>) -> HgResult<Trajectory>
            + Send
            + Sync
            + 'static,
    {
        self.trajectory_fn = Some(Arc::new(trajectory));
        self
    }

    pub fn desc(&self) -> &BenchmarkDescription {
        &self.desc
    }

    pub fn config_space(&self) -> &ConfigSpace {
        &self.config_space
    }

    /// The wrapped model, if it is an `M`.
    pub fn model<M: Any>(&self) -> Option<&M> {
        (*self.model).downcast_ref::<M>()
    }

    pub fn query(&self, query: &Query) -> HgResult<QueryResult> {
        query.check_fidelity(&self.desc.name, &self.desc.fidelities)?;
        (self.query_fn)(self.model.as_ref(), query)
    }

    /// Learning curve for `query`, from the trajectory function when given.
    ///
    /// Otherwise re-queries the model once per legal value of the pinned
    /// fidelity within `[frm, to]`.
    pub fn trajectory(
        &self,
        query: &Query,
        frm: Option<&ParameterValue>,
        to: Option<&ParameterValue>,
    ) -> HgResult<Trajectory> {
        if let Some(f) = &self.trajectory_fn {
            return f(query, frm, to);
        }

        if self.desc.fidelities.is_empty() {
            return Err(BenchmarkError::NoFidelities {
                benchmark: self.desc.name.clone(),
            }
            .into());
        }
        let Some(FidelitySpec::Single(name, value)) = &query.fidelity else {
            return Err(BenchmarkError::FidelityShape {
                benchmark: self.desc.name.clone(),
                message: "a trajectory needs a (name, value) fidelity pair".to_string(),
            }
            .into());
        };
        let fidelity = self
            .desc
            .fidelities
            .get(name)
            .ok_or_else(|| BenchmarkError::UnknownFidelity {
                benchmark: self.desc.name.clone(),
                fidelity: name.clone(),
            })?;

        let frm = frm.cloned().unwrap_or_else(|| fidelity.min_value());
        let to = to.cloned().unwrap_or_else(|| value.clone());

        let mut trajectory = Trajectory::new(name.clone());
        for at in fidelity.values() {
            if at < frm {
                continue;
            }
            if at > to {
                break;
            }
            let step = query.with_fidelity(Some(FidelitySpec::Single(name.clone(), at.clone())));
            let result = self.query(&step)?;
            trajectory.push(at, result.values);
        }
        Ok(trajectory)
    }
}

impl std::fmt::Debug for SurrogateBenchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrogateBenchmark")
            .field("desc", &self.desc)
            .field("config_space", &self.config_space)
            .field("has_trajectory", &self.trajectory_fn.is_some())
            .finish_non_exhaustive()
    }
}
