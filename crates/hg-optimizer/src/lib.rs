//! # hg-optimizer
//!
//! The optimizer side of HPO Glue.
//!
//! Provides the ask/tell optimizer contract, optimizer capability
//! descriptors, problem construction and generation over benchmark
//! catalogs, an in-process run loop with trial-budget accounting, and a
//! seeded random-search reference optimizer.

mod generator;
mod optimizer;
mod problem;
mod random_search;
mod runner;

pub use generator::{generate_problems, GenerateConfig, OnError};
pub use optimizer::{
    Arity, Hyperparameters, Optimizer, OptimizerContext, OptimizerDescription, OptimizerFactory,
    Support,
};
pub use problem::{Budget, MultiObjectiveGeneration, Problem, ProblemShape, Run, RunId};
pub use random_search::RandomSearch;
pub use runner::{execute_all, RunReport};
