//! Closed-form test functions.

use hg_types::{ConfigSpace, HgResult, Measure, Query, QueryResult, SearchSpace};
use std::collections::BTreeMap;
use std::f64::consts::{E, PI};

use crate::functional::FunctionalBenchmark;

const BOUND: f64 = 32.768;

/// Branin's global minimum value.
pub const BRANIN_OPTIMUM: f64 = 0.397887;

fn plane() -> ConfigSpace {
    ConfigSpace::Search(
        SearchSpace::new()
            .add_float("x0", -BOUND, BOUND)
            .add_float("x1", -BOUND, BOUND),
    )
}

fn value_result(query: &Query, value: f64) -> QueryResult {
    QueryResult::new(
        query.clone(),
        BTreeMap::from([("value".to_string(), value)]),
        BTreeMap::new(),
    )
}

/// Ackley function, minimum 0 at the origin.
pub fn ackley(x: &[f64]) -> f64 {
    let (a, b, c) = (20.0, 0.2, 2.0 * PI);
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|v| v * v).sum();
    let sum_cos: f64 = x.iter().map(|v| (c * v).cos()).sum();
    -a * (-b * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + a + E
}

/// Branin function over `(x0, x1)`.
pub fn branin(x0: f64, x1: f64) -> f64 {
    let b = 5.1 / (4.0 * PI * PI);
    let c = 5.0 / PI;
    let (r, s) = (6.0, 10.0);
    let t = 1.0 / (8.0 * PI);
    (x1 - b * x0 * x0 + c * x0 - r).powi(2) + s * (1.0 - t) * x0.cos() + s
}

pub fn ackley_bench() -> HgResult<FunctionalBenchmark> {
    let metrics = BTreeMap::from([(
        "value".to_string(),
        Measure::metric((0.0, f64::INFINITY), true)?,
    )]);
    Ok(FunctionalBenchmark::new("ackley", metrics, |query: &Query| {
        let x = query.config.numeric_values()?;
        Ok(value_result(query, ackley(&x)))
    })
    .with_config_space(plane()))
}

pub fn branin_bench() -> HgResult<FunctionalBenchmark> {
    let metrics = BTreeMap::from([(
        "value".to_string(),
        Measure::metric((BRANIN_OPTIMUM, f64::INFINITY), true)?,
    )]);
    Ok(FunctionalBenchmark::new("branin", metrics, |query: &Query| {
        let x = query.config.numeric_values()?;
        let (x0, x1) = match x.as_slice() {
            [x0, x1] => (*x0, *x1),
            _ => {
                return Err(hg_types::validation_error!(
                    "branin takes 2 hyperparameters, got {}",
                    x.len()
                ))
            }
        };
        Ok(value_result(query, branin(x0, x1)))
    })
    .with_config_space(plane()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use hg_types::Config;

    fn at(x0: f64, x1: f64) -> Query {
        Query::new("q", Config::from_pairs("0", [("x0", x0), ("x1", x1)]), None)
    }

    #[test]
    fn ackley_minimum_at_origin() {
        let bench = ackley_bench().unwrap();
        let result = bench.query(&at(0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(result.value("value").unwrap(), 0.0, epsilon = 1e-12);
        assert!(bench.query(&at(1.0, -2.0)).unwrap().value("value").unwrap() > 1.0);
    }

    #[test]
    fn branin_known_optima() {
        let bench = branin_bench().unwrap();
        for (x0, x1) in [(-PI, 12.275), (PI, 2.275), (9.42478, 2.475)] {
            let value = bench.query(&at(x0, x1)).unwrap().value("value").unwrap();
            assert_relative_eq!(value, BRANIN_OPTIMUM, epsilon = 1e-5);
        }
    }

    #[test]
    fn branin_rejects_wrong_arity() {
        let bench = branin_bench().unwrap();
        let q = Query::new("q", Config::from_pairs("0", [("x0", 1.0)]), None);
        assert!(bench.query(&q).is_err());
    }

    #[test]
    fn measures_and_space() {
        let bench = ackley_bench().unwrap();
        let desc = bench.description();
        assert!(desc.metrics["value"].minimize());
        assert!(desc.fidelities.is_empty());

        let space = bench.config_space().unwrap();
        assert!(space.contains(&Config::from_pairs("0", [("x0", 32.0), ("x1", -32.0)])));
        assert!(!space.contains(&Config::from_pairs("0", [("x0", 33.0), ("x1", 0.0)])));
    }
}
