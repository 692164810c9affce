use hg_types::{HgResult, Registry};
use tracing::debug;

use crate::description::BenchmarkDescription;
use crate::synthetic::{ackley_bench, branin_bench};

/// Benchmark descriptions keyed by name.
pub type BenchmarkCatalog = Registry<BenchmarkDescription>;

/// Catalog of the built-in synthetic benchmarks.
pub fn default_catalog() -> HgResult<BenchmarkCatalog> {
    let catalog = BenchmarkCatalog::new()
        .with(ackley_bench()?.description())?
        .with(branin_bench()?.description())?;
    debug!("Default catalog: {:?}", catalog.names().collect::<Vec<_>>());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hg_types::{Config, HgError, ProblemError, Query};

    #[test]
    fn default_catalog_contents() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["ackley", "branin"]);
        assert!(catalog.get("hartmann").is_err());
    }

    #[test]
    fn registered_descriptions_load() {
        let catalog = default_catalog().unwrap();
        let bench = catalog.get("ackley").unwrap().load().unwrap();
        let q = Query::new("q", Config::from_pairs("0", [("x0", 0.0), ("x1", 0.0)]), None);
        assert!(bench.query(&q).unwrap().value("value").unwrap().abs() < 1e-12);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut catalog = default_catalog().unwrap();
        let err = catalog.register(ackley_bench().unwrap().description()).unwrap_err();
        assert!(matches!(err, HgError::Problem(ProblemError::DuplicateName { .. })));
        assert_eq!(catalog.len(), 2);
    }
}
