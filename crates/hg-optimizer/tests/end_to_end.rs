use hg_bench::{default_catalog, Benchmark, BenchmarkDescription, Table, TabularBenchmark};
use hg_optimizer::{
    generate_problems, Arity, Budget, GenerateConfig, Hyperparameters, OnError, Problem,
    ProblemShape, RandomSearch, Run,
};
use hg_types::{Fidelity, Measure};
use std::collections::BTreeMap;
use std::path::Path;

const LC_CSV: &str = "\
id,lr,epoch,acc
0,0.1,1,0.50
0,0.1,2,0.60
0,0.1,3,0.70
1,0.01,1,0.40
1,0.01,2,0.45
1,0.01,3,0.48
2,0.001,1,0.20
2,0.001,2,0.25
2,0.001,3,0.30
";

fn lc_bench() -> BenchmarkDescription {
    BenchmarkDescription::new(
        "lc-tiny",
        BTreeMap::from([(
            "acc".to_string(),
            Measure::metric((0.0, 1.0), false).unwrap(),
        )]),
        |desc| {
            let table = Table::from_csv_reader(LC_CSV.as_bytes())?;
            let bench = TabularBenchmark::new(desc.clone(), &table, "id", vec!["lr".to_string()])?;
            Ok(Benchmark::Tabular(bench))
        },
    )
    .with_fidelities(BTreeMap::from([(
        "epoch".to_string(),
        Fidelity::int(1, 3, 1).unwrap(),
    )]))
    .tabular()
}

#[test]
fn random_search_over_catalog_spends_exact_budget() {
    let catalog = default_catalog().unwrap();
    let benchmarks: Vec<_> = catalog.iter().cloned().collect();
    let optimizers = vec![(RandomSearch::description(), Hyperparameters::new())];
    let config = GenerateConfig::default()
        .with_budget(Budget::trials(25).unwrap())
        .with_seeds(vec![0, 1])
        .with_on_error(OnError::Raise);

    let runs = generate_problems(&optimizers, &benchmarks, &config).unwrap();
    assert_eq!(runs.len(), 4);

    for run in &runs {
        let report = run.execute().unwrap();
        assert_eq!(report.len(), 25);
        assert_eq!(report.budget_used, 25.0);
        let best = report.best_value().unwrap();
        assert!(report.history.iter().all(|r| r.value("value").unwrap() >= best));
        assert!(report.history.iter().all(|r| r.fidelity.is_empty()));
    }
}

#[test]
fn runs_are_reproducible_per_seed() {
    let catalog = default_catalog().unwrap();
    let ackley = catalog.get("ackley").unwrap().clone();
    let problem = Problem::new(
        RandomSearch::description(),
        Hyperparameters::new(),
        ackley,
        Budget::trials(10).unwrap(),
        &ProblemShape::default(),
    )
    .unwrap();

    let a = Run::new(problem.clone(), 5, Path::new("out")).execute().unwrap();
    let b = Run::new(problem.clone(), 5, Path::new("out")).execute().unwrap();
    let c = Run::new(problem, 6, Path::new("out")).execute().unwrap();
    assert_eq!(a.history, b.history);
    assert_ne!(a.history, c.history);
}

#[test]
fn random_search_on_tabular_benchmark_at_max_fidelity() {
    let optimizers = vec![(RandomSearch::description(), Hyperparameters::new())];
    let config = GenerateConfig::default()
        .with_fidelities(1)
        .with_budget(Budget::trials(6).unwrap())
        .with_on_error(OnError::Raise);

    let runs = generate_problems(&optimizers, &[lc_bench()], &config).unwrap();
    assert_eq!(runs.len(), 1);
    let report = runs[0].execute().unwrap();

    // Every query runs at epoch 3, a full trial each.
    assert_eq!(report.len(), 6);
    for result in &report.history {
        assert_eq!(result.fidelity["epoch"], hg_types::ParameterValue::Int(3));
        assert!(["0", "1", "2"].contains(&result.query.config_id()));
    }
    let best = report.best.as_ref().unwrap();
    assert!(report.history.iter().all(|r| r.value("acc") <= best.value("acc")));
}

#[test]
fn unsupported_problems_are_skipped_under_warn() {
    let optimizers = vec![(RandomSearch::description(), Hyperparameters::new())];
    let catalog = default_catalog().unwrap();
    let mut benchmarks: Vec<_> = catalog.iter().cloned().collect();
    benchmarks.push(lc_bench());

    // Only the tabular benchmark declares a fidelity.
    let config = GenerateConfig::default().with_fidelities(1);
    let runs = generate_problems(&optimizers, &benchmarks, &config).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].problem.benchmark.name, "lc-tiny");

    let two_objectives = GenerateConfig::default().with_objectives(2);
    assert!(generate_problems(&optimizers, &benchmarks, &two_objectives)
        .unwrap()
        .is_empty());
    assert!(RandomSearch::support().objectives == vec![Arity::Single]);
}
