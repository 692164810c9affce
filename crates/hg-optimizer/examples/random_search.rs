use hg_bench::default_catalog;
use hg_optimizer::{execute_all, generate_problems, GenerateConfig, Hyperparameters, RandomSearch};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hg_optimizer=info,hg_bench=info".into()),
        )
        .init();

    let catalog = default_catalog()?;
    let benchmarks: Vec<_> = catalog.iter().cloned().collect();
    let optimizers = vec![(RandomSearch::description(), Hyperparameters::new())];

    let config = match std::env::args().nth(1) {
        Some(path) => GenerateConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => GenerateConfig::default().with_seeds(vec![0, 1, 2]),
    };

    let runs = generate_problems(&optimizers, &benchmarks, &config)?;
    for report in execute_all(&runs)? {
        println!(
            "{:<70} trials={:<4} best={:.6}",
            report.name,
            report.len(),
            report.best_value().unwrap_or(f64::NAN)
        );
    }
    Ok(())
}
