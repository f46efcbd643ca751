use anyhow::{bail, Context};
use swingevo::config::{ConfigManager, RunConfig};
use swingevo::engines::evaluation::SurrogateHarness;
use swingevo::engines::export::{CsvExporter, ResultExporter};
use swingevo::engines::generation::{
    run_comparison, run_encoding_and_export, ConsoleProgressCallback,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config_path = None;
    let mut compare = false;
    let mut dump_config = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--compare" => compare = true,
            "--dump-config" => dump_config = true,
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            path => config_path = Some(path.to_string()),
        }
    }

    if dump_config {
        println!("{}", toml::to_string_pretty(&RunConfig::default())?);
        return Ok(());
    }

    let manager = ConfigManager::new();
    if let Some(path) = &config_path {
        manager
            .load_from_file(path)
            .with_context(|| format!("loading {}", path))?;
    }
    let config = manager.get()?;
    config.validate()?;

    log::info!(
        "Population {}, {} generations x {} swings, approx. {:.0}s of simulated time per encoding",
        config.evolution.population_size,
        config.evolution.num_generations,
        config.evolution.trials_per_generation,
        config.estimated_duration().as_secs_f64()
    );

    let harness = SurrogateHarness::default();
    let mut exporter = CsvExporter::new(&config.export);

    if compare {
        let runs = run_comparison(&config, &harness, &mut ConsoleProgressCallback)?;
        for run in &runs {
            log::info!(
                "{}: best fitness {:.4}, {} failed swings",
                run.encoding().label(),
                run.best_fitness().unwrap_or(f64::NAN),
                run.warning_count()
            );
            exporter.export_encoded(run)?;
        }
        let outcome = exporter.export_comparison(&runs)?;
        log::info!("Comparison results: {}", outcome.path().display());
    } else {
        let (run, outcome) =
            run_encoding_and_export(config, &harness, ConsoleProgressCallback, &mut exporter)?;
        log::info!(
            "{}: best fitness {:.4}, {} failed swings",
            run.encoding().label(),
            run.best_fitness().unwrap_or(f64::NAN),
            run.warning_count()
        );
        log::info!("Results: {}", outcome.path().display());
    }

    Ok(())
}
