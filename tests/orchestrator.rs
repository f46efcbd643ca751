use std::sync::atomic::{AtomicUsize, Ordering};
use swingevo::config::RunConfig;
use swingevo::engines::evaluation::{EvaluationWarning, SimulationHarness, SwingSetup};
use swingevo::engines::export::{ExportOutcome, ResultExporter};
use swingevo::engines::generation::{
    run_comparison, run_encoding, run_encoding_and_export, ActuationProgram, ActuationStep,
    RunOutcome, ConstantTorque, EncodedRun, Encoding,
    GenerationOrchestrator, GenerationSummary, ProgressCallback, RunPhase, TimedTorque,
    TorqueBurst,
};
use swingevo::{SimulationError, SwingEvoError};

/// Scores the forward torque of every joint's first command.
struct ForwardTorqueHarness;

impl SimulationHarness for ForwardTorqueHarness {
    fn run(&self, program: &ActuationProgram, _setup: &SwingSetup) -> Result<f64, SimulationError> {
        Ok(program.joints.iter().map(|joint| joint[0].torque.x).sum())
    }
}

/// Fails every swing whose first joint starts with a backward torque.
struct BackswingCrashHarness;

impl SimulationHarness for BackswingCrashHarness {
    fn run(&self, program: &ActuationProgram, _setup: &SwingSetup) -> Result<f64, SimulationError> {
        if program.joints[0][0].torque.x < 0.0 {
            Err(SimulationError::Crashed("club left the range".to_string()))
        } else {
            Ok(1.0)
        }
    }
}

struct NanHarness;

impl SimulationHarness for NanHarness {
    fn run(&self, _program: &ActuationProgram, _setup: &SwingSetup) -> Result<f64, SimulationError> {
        Ok(f64::NAN)
    }
}

/// Returns the trial number as fitness and counts calls.
#[derive(Default)]
struct TrialHarness {
    calls: AtomicUsize,
}

impl SimulationHarness for TrialHarness {
    fn run(&self, _program: &ActuationProgram, setup: &SwingSetup) -> Result<f64, SimulationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(setup.trial as f64)
    }
}

#[derive(Default)]
struct RecordingCallback {
    started: Vec<usize>,
    summaries: Vec<GenerationSummary>,
    warnings: Vec<EvaluationWarning>,
}

impl ProgressCallback for RecordingCallback {
    fn on_generation_start(&mut self, generation: usize, _total: usize) {
        self.started.push(generation);
    }

    fn on_evaluation_warning(&mut self, warning: &EvaluationWarning) {
        self.warnings.push(warning.clone());
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        self.summaries.push(summary.clone());
    }
}

/// Remembers what it was asked to export instead of writing files.
#[derive(Default)]
struct RecordingExporter {
    exported: Vec<(Encoding, usize, Option<f64>)>,
}

impl ResultExporter for RecordingExporter {
    fn export<S: ActuationStep>(&mut self, outcome: &RunOutcome<S>) -> swingevo::Result<ExportOutcome> {
        self.exported.push((
            outcome.encoding(),
            outcome.history.rows_written(),
            outcome.best_fitness(),
        ));
        Ok(ExportOutcome::Written(format!("run-{}.csv", self.exported.len()).into()))
    }

    fn export_comparison(&mut self, runs: &[EncodedRun]) -> swingevo::Result<ExportOutcome> {
        Ok(ExportOutcome::Written(format!("comparison-{}.csv", runs.len()).into()))
    }
}

fn small_config(generations: usize) -> RunConfig {
    let mut config = RunConfig::default();
    config.evolution.population_size = 10;
    config.evolution.num_generations = generations;
    config.evolution.trials_per_generation = 2;
    config.evolution.elitism_count = 2;
    config.evolution.seed = Some(42);
    config.genome.program_length = 5;
    config
}

#[test]
fn test_full_run_fills_history() {
    let config = small_config(6);
    let mut callback = RecordingCallback::default();
    let outcome = GenerationOrchestrator::<TimedTorque, _>::new(config, ForwardTorqueHarness)
        .run(&mut callback)
        .unwrap();

    assert_eq!(outcome.history.generations(), 6);
    assert_eq!(outcome.history.agents(), 10);
    assert_eq!(outcome.history.rows_written(), 6);
    assert!(outcome.history.is_complete());
    assert_eq!(outcome.final_population.len(), 10);
    assert_eq!(outcome.perturbations.len(), 6);
    assert!(outcome.warnings.is_empty());
    assert_eq!(callback.started, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(callback.summaries.len(), 6);

    let best = outcome.best.as_ref().unwrap();
    let overall = outcome
        .history
        .best_per_generation()
        .into_iter()
        .fold(f64::MIN, f64::max);
    assert_eq!(best.fitness, overall);
    assert_eq!(outcome.history.row(best.generation).unwrap()[best.agent], best.fitness);
}

#[test]
fn test_best_fitness_never_drops_with_elitism() {
    let outcome = GenerationOrchestrator::<TimedTorque, _>::new(small_config(8), ForwardTorqueHarness)
        .run(())
        .unwrap();

    let best = outcome.history.best_per_generation();
    for pair in best.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}

#[test]
fn test_population_size_is_invariant() {
    let mut orchestrator =
        GenerationOrchestrator::<TorqueBurst, _>::new(small_config(4), ForwardTorqueHarness);
    while orchestrator.phase() != RunPhase::Completed {
        orchestrator.step(&mut ()).unwrap();
        if let Some(population) = orchestrator.population() {
            assert_eq!(population.len(), 10);
        }
    }
}

#[test]
fn test_phase_sequence() {
    let mut orchestrator =
        GenerationOrchestrator::<ConstantTorque, _>::new(small_config(2), ForwardTorqueHarness);
    assert_eq!(orchestrator.phase(), RunPhase::Idle);

    let mut phases = Vec::new();
    while orchestrator.phase() != RunPhase::Completed {
        phases.push(orchestrator.step(&mut ()).unwrap());
    }
    assert_eq!(
        phases,
        vec![
            RunPhase::Initialized,
            RunPhase::Evaluating(0),
            RunPhase::Evolving(0),
            RunPhase::Evaluating(1),
            RunPhase::Completed,
        ]
    );
    assert!(matches!(
        orchestrator.step(&mut ()),
        Err(SwingEvoError::State(_))
    ));
}

#[test]
fn test_finish_before_completion_fails() {
    let mut orchestrator =
        GenerationOrchestrator::<ConstantTorque, _>::new(small_config(2), ForwardTorqueHarness);
    orchestrator.initialize().unwrap();
    assert!(orchestrator.initialize().is_err());
    assert!(orchestrator.finish().is_err());
}

#[test]
fn test_zero_generations_completes_immediately() {
    let outcome = GenerationOrchestrator::<ConstantTorque, _>::new(small_config(0), ForwardTorqueHarness)
        .run(())
        .unwrap();
    assert_eq!(outcome.history.rows_written(), 0);
    assert!(outcome.best.is_none());
}

#[test]
fn test_same_seed_same_populations() {
    let mut first = GenerationOrchestrator::<TimedTorque, _>::new(small_config(5), ForwardTorqueHarness);
    let mut second = GenerationOrchestrator::<TimedTorque, _>::new(small_config(5), ForwardTorqueHarness);

    while first.phase() != RunPhase::Completed {
        first.step(&mut ()).unwrap();
        second.step(&mut ()).unwrap();
        assert_eq!(first.phase(), second.phase());
        assert_eq!(first.population(), second.population());
    }
    assert_eq!(first.history(), second.history());
}

#[test]
fn test_zero_jitter_means_zero_perturbation() {
    let mut config = small_config(5);
    config.swing.hole_jitter = 0.0;
    let outcome = GenerationOrchestrator::<ConstantTorque, _>::new(config, ForwardTorqueHarness)
        .run(())
        .unwrap();
    assert!(outcome.perturbations.iter().all(|&p| p == 0.0));
}

#[test]
fn test_jitter_stays_in_range() {
    let mut config = small_config(20);
    config.swing.hole_jitter = 3.0;
    let outcome = GenerationOrchestrator::<ConstantTorque, _>::new(config, ForwardTorqueHarness)
        .run(())
        .unwrap();
    assert!(outcome.perturbations.iter().all(|p| p.abs() <= 3.0));
    assert!(outcome.perturbations.iter().any(|&p| p != 0.0));
}

#[test]
fn test_fitness_is_mean_over_trials() {
    let mut config = small_config(2);
    config.evolution.trials_per_generation = 3;
    let harness = TrialHarness::default();
    let outcome = GenerationOrchestrator::<ConstantTorque, _>::new(config, &harness)
        .run(())
        .unwrap();

    // Trials 0, 1 and 2 average to 1.
    for row in outcome.history.rows() {
        assert!(row.iter().all(|&f| f == 1.0));
    }
    assert_eq!(harness.calls.load(Ordering::SeqCst), 2 * 3 * 10);
}

#[test]
fn test_failed_swings_score_zero_and_continue() {
    let mut config = small_config(3);
    config.evolution.parallel_evaluation = false;
    let mut callback = RecordingCallback::default();
    let outcome = GenerationOrchestrator::<ConstantTorque, _>::new(config, BackswingCrashHarness)
        .run(&mut callback)
        .unwrap();

    assert!(outcome.history.is_complete());
    assert!(!outcome.warnings.is_empty());
    assert_eq!(callback.warnings, outcome.warnings);
    for warning in &outcome.warnings {
        let row = outcome.history.row(warning.generation).unwrap();
        assert_eq!(row[warning.agent], 0.0);
        assert!(matches!(warning.error, SimulationError::Crashed(_)));
    }
    let reported: usize = callback.summaries.iter().map(|s| s.warnings).sum();
    assert_eq!(reported, outcome.warnings.len());
}

#[test]
fn test_nan_fitness_is_a_failure() {
    let outcome = GenerationOrchestrator::<ConstantTorque, _>::new(small_config(1), NanHarness)
        .run(())
        .unwrap();
    assert_eq!(outcome.warnings.len(), 2 * 10);
    assert!(outcome.history.row(0).unwrap().iter().all(|&f| f == 0.0));
    assert!(matches!(outcome.warnings[0].error, SimulationError::NonFinite(_)));
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let mut config = small_config(3);
    config.evolution.elitism_count = 3;
    let harness = TrialHarness::default();
    let mut orchestrator = GenerationOrchestrator::<ConstantTorque, _>::new(config, &harness);

    assert!(matches!(
        orchestrator.step(&mut ()),
        Err(SwingEvoError::Configuration(_))
    ));
    assert_eq!(orchestrator.phase(), RunPhase::Idle);
    assert_eq!(harness.calls.load(Ordering::SeqCst), 0);

    let mut config = small_config(3);
    config.evolution.population_size = 1;
    config.evolution.elitism_count = 0;
    assert!(run_encoding(config, ForwardTorqueHarness, ()).is_err());
}

#[test]
fn test_run_encoding_dispatches_on_tag() {
    let mut config = small_config(2);
    config.evolution.encoding = Encoding::TorqueVector;
    let run = run_encoding(config, ForwardTorqueHarness, ()).unwrap();
    assert!(matches!(run, EncodedRun::TorqueVector(_)));
    assert_eq!(run.encoding(), Encoding::TorqueVector);
    assert_eq!(run.history().rows_written(), 2);
}

#[test]
fn test_comparison_runs_every_encoding() {
    let config = small_config(2);
    let runs = run_comparison(&config, &ForwardTorqueHarness, &mut ()).unwrap();
    let encodings: Vec<Encoding> = runs.iter().map(EncodedRun::encoding).collect();
    assert_eq!(encodings, Encoding::ALL.to_vec());
    assert!(runs.iter().all(|r| r.history().is_complete()));
}

#[test]
fn test_completed_run_is_exported_once() {
    let mut exporter = RecordingExporter::default();
    let (outcome, exported) = GenerationOrchestrator::<TorqueBurst, _>::new(small_config(3), ForwardTorqueHarness)
        .run_and_export((), &mut exporter)
        .unwrap();

    assert_eq!(exported, ExportOutcome::Written("run-1.csv".into()));
    assert_eq!(
        exporter.exported,
        vec![(Encoding::TimedTorqueBurst, 3, outcome.best_fitness())]
    );
}

#[test]
fn test_failed_run_is_not_exported() {
    let mut config = small_config(3);
    config.evolution.elitism_count = 3;
    let mut exporter = RecordingExporter::default();
    let result = GenerationOrchestrator::<TimedTorque, _>::new(config, ForwardTorqueHarness)
        .run_and_export((), &mut exporter);

    assert!(matches!(result, Err(SwingEvoError::Configuration(_))));
    assert!(exporter.exported.is_empty());
}

#[test]
fn test_run_encoding_and_export_dispatches_on_tag() {
    let mut config = small_config(2);
    config.evolution.encoding = Encoding::TorqueVector;
    let mut exporter = RecordingExporter::default();
    let (run, _) = run_encoding_and_export(config, ForwardTorqueHarness, (), &mut exporter).unwrap();

    assert!(matches!(run, EncodedRun::TorqueVector(_)));
    assert_eq!(exporter.exported.len(), 1);
    assert_eq!(exporter.exported[0].0, Encoding::TorqueVector);
    assert_eq!(exporter.exported[0].1, 2);
}
