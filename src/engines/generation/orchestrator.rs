use crate::config::RunConfig;
use crate::engines::evaluation::{EvaluationWarning, FitnessEvaluator, SimulationHarness};
use crate::engines::export::{ExportOutcome, ResultExporter};
use crate::engines::generation::evolver::PopulationEvolver;
use crate::engines::generation::genome::{
    ActuationStep, ConstantTorque, Encoding, Genome, TimedTorque, TorqueBurst,
};
use crate::engines::generation::history::{BestRecord, FitnessHistory};
use crate::engines::generation::operators::{best_index, mean};
use crate::engines::generation::progress::{GenerationSummary, ProgressCallback};
use crate::error::SwingEvoError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lifecycle of a run. `step` performs the work of the current phase and moves to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Initialized,
    Evaluating(usize),
    Evolving(usize),
    Completed,
}

/// Mutable state of a run, owned by the orchestrator and touched one generation at a time.
#[derive(Debug, Clone)]
struct RunState<S> {
    population: Vec<Genome<S>>,
    fitness: Vec<f64>,
    history: FitnessHistory,
    best: Option<BestRecord<S>>,
    perturbations: Vec<f64>,
    warnings: Vec<EvaluationWarning>,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome<S> {
    pub config: RunConfig,
    pub history: FitnessHistory,
    pub best: Option<BestRecord<S>>,
    /// Hole distance offset drawn for each generation.
    pub perturbations: Vec<f64>,
    pub warnings: Vec<EvaluationWarning>,
    pub final_population: Vec<Genome<S>>,
}

impl<S: ActuationStep> RunOutcome<S> {
    pub fn encoding(&self) -> Encoding {
        S::ENCODING
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.fitness)
    }
}

/// Drives initialization, per-generation evaluation and evolution until the
/// generation budget is spent.
pub struct GenerationOrchestrator<S, H> {
    config: RunConfig,
    evaluator: FitnessEvaluator<H>,
    evolver: PopulationEvolver,
    rng: StdRng,
    phase: RunPhase,
    state: Option<RunState<S>>,
}

impl<S: ActuationStep, H: SimulationHarness> GenerationOrchestrator<S, H> {
    pub fn new(config: RunConfig, harness: H) -> Self {
        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            evaluator: FitnessEvaluator::new(harness, &config),
            evolver: PopulationEvolver::new(&config),
            config,
            rng,
            phase: RunPhase::Idle,
            state: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn population(&self) -> Option<&[Genome<S>]> {
        self.state.as_ref().map(|s| s.population.as_slice())
    }

    pub fn history(&self) -> Option<&FitnessHistory> {
        self.state.as_ref().map(|s| &s.history)
    }

    pub fn best(&self) -> Option<&BestRecord<S>> {
        self.state.as_ref().and_then(|s| s.best.as_ref())
    }

    /// Validates the configuration and draws the initial population.
    pub fn initialize(&mut self) -> Result<(), SwingEvoError> {
        if self.phase != RunPhase::Idle {
            return Err(SwingEvoError::State(format!(
                "cannot initialize a run in phase {:?}",
                self.phase
            )));
        }
        self.config.validate()?;

        let population_size = self.config.evolution.population_size;
        let generations = self.config.evolution.num_generations;
        let population = (0..population_size)
            .map(|_| Genome::<S>::random(&self.config, &mut self.rng))
            .collect();

        log::info!(
            "Initialized {} population of {} golfers for {} generations ({} joints each)",
            S::ENCODING.label(),
            population_size,
            generations,
            self.config.swing.joint_extent.joint_count()
        );

        self.state = Some(RunState {
            population,
            fitness: Vec::new(),
            history: FitnessHistory::new(generations, population_size),
            best: None,
            perturbations: Vec::with_capacity(generations),
            warnings: Vec::new(),
        });
        self.phase = RunPhase::Initialized;
        Ok(())
    }

    /// Performs one state transition and returns the new phase.
    pub fn step<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<RunPhase, SwingEvoError> {
        let next = match self.phase {
            RunPhase::Idle => {
                self.initialize()?;
                RunPhase::Initialized
            }
            RunPhase::Initialized => {
                if self.config.evolution.num_generations == 0 {
                    RunPhase::Completed
                } else {
                    RunPhase::Evaluating(0)
                }
            }
            RunPhase::Evaluating(generation) => {
                self.evaluate(generation, callback)?;
                if generation + 1 < self.config.evolution.num_generations {
                    RunPhase::Evolving(generation)
                } else {
                    RunPhase::Completed
                }
            }
            RunPhase::Evolving(generation) => {
                self.evolve()?;
                RunPhase::Evaluating(generation + 1)
            }
            RunPhase::Completed => {
                return Err(SwingEvoError::State("run already completed".to_string()));
            }
        };

        self.phase = next;
        Ok(next)
    }

    /// Steps until the run completes.
    pub fn run<C: ProgressCallback>(mut self, mut callback: C) -> Result<RunOutcome<S>, SwingEvoError> {
        while self.phase != RunPhase::Completed {
            self.step(&mut callback)?;
        }
        self.finish()
    }

    /// Steps until the run completes, then hands the results to `exporter`.
    pub fn run_and_export<C, E>(
        self,
        callback: C,
        exporter: &mut E,
    ) -> Result<(RunOutcome<S>, ExportOutcome), SwingEvoError>
    where
        C: ProgressCallback,
        E: ResultExporter,
    {
        let outcome = self.run(callback)?;
        let exported = exporter.export(&outcome)?;
        Ok((outcome, exported))
    }

    /// Hands out the results of a completed run.
    pub fn finish(self) -> Result<RunOutcome<S>, SwingEvoError> {
        if self.phase != RunPhase::Completed {
            return Err(SwingEvoError::State(format!(
                "run not completed, currently {:?}",
                self.phase
            )));
        }
        let state = self
            .state
            .ok_or_else(|| SwingEvoError::State("run was never initialized".to_string()))?;

        Ok(RunOutcome {
            config: self.config,
            history: state.history,
            best: state.best,
            perturbations: state.perturbations,
            warnings: state.warnings,
            final_population: state.population,
        })
    }

    fn draw_perturbation(&mut self) -> f64 {
        let range = self.config.swing.hole_jitter;
        if range > 0.0 {
            self.rng.gen_range(-range..=range)
        } else {
            0.0
        }
    }

    fn evaluate<C: ProgressCallback>(
        &mut self,
        generation: usize,
        callback: &mut C,
    ) -> Result<(), SwingEvoError> {
        let total = self.config.evolution.num_generations;
        callback.on_generation_start(generation, total);

        let perturbation = self.draw_perturbation();
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| SwingEvoError::State("evaluating before initialization".to_string()))?;

        let scored = self
            .evaluator
            .evaluate_generation(&state.population, generation, perturbation);
        for warning in &scored.warnings {
            callback.on_evaluation_warning(warning);
        }

        state.history.record(generation, &scored.fitness)?;

        if state.best.is_none() {
            if let (Some(genome), Some(&fitness)) = (state.population.first(), scored.fitness.first()) {
                state.best = Some(BestRecord {
                    genome: genome.clone(),
                    fitness,
                    generation,
                    agent: 0,
                });
            }
        }
        if let (Some((agent, fitness)), Some(best)) = (best_index(&scored.fitness), state.best.as_mut()) {
            if fitness > best.fitness {
                *best = BestRecord {
                    genome: state.population[agent].clone(),
                    fitness,
                    generation,
                    agent,
                };
            }
        }

        let summary = GenerationSummary {
            generation,
            total_generations: total,
            perturbation,
            best_fitness: best_index(&scored.fitness).map(|(_, f)| f).unwrap_or(f64::MIN),
            mean_fitness: mean(&scored.fitness),
            best_ever: state.best.as_ref().map(|b| b.fitness).unwrap_or(f64::MIN),
            warnings: scored.warnings.len(),
        };

        state.perturbations.push(perturbation);
        state.warnings.extend(scored.warnings);
        state.fitness = scored.fitness;
        callback.on_generation_complete(&summary);
        Ok(())
    }

    fn evolve(&mut self) -> Result<(), SwingEvoError> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| SwingEvoError::State("evolving before initialization".to_string()))?;

        let next = self
            .evolver
            .next_generation(&state.population, &state.fitness, &mut self.rng)?;
        state.population = next;
        state.fitness.clear();
        Ok(())
    }
}

/// A finished run of whichever encoding the configuration selected.
#[derive(Debug, Clone)]
pub enum EncodedRun {
    TorqueVector(RunOutcome<ConstantTorque>),
    TimedTorqueBurst(RunOutcome<TorqueBurst>),
    TimedDurationTorque(RunOutcome<TimedTorque>),
}

impl EncodedRun {
    pub fn encoding(&self) -> Encoding {
        match self {
            EncodedRun::TorqueVector(_) => Encoding::TorqueVector,
            EncodedRun::TimedTorqueBurst(_) => Encoding::TimedTorqueBurst,
            EncodedRun::TimedDurationTorque(_) => Encoding::TimedDurationTorque,
        }
    }

    pub fn history(&self) -> &FitnessHistory {
        match self {
            EncodedRun::TorqueVector(run) => &run.history,
            EncodedRun::TimedTorqueBurst(run) => &run.history,
            EncodedRun::TimedDurationTorque(run) => &run.history,
        }
    }

    pub fn config(&self) -> &RunConfig {
        match self {
            EncodedRun::TorqueVector(run) => &run.config,
            EncodedRun::TimedTorqueBurst(run) => &run.config,
            EncodedRun::TimedDurationTorque(run) => &run.config,
        }
    }

    pub fn best_fitness(&self) -> Option<f64> {
        match self {
            EncodedRun::TorqueVector(run) => run.best_fitness(),
            EncodedRun::TimedTorqueBurst(run) => run.best_fitness(),
            EncodedRun::TimedDurationTorque(run) => run.best_fitness(),
        }
    }

    pub fn warning_count(&self) -> usize {
        match self {
            EncodedRun::TorqueVector(run) => run.warnings.len(),
            EncodedRun::TimedTorqueBurst(run) => run.warnings.len(),
            EncodedRun::TimedDurationTorque(run) => run.warnings.len(),
        }
    }
}

/// Runs the encoding named by `config.evolution.encoding`.
pub fn run_encoding<H, C>(config: RunConfig, harness: H, callback: C) -> Result<EncodedRun, SwingEvoError>
where
    H: SimulationHarness,
    C: ProgressCallback,
{
    Ok(match config.evolution.encoding {
        Encoding::TorqueVector => {
            EncodedRun::TorqueVector(GenerationOrchestrator::new(config, harness).run(callback)?)
        }
        Encoding::TimedTorqueBurst => {
            EncodedRun::TimedTorqueBurst(GenerationOrchestrator::new(config, harness).run(callback)?)
        }
        Encoding::TimedDurationTorque => {
            EncodedRun::TimedDurationTorque(GenerationOrchestrator::new(config, harness).run(callback)?)
        }
    })
}

/// Like [`run_encoding`], exporting the run once it completes.
pub fn run_encoding_and_export<H, C, E>(
    config: RunConfig,
    harness: H,
    callback: C,
    exporter: &mut E,
) -> Result<(EncodedRun, ExportOutcome), SwingEvoError>
where
    H: SimulationHarness,
    C: ProgressCallback,
    E: ResultExporter,
{
    Ok(match config.evolution.encoding {
        Encoding::TorqueVector => {
            let (run, exported) = GenerationOrchestrator::new(config, harness).run_and_export(callback, exporter)?;
            (EncodedRun::TorqueVector(run), exported)
        }
        Encoding::TimedTorqueBurst => {
            let (run, exported) = GenerationOrchestrator::new(config, harness).run_and_export(callback, exporter)?;
            (EncodedRun::TimedTorqueBurst(run), exported)
        }
        Encoding::TimedDurationTorque => {
            let (run, exported) = GenerationOrchestrator::new(config, harness).run_and_export(callback, exporter)?;
            (EncodedRun::TimedDurationTorque(run), exported)
        }
    })
}

/// Runs all three encodings one after another with otherwise identical settings.
pub fn run_comparison<H, C>(
    config: &RunConfig,
    harness: &H,
    callback: &mut C,
) -> Result<Vec<EncodedRun>, SwingEvoError>
where
    H: SimulationHarness,
    C: ProgressCallback,
{
    config.validate()?;
    Encoding::ALL
        .iter()
        .map(|&encoding| {
            let mut run_config = config.clone();
            run_config.evolution.encoding = encoding;
            log::info!("Running {} encoding", encoding.label());
            run_encoding(run_config, harness, &mut *callback)
        })
        .collect()
}
