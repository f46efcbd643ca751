use crate::config::{RunConfig, SwingConfig};
use crate::engines::evaluation::harness::{SimulationHarness, SwingSetup};
use crate::engines::generation::genome::{ActuationProgram, ActuationStep, Genome};
use crate::error::SimulationError;
use rayon::prelude::*;

/// A trial that produced no usable fitness. It counted as 0 toward the mean.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationWarning {
    pub generation: usize,
    pub trial: usize,
    pub agent: usize,
    pub error: SimulationError,
}

impl std::fmt::Display for EvaluationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "generation {} trial {} agent {}: {}",
            self.generation + 1,
            self.trial + 1,
            self.agent,
            self.error
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFitness {
    /// Mean over all trials, indexed like the population.
    pub fitness: Vec<f64>,
    pub warnings: Vec<EvaluationWarning>,
}

/// Mean fitness of a single genome and the trials that failed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeFitness {
    pub fitness: f64,
    pub warnings: Vec<EvaluationWarning>,
}

/// Scores genomes by running them through a [`SimulationHarness`].
pub struct FitnessEvaluator<H> {
    harness: H,
    swing: SwingConfig,
    trials: usize,
    parallel: bool,
}

impl<H: SimulationHarness> FitnessEvaluator<H> {
    pub fn new(harness: H, config: &RunConfig) -> Self {
        Self {
            harness,
            swing: config.swing.clone(),
            trials: config.evolution.trials_per_generation.max(1),
            parallel: config.evolution.parallel_evaluation,
        }
    }

    /// Mean fitness of one genome over all trials against the same perturbation.
    /// Warnings report the genome as agent 0.
    pub fn evaluate<S: ActuationStep>(
        &self,
        genome: &Genome<S>,
        generation: usize,
        perturbation: f64,
    ) -> GenomeFitness {
        let scored = self.evaluate_generation(std::slice::from_ref(genome), generation, perturbation);
        GenomeFitness {
            fitness: scored.fitness.first().copied().unwrap_or(0.0),
            warnings: scored.warnings,
        }
    }

    /// Runs every trial for the whole population; each trial finishes for
    /// all genomes before the next one starts.
    pub fn evaluate_generation<S: ActuationStep>(
        &self,
        population: &[Genome<S>],
        generation: usize,
        perturbation: f64,
    ) -> GenerationFitness {
        let programs: Vec<ActuationProgram> = population.iter().map(Genome::actuation).collect();
        let mut totals = vec![0.0; population.len()];
        let mut warnings = Vec::new();

        for trial in 0..self.trials {
            let setup = SwingSetup::new(&self.swing, perturbation, trial);
            let outcomes = self.evaluate_trial(&programs, &setup);

            for (agent, outcome) in outcomes.into_iter().enumerate() {
                match outcome {
                    Ok(fitness) => totals[agent] += fitness,
                    Err(error) => {
                        let warning = EvaluationWarning {
                            generation,
                            trial,
                            agent,
                            error,
                        };
                        log::warn!("Evaluation failed, scoring 0: {}", warning);
                        warnings.push(warning);
                    }
                }
            }
            log::debug!(
                "Generation {} trial {}/{} done",
                generation + 1,
                trial + 1,
                self.trials
            );
        }

        let fitness = totals
            .into_iter()
            .map(|total| total / self.trials as f64)
            .collect();

        GenerationFitness { fitness, warnings }
    }

    fn evaluate_trial(
        &self,
        programs: &[ActuationProgram],
        setup: &SwingSetup,
    ) -> Vec<Result<f64, SimulationError>> {
        if self.parallel {
            programs
                .par_iter()
                .map(|program| self.run_trial(program, setup))
                .collect()
        } else {
            programs
                .iter()
                .map(|program| self.run_trial(program, setup))
                .collect()
        }
    }

    fn run_trial(&self, program: &ActuationProgram, setup: &SwingSetup) -> Result<f64, SimulationError> {
        let fitness = self.harness.run(program, setup)?;
        if fitness.is_finite() {
            Ok(fitness)
        } else {
            Err(SimulationError::NonFinite(fitness))
        }
    }
}
