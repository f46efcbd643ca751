use super::traits::{require_probability, ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::generation::genome::Encoding;
use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Parameters of the genetic algorithm itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub num_generations: usize,
    pub trials_per_generation: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elitism_count: usize,
    pub encoding: Encoding,
    pub parallel_evaluation: bool,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            num_generations: 10,
            trials_per_generation: 3,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            elitism_count: 2,
            encoding: Encoding::TimedDurationTorque,
            parallel_evaluation: true,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), SwingEvoError> {
        // Tournament selection draws two distinct candidates.
        if self.population_size < 2 {
            return Err(SwingEvoError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.trials_per_generation == 0 {
            return Err(SwingEvoError::Configuration(
                "Trials per generation must be at least 1".to_string(),
            ));
        }
        require_probability("Crossover rate", self.crossover_rate)?;
        require_probability("Mutation rate", self.mutation_rate)?;
        if self.elitism_count % 2 != 0 {
            return Err(SwingEvoError::Configuration(format!(
                "Elitism count must be even, got {}",
                self.elitism_count
            )));
        }
        if self.elitism_count >= self.population_size {
            return Err(SwingEvoError::Configuration(format!(
                "Elitism count ({}) must be smaller than the population size ({})",
                self.elitism_count, self.population_size
            )));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    json!(20),
                    (Some(2.0), None),
                    "Number of golfers in each generation",
                ),
                FieldManifest::new(
                    "num_generations",
                    "integer",
                    json!(10),
                    (Some(0.0), None),
                    "Number of generations to evolve",
                ),
                FieldManifest::new(
                    "trials_per_generation",
                    "integer",
                    json!(3),
                    (Some(1.0), None),
                    "Swings per golfer per generation; fitness is their mean",
                ),
                FieldManifest::new(
                    "crossover_rate",
                    "float",
                    json!(0.8),
                    (Some(0.0), Some(1.0)),
                    "Probability that a selected pair is recombined",
                ),
                FieldManifest::new(
                    "mutation_rate",
                    "float",
                    json!(0.1),
                    (Some(0.0), Some(1.0)),
                    "Probability that an offspring is mutated",
                ),
                FieldManifest::new(
                    "elitism_count",
                    "integer",
                    json!(2),
                    (Some(0.0), None),
                    "Fittest golfers copied unchanged (even, below population size)",
                ),
                FieldManifest::new(
                    "encoding",
                    "enum",
                    json!("timed_duration_torque"),
                    (None, None),
                    "torque_vector | timed_torque_burst | timed_duration_torque",
                ),
                FieldManifest::new(
                    "parallel_evaluation",
                    "bool",
                    json!(true),
                    (None, None),
                    "Evaluate golfers of one trial in parallel",
                ),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::Value::Null,
                    (Some(0.0), None),
                    "Seed of the run's random stream; omit for entropy",
                ),
            ],
        }
    }
}
