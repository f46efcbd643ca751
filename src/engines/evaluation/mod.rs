pub mod evaluator;
pub mod harness;
pub mod surrogate;

pub use evaluator::{EvaluationWarning, FitnessEvaluator, GenerationFitness, GenomeFitness};
pub use harness::{accuracy_fitness, drive_distance_fitness, SimulationHarness, SwingSetup};
pub use surrogate::SurrogateHarness;
