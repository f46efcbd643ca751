pub mod genome;
pub mod operators;
pub mod evolver;
pub mod history;
pub mod progress;
pub mod orchestrator;

pub use genome::{
    ActuationCommand, ActuationProgram, ActuationStep, CommandMode, ConstantTorque, Encoding,
    Genome, TimedBurstGenome, TimedDurationGenome, TimedTorque, Torque, TorqueBurst,
    TorqueVectorGenome,
};
pub use evolver::{Offspring, Origin, PopulationEvolver};
pub use history::{BestRecord, FitnessHistory};
pub use progress::{ConsoleProgressCallback, GenerationSummary, ProgressCallback};
pub use orchestrator::{
    run_comparison, run_encoding, run_encoding_and_export, EncodedRun, GenerationOrchestrator, RunOutcome, RunPhase,
};
