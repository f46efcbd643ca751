use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwingEvoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid run state: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, SwingEvoError>;

/// Failure of a single simulated trial, reported by a harness.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("harness expected {expected} controllable joints, genome has {actual}")]
    JointMismatch { expected: usize, actual: usize },

    #[error("trial produced a non-finite fitness ({0})")]
    NonFinite(f64),

    #[error("simulation crashed: {0}")]
    Crashed(String),
}
