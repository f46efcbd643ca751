pub mod traits;
pub mod evolution;
pub mod swing;
pub mod genome;
pub mod export;
pub mod manager;

pub use manager::{ConfigManager, RunConfig};
pub use evolution::EvolutionConfig;
pub use swing::{ClubGrip, FitnessMode, JointExtent, SwingConfig};
pub use genome::GenomeConfig;
pub use export::ExportConfig;
pub use traits::{ConfigManifest, ConfigSection, FieldManifest};
