use super::traits::{require_non_negative, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Bounds used when drawing and perturbing genomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeConfig {
    /// Largest magnitude of a torque component in a fresh genome; also the mutation noise range.
    pub init_torque_magnitude: f64,
    /// Entries per joint program for the timed encodings.
    pub program_length: usize,
    pub max_wait_secs: f64,
    pub max_duration_secs: f64,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            init_torque_magnitude: 1000.0,
            program_length: 40,
            max_wait_secs: 1.5,
            max_duration_secs: 5.0,
        }
    }
}

impl ConfigSection for GenomeConfig {
    fn section_name() -> &'static str {
        "genome"
    }

    fn validate(&self) -> Result<(), SwingEvoError> {
        require_non_negative("Initial torque magnitude", self.init_torque_magnitude)?;
        require_non_negative("Maximum wait time", self.max_wait_secs)?;
        require_non_negative("Maximum torque duration", self.max_duration_secs)?;
        if self.program_length == 0 {
            return Err(SwingEvoError::Configuration(
                "Program length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Genome".to_string(),
            fields: vec![
                FieldManifest::new(
                    "init_torque_magnitude",
                    "float",
                    json!(1000.0),
                    (Some(0.0), None),
                    "Bound of initial torque components and of mutation noise",
                ),
                FieldManifest::new(
                    "program_length",
                    "integer",
                    json!(40),
                    (Some(1.0), None),
                    "Entries per joint for the timed encodings",
                ),
                FieldManifest::new(
                    "max_wait_secs",
                    "float",
                    json!(1.5),
                    (Some(0.0), None),
                    "Initial bound on the wait before each torque",
                ),
                FieldManifest::new(
                    "max_duration_secs",
                    "float",
                    json!(5.0),
                    (Some(0.0), None),
                    "Initial bound on how long a torque is held",
                ),
            ],
        }
    }
}
