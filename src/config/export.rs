use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub write_best_genome: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            write_best_genome: true,
        }
    }
}

impl ConfigSection for ExportConfig {
    fn section_name() -> &'static str {
        "export"
    }

    fn validate(&self) -> Result<(), SwingEvoError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(SwingEvoError::Configuration(
                "Output directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Export".to_string(),
            fields: vec![
                FieldManifest::new(
                    "output_dir",
                    "path",
                    json!("results"),
                    (None, None),
                    "Directory receiving the fitness CSV files",
                ),
                FieldManifest::new(
                    "write_best_genome",
                    "bool",
                    json!(true),
                    (None, None),
                    "Also write the best genome as JSON next to the CSV",
                ),
            ],
        }
    }
}
