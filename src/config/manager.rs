use super::{
    evolution::EvolutionConfig, export::ExportConfig, genome::GenomeConfig, swing::SwingConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Environment variables with this prefix override file values,
/// e.g. `SWINGEVO_EVOLUTION__POPULATION_SIZE=40`.
pub const ENV_PREFIX: &str = "SWINGEVO";

/// Every parameter of one evolutionary run. Immutable once a run starts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub evolution: EvolutionConfig,
    pub swing: SwingConfig,
    pub genome: GenomeConfig,
    pub export: ExportConfig,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), SwingEvoError> {
        self.evolution.validate()?;
        self.swing.validate()?;
        self.genome.validate()?;
        self.export.validate()?;
        Ok(())
    }

    /// Simulated time a full run consumes: every generation runs every trial for the full budget.
    pub fn estimated_duration(&self) -> Duration {
        let secs = self.evolution.num_generations as f64
            * self.evolution.trials_per_generation as f64
            * self.swing.generation_time_secs;
        Duration::from_secs_f64(secs.max(0.0))
    }

    pub fn manifests(&self) -> Vec<ConfigManifest> {
        vec![
            self.evolution.to_manifest(),
            self.swing.to_manifest(),
            self.genome.to_manifest(),
            self.export.to_manifest(),
        ]
    }

    /// Parses TOML text layered over the defaults, then validates.
    pub fn from_toml_str(contents: &str) -> Result<Self, SwingEvoError> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&RunConfig::default())?)
            .add_source(::config::File::from_str(contents, ::config::FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: ::config::Config) -> Result<Self, SwingEvoError> {
        let config: RunConfig = settings
            .try_deserialize()
            .map_err(|e| SwingEvoError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<RunConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(RunConfig::default())),
        }
    }

    /// Loads defaults, then the file, then `SWINGEVO_*` environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SwingEvoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SwingEvoError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&RunConfig::default())?)
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config = RunConfig::finish(settings)?;

        *self.write_lock()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SwingEvoError> {
        let toml_str = toml::to_string_pretty(&self.get()?)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> Result<RunConfig, SwingEvoError> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|_| SwingEvoError::Configuration("Config lock poisoned".to_string()))
    }

    /// Applies `f` to a copy and commits it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), SwingEvoError>
    where
        F: FnOnce(&mut RunConfig),
    {
        let mut guard = self.write_lock()?;
        let mut candidate = guard.clone();
        f(&mut candidate);
        candidate.validate()?;
        *guard = candidate;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, RunConfig>, SwingEvoError> {
        self.config
            .write()
            .map_err(|_| SwingEvoError::Configuration("Config lock poisoned".to_string()))
    }
}
