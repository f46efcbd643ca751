use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), SwingEvoError>;
    fn to_manifest(&self) -> ConfigManifest;
}

/// Configuration manifest for an external input form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub section: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub default: serde_json::Value,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}

impl FieldManifest {
    pub fn new(
        name: &str,
        field_type: &str,
        default: serde_json::Value,
        range: (Option<f64>, Option<f64>),
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            default,
            min: range.0,
            max: range.1,
            description: description.to_string(),
        }
    }
}

/// Rejects NaN/infinite values and anything below zero.
pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<(), SwingEvoError> {
    if !value.is_finite() {
        return Err(SwingEvoError::Configuration(format!(
            "{} must be a number, got {}",
            name, value
        )));
    }
    if value < 0.0 {
        return Err(SwingEvoError::Configuration(format!(
            "{} must not be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn require_probability(name: &str, value: f64) -> Result<(), SwingEvoError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SwingEvoError::Configuration(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}
