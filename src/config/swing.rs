use super::traits::{require_non_negative, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// What a swing is scored on. Both modes are "higher is better".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMode {
    /// Forward carry along the intended drive direction.
    DriveDistance,
    /// Negated distance between the resting ball and the hole.
    Accuracy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointExtent {
    ArmsTorso,
    FullBody,
}

impl JointExtent {
    /// Number of controllable joints the body exposes.
    pub fn joint_count(self) -> usize {
        match self {
            JointExtent::ArmsTorso => 8,
            JointExtent::FullBody => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubGrip {
    TwoHands,
    OneHand,
}

/// Course and golfer settings shared by every agent of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingConfig {
    pub fitness_mode: FitnessMode,
    pub joint_extent: JointExtent,
    pub grip: ClubGrip,
    pub hole_distance: f64,
    /// Half-width of the per-generation hole distance offset.
    pub hole_jitter: f64,
    /// Simulated seconds each swing is allowed to run.
    pub generation_time_secs: f64,
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            fitness_mode: FitnessMode::DriveDistance,
            joint_extent: JointExtent::ArmsTorso,
            grip: ClubGrip::TwoHands,
            hole_distance: 20.0,
            hole_jitter: 0.0,
            generation_time_secs: 6.0,
        }
    }
}

impl ConfigSection for SwingConfig {
    fn section_name() -> &'static str {
        "swing"
    }

    fn validate(&self) -> Result<(), SwingEvoError> {
        require_non_negative("Hole distance", self.hole_distance)?;
        require_non_negative("Hole distance jitter", self.hole_jitter)?;
        require_non_negative("Generation time", self.generation_time_secs)?;
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Swing".to_string(),
            fields: vec![
                FieldManifest::new(
                    "fitness_mode",
                    "enum",
                    json!("drive_distance"),
                    (None, None),
                    "drive_distance | accuracy",
                ),
                FieldManifest::new(
                    "joint_extent",
                    "enum",
                    json!("arms_torso"),
                    (None, None),
                    "arms_torso (8 joints) | full_body (12 joints)",
                ),
                FieldManifest::new(
                    "grip",
                    "enum",
                    json!("two_hands"),
                    (None, None),
                    "two_hands | one_hand",
                ),
                FieldManifest::new(
                    "hole_distance",
                    "float",
                    json!(20.0),
                    (Some(0.0), None),
                    "Distance from the tee to the hole",
                ),
                FieldManifest::new(
                    "hole_jitter",
                    "float",
                    json!(0.0),
                    (Some(0.0), None),
                    "Random hole offset range applied each generation",
                ),
                FieldManifest::new(
                    "generation_time_secs",
                    "float",
                    json!(6.0),
                    (Some(0.0), None),
                    "Simulated time per swing",
                ),
            ],
        }
    }
}
