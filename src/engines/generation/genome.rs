//! Genome encodings of a golfer's swing.
//!
//! A genome holds one actuation program per controllable joint. The three
//! encodings differ only in what a single program entry (an
//! [`ActuationStep`]) carries:
//!
//! - [`ConstantTorque`]: one torque, applied every physics step for the whole swing
//! - [`TorqueBurst`]: wait, then apply the torque as an instantaneous impulse
//! - [`TimedTorque`]: wait, then hold the torque for a duration
//!
//! Everything structural (random creation, crossover, mutation, conversion to
//! an [`ActuationProgram`]) lives once on [`Genome`].

use crate::config::{GenomeConfig, RunConfig};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Variant tag selecting the encoding of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    TorqueVector,
    TimedTorqueBurst,
    TimedDurationTorque,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [
        Encoding::TorqueVector,
        Encoding::TimedTorqueBurst,
        Encoding::TimedDurationTorque,
    ];

    /// Numeric identifier used in result file names (`chrom-N`).
    pub fn id(self) -> u8 {
        match self {
            Encoding::TorqueVector => 1,
            Encoding::TimedTorqueBurst => 2,
            Encoding::TimedDurationTorque => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Encoding::TorqueVector => "torque vector",
            Encoding::TimedTorqueBurst => "timed torque burst",
            Encoding::TimedDurationTorque => "timed duration torque",
        }
    }

    /// Entries per joint program.
    pub fn program_length(self, bounds: &GenomeConfig) -> usize {
        match self {
            Encoding::TorqueVector => 1,
            Encoding::TimedTorqueBurst | Encoding::TimedDurationTorque => bounds.program_length,
        }
    }
}

/// Uniform draw from `[-bound, bound]`; a zero bound yields exactly zero.
fn symmetric<R: Rng>(bound: f64, rng: &mut R) -> f64 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

/// Uniform draw from `[0, bound]`.
fn up_to<R: Rng>(bound: f64, rng: &mut R) -> f64 {
    if bound > 0.0 {
        rng.gen_range(0.0..=bound)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Torque {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Torque {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Every component uniform in `[-bound, bound]`.
    pub fn random<R: Rng>(bound: f64, rng: &mut R) -> Self {
        Self::new(symmetric(bound, rng), symmetric(bound, rng), symmetric(bound, rng))
    }

    /// Adds independent uniform noise in `[-bound, bound]` to each axis.
    pub fn perturbed<R: Rng>(self, bound: f64, rng: &mut R) -> Self {
        Self::new(
            self.x + symmetric(bound, rng),
            self.y + symmetric(bound, rng),
            self.z + symmetric(bound, rng),
        )
    }
}

/// How a harness applies the torque of one command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandMode {
    /// Every physics step until the swing ends.
    Continuous,
    /// Once, as an instantaneous impulse.
    Impulse,
    /// Every physics step for the given number of seconds.
    Hold(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuationCommand {
    /// Seconds to wait after the previous command finished.
    pub wait: f64,
    pub torque: Torque,
    pub mode: CommandMode,
}

/// Encoding-neutral, ordered per-joint program handed to a simulation harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuationProgram {
    pub joints: Vec<Vec<ActuationCommand>>,
}

impl ActuationProgram {
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

/// One entry of a joint program.
pub trait ActuationStep:
    Clone + PartialEq + Debug + Send + Sync + Serialize + DeserializeOwned
{
    const ENCODING: Encoding;

    fn random<R: Rng>(bounds: &GenomeConfig, rng: &mut R) -> Self;

    /// Adds torque noise on every axis and timing noise clamped at zero.
    fn perturb<R: Rng>(&mut self, bounds: &GenomeConfig, rng: &mut R);

    fn command(&self) -> ActuationCommand;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantTorque(pub Torque);

impl ActuationStep for ConstantTorque {
    const ENCODING: Encoding = Encoding::TorqueVector;

    fn random<R: Rng>(bounds: &GenomeConfig, rng: &mut R) -> Self {
        ConstantTorque(Torque::random(bounds.init_torque_magnitude, rng))
    }

    fn perturb<R: Rng>(&mut self, bounds: &GenomeConfig, rng: &mut R) {
        self.0 = self.0.perturbed(bounds.init_torque_magnitude, rng);
    }

    fn command(&self) -> ActuationCommand {
        ActuationCommand {
            wait: 0.0,
            torque: self.0,
            mode: CommandMode::Continuous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorqueBurst {
    pub wait: f64,
    pub torque: Torque,
}

impl ActuationStep for TorqueBurst {
    const ENCODING: Encoding = Encoding::TimedTorqueBurst;

    fn random<R: Rng>(bounds: &GenomeConfig, rng: &mut R) -> Self {
        let wait = up_to(bounds.max_wait_secs, rng);
        let torque = Torque::random(bounds.init_torque_magnitude, rng);
        Self { wait, torque }
    }

    fn perturb<R: Rng>(&mut self, bounds: &GenomeConfig, rng: &mut R) {
        self.torque = self.torque.perturbed(bounds.init_torque_magnitude, rng);
        self.wait = (self.wait + symmetric(bounds.max_wait_secs, rng)).max(0.0);
    }

    fn command(&self) -> ActuationCommand {
        ActuationCommand {
            wait: self.wait,
            torque: self.torque,
            mode: CommandMode::Impulse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedTorque {
    pub wait: f64,
    pub torque: Torque,
    pub duration: f64,
}

impl ActuationStep for TimedTorque {
    const ENCODING: Encoding = Encoding::TimedDurationTorque;

    fn random<R: Rng>(bounds: &GenomeConfig, rng: &mut R) -> Self {
        let wait = up_to(bounds.max_wait_secs, rng);
        let torque = Torque::random(bounds.init_torque_magnitude, rng);
        let duration = up_to(bounds.max_duration_secs, rng);
        Self { wait, torque, duration }
    }

    fn perturb<R: Rng>(&mut self, bounds: &GenomeConfig, rng: &mut R) {
        self.torque = self.torque.perturbed(bounds.init_torque_magnitude, rng);
        self.wait = (self.wait + symmetric(bounds.max_wait_secs, rng)).max(0.0);
        self.duration = (self.duration + symmetric(bounds.max_duration_secs, rng)).max(0.0);
    }

    fn command(&self) -> ActuationCommand {
        ActuationCommand {
            wait: self.wait,
            torque: self.torque,
            mode: CommandMode::Hold(self.duration),
        }
    }
}

/// One golfer's control policy: a program of `S` entries for every joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome<S> {
    joints: Vec<Vec<S>>,
}

pub type TorqueVectorGenome = Genome<ConstantTorque>;
pub type TimedBurstGenome = Genome<TorqueBurst>;
pub type TimedDurationGenome = Genome<TimedTorque>;

impl<S: ActuationStep> Genome<S> {
    pub fn from_joints(joints: Vec<Vec<S>>) -> Self {
        Self { joints }
    }

    /// Fresh genome sized for the run's joint extent and encoding.
    pub fn random<R: Rng>(config: &RunConfig, rng: &mut R) -> Self {
        let joint_count = config.swing.joint_extent.joint_count();
        let length = S::ENCODING.program_length(&config.genome);
        let joints = (0..joint_count)
            .map(|_| (0..length).map(|_| S::random(&config.genome, rng)).collect())
            .collect();
        Self { joints }
    }

    pub fn encoding(&self) -> Encoding {
        S::ENCODING
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Vec<S>] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> Option<&[S]> {
        self.joints.get(index).map(Vec::as_slice)
    }

    /// Single-point crossover on joint boundaries with the point uniform in `[1, joints - 1]`.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let len = self.joints.len().min(other.joints.len());
        if len <= 1 {
            return (self.clone(), other.clone());
        }
        let point = rng.gen_range(1..len);
        self.crossover_at(other, point)
    }

    /// Children get copies of the parents with every joint program at or after `point` swapped.
    pub fn crossover_at(&self, other: &Self, point: usize) -> (Self, Self) {
        let mut child1 = self.clone();
        let mut child2 = other.clone();
        let len = child1.joints.len().min(child2.joints.len());

        for i in point.min(len)..len {
            std::mem::swap(&mut child1.joints[i], &mut child2.joints[i]);
        }

        (child1, child2)
    }

    /// Perturbs every entry of one uniformly chosen joint and returns that joint's index.
    pub fn mutate<R: Rng>(&mut self, bounds: &GenomeConfig, rng: &mut R) -> Option<usize> {
        if self.joints.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.joints.len());
        for step in self.joints[index].iter_mut() {
            step.perturb(bounds, rng);
        }
        Some(index)
    }

    pub fn actuation(&self) -> ActuationProgram {
        ActuationProgram {
            joints: self
                .joints
                .iter()
                .map(|program| program.iter().map(S::command).collect())
                .collect(),
        }
    }
}
