use crate::config::{ClubGrip, FitnessMode, JointExtent, SwingConfig};
use crate::engines::generation::genome::ActuationProgram;
use crate::error::SimulationError;

/// Everything a harness needs to stage one swing.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingSetup {
    pub fitness_mode: FitnessMode,
    pub joint_extent: JointExtent,
    pub grip: ClubGrip,
    /// Hole distance for this generation, jitter included.
    pub hole_distance: f64,
    pub time_budget_secs: f64,
    /// Zero-based trial number within the generation.
    pub trial: usize,
}

impl SwingSetup {
    pub fn new(swing: &SwingConfig, perturbation: f64, trial: usize) -> Self {
        Self {
            fitness_mode: swing.fitness_mode,
            joint_extent: swing.joint_extent,
            grip: swing.grip,
            hole_distance: swing.hole_distance + perturbation,
            time_budget_secs: swing.generation_time_secs,
            trial,
        }
    }

    pub fn expected_joints(&self) -> usize {
        self.joint_extent.joint_count()
    }
}

/// The physical body simulation.
///
/// `run` blocks until the swing's time budget is used up and returns a
/// fitness where larger is better in both modes (see [`drive_distance_fitness`]
/// and [`accuracy_fitness`]). Implementations are shared across worker
/// threads while a generation is evaluated.
pub trait SimulationHarness: Sync {
    fn run(&self, program: &ActuationProgram, setup: &SwingSetup) -> Result<f64, SimulationError>;
}

impl<H: SimulationHarness + ?Sized> SimulationHarness for &H {
    fn run(&self, program: &ActuationProgram, setup: &SwingSetup) -> Result<f64, SimulationError> {
        (**self).run(program, setup)
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Ball travel from the tee scaled by the cosine of its angle to the drive
/// direction, i.e. the signed forward component of the displacement.
pub fn drive_distance_fitness(ball: [f64; 3], tee: [f64; 3], drive_direction: [f64; 3]) -> f64 {
    let length = norm(drive_direction);
    if length == 0.0 {
        return 0.0;
    }
    let travel = sub(ball, tee);
    (travel[0] * drive_direction[0] + travel[1] * drive_direction[1] + travel[2] * drive_direction[2])
        / length
}

/// Negated distance from the ball to the hole; a holed ball scores 0.
pub fn accuracy_fitness(ball: [f64; 3], hole: [f64; 3]) -> f64 {
    -norm(sub(ball, hole))
}
