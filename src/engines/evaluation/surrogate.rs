//! Closed-form stand-in for the physics engine.
//!
//! Integrates every joint's torque over the swing's time budget into a club
//! impulse, turns that into a launch speed and heading, and lands the ball
//! on a fixed-loft ballistic arc. Deterministic and cheap, which makes it
//! suitable for dry runs of the evolutionary loop; it is not a model of a
//! real golf swing.

use crate::config::{ClubGrip, FitnessMode};
use crate::engines::evaluation::harness::{
    accuracy_fitness, drive_distance_fitness, SimulationHarness, SwingSetup,
};
use crate::engines::generation::genome::{ActuationCommand, ActuationProgram, CommandMode};
use crate::error::SimulationError;

const GRAVITY: f64 = 9.81;
const FIXED_DT: f64 = 0.02;
const TEE: [f64; 3] = [0.0, 0.0, 0.0];
const DRIVE_DIRECTION: [f64; 3] = [1.0, 0.0, 0.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SurrogateHarness {
    /// Club-head speed gained per unit of integrated torque.
    pub speed_per_impulse: f64,
    pub max_speed: f64,
    pub loft_degrees: f64,
    /// Joint whose attachment is released when the club is held one-handed.
    pub secondary_joint: usize,
    pub one_hand_efficiency: f64,
}

impl Default for SurrogateHarness {
    fn default() -> Self {
        Self {
            speed_per_impulse: 1e-3,
            max_speed: 80.0,
            loft_degrees: 12.0,
            secondary_joint: 1,
            one_hand_efficiency: 0.7,
        }
    }
}

impl SurrogateHarness {
    /// Integrated torque of one joint program within `budget` seconds.
    fn joint_impulse(commands: &[ActuationCommand], budget: f64) -> [f64; 3] {
        let mut impulse = [0.0; 3];
        let mut clock = 0.0;

        for command in commands {
            clock += command.wait;
            if clock > budget {
                break;
            }
            let active = match command.mode {
                CommandMode::Continuous => budget - clock,
                CommandMode::Impulse => FIXED_DT,
                CommandMode::Hold(duration) => duration.min(budget - clock),
            };
            impulse[0] += command.torque.x * active;
            impulse[1] += command.torque.y * active;
            impulse[2] += command.torque.z * active;
            if let CommandMode::Hold(duration) = command.mode {
                clock += duration;
            }
        }

        impulse
    }

    fn landing_point(&self, club_impulse: [f64; 3]) -> [f64; 3] {
        let horizontal = (club_impulse[0].powi(2) + club_impulse[2].powi(2)).sqrt();
        if horizontal == 0.0 {
            return TEE;
        }
        let speed = (horizontal * self.speed_per_impulse).min(self.max_speed);
        let carry = speed * speed * (2.0 * self.loft_degrees.to_radians()).sin() / GRAVITY;
        [
            carry * club_impulse[0] / horizontal,
            0.0,
            carry * club_impulse[2] / horizontal,
        ]
    }
}

impl SimulationHarness for SurrogateHarness {
    fn run(&self, program: &ActuationProgram, setup: &SwingSetup) -> Result<f64, SimulationError> {
        let expected = setup.expected_joints();
        if program.joint_count() != expected {
            return Err(SimulationError::JointMismatch {
                expected,
                actual: program.joint_count(),
            });
        }

        let budget = setup.time_budget_secs.max(0.0);
        let mut club = [0.0; 3];
        for (index, commands) in program.joints.iter().enumerate() {
            let weight = match setup.grip {
                ClubGrip::TwoHands => 1.0,
                ClubGrip::OneHand if index == self.secondary_joint => 0.0,
                ClubGrip::OneHand => self.one_hand_efficiency,
            };
            let impulse = Self::joint_impulse(commands, budget);
            for axis in 0..3 {
                club[axis] += impulse[axis] * weight;
            }
        }

        let ball = self.landing_point(club);
        let fitness = match setup.fitness_mode {
            FitnessMode::DriveDistance => drive_distance_fitness(ball, TEE, DRIVE_DIRECTION),
            FitnessMode::Accuracy => {
                accuracy_fitness(ball, [setup.hole_distance * DRIVE_DIRECTION[0], 0.0, 0.0])
            }
        };
        Ok(fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwingConfig;
    use crate::engines::generation::genome::Torque;

    fn program(joints: usize, command: ActuationCommand) -> ActuationProgram {
        ActuationProgram {
            joints: vec![vec![command]; joints],
        }
    }

    fn forward(mode: CommandMode, wait: f64) -> ActuationCommand {
        ActuationCommand {
            wait,
            torque: Torque::new(100.0, 0.0, 0.0),
            mode,
        }
    }

    #[test]
    fn test_rejects_wrong_joint_count() {
        let setup = SwingSetup::new(&SwingConfig::default(), 0.0, 0);
        let result = SurrogateHarness::default().run(&program(12, forward(CommandMode::Continuous, 0.0)), &setup);
        assert_eq!(
            result,
            Err(SimulationError::JointMismatch {
                expected: 8,
                actual: 12
            })
        );
    }

    #[test]
    fn test_forward_torque_drives_forward() {
        let setup = SwingSetup::new(&SwingConfig::default(), 0.0, 0);
        let fitness = SurrogateHarness::default()
            .run(&program(8, forward(CommandMode::Continuous, 0.0)), &setup)
            .unwrap();
        assert!(fitness > 0.0);
    }

    #[test]
    fn test_commands_after_budget_are_ignored() {
        let setup = SwingSetup::new(&SwingConfig::default(), 0.0, 0);
        let late = forward(CommandMode::Hold(1.0), setup.time_budget_secs + 1.0);
        let fitness = SurrogateHarness::default().run(&program(8, late), &setup).unwrap();
        assert_eq!(fitness, 0.0);
    }

    #[test]
    fn test_accuracy_is_distance_to_hole() {
        let mut swing = SwingConfig::default();
        swing.fitness_mode = FitnessMode::Accuracy;
        let setup = SwingSetup::new(&swing, 0.0, 0);
        let idle = forward(CommandMode::Impulse, setup.time_budget_secs + 1.0);
        let fitness = SurrogateHarness::default().run(&program(8, idle), &setup).unwrap();
        assert_eq!(fitness, -swing.hole_distance);
    }
}
