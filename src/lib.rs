//! Evolutionary search for golf swing control policies.
//!
//! A run evolves a population of [`Genome`](engines::generation::Genome)s,
//! scoring each against an external
//! [`SimulationHarness`](engines::evaluation::SimulationHarness) and breeding
//! the next generation with elitism, binary tournaments, single-point
//! crossover and single-joint mutation.

pub mod config;
pub mod engines;
pub mod error;

pub use error::{Result, SimulationError, SwingEvoError};
