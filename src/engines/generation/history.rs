use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{best_index, mean};
use crate::error::SwingEvoError;
use serde::{Deserialize, Serialize};

/// Generation x agent fitness matrix, allocated up front and filled one row per generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    generations: usize,
    agents: usize,
    values: Vec<f64>,
    rows_written: usize,
}

impl FitnessHistory {
    pub fn new(generations: usize, agents: usize) -> Self {
        Self {
            generations,
            agents,
            values: vec![0.0; generations * agents],
            rows_written: 0,
        }
    }

    /// Writes row `generation`. Rows are written in order and never overwritten.
    pub fn record(&mut self, generation: usize, row: &[f64]) -> Result<(), SwingEvoError> {
        if generation != self.rows_written {
            return Err(SwingEvoError::State(format!(
                "expected fitness row {}, got {}",
                self.rows_written, generation
            )));
        }
        if generation >= self.generations {
            return Err(SwingEvoError::State(format!(
                "fitness history holds {} generations",
                self.generations
            )));
        }
        if row.len() != self.agents {
            return Err(SwingEvoError::State(format!(
                "fitness row has {} values, expected {}",
                row.len(),
                self.agents
            )));
        }

        let start = generation * self.agents;
        self.values[start..start + self.agents].copy_from_slice(row);
        self.rows_written += 1;
        Ok(())
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn agents(&self) -> usize {
        self.agents
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn is_complete(&self) -> bool {
        self.rows_written == self.generations
    }

    pub fn row(&self, generation: usize) -> Option<&[f64]> {
        if generation >= self.rows_written {
            return None;
        }
        let start = generation * self.agents;
        Some(&self.values[start..start + self.agents])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows_written).filter_map(move |g| self.row(g))
    }

    pub fn best_per_generation(&self) -> Vec<f64> {
        self.rows()
            .map(|row| best_index(row).map(|(_, f)| f).unwrap_or(f64::MIN))
            .collect()
    }

    pub fn mean_per_generation(&self) -> Vec<f64> {
        self.rows().map(mean).collect()
    }
}

/// Best individual seen so far in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestRecord<S> {
    pub genome: Genome<S>,
    pub fitness: f64,
    pub generation: usize,
    pub agent: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_written_in_order() {
        let mut history = FitnessHistory::new(2, 3);
        assert!(history.record(1, &[1.0, 2.0, 3.0]).is_err());
        history.record(0, &[1.0, 2.0, 3.0]).unwrap();
        assert!(history.record(0, &[4.0, 5.0, 6.0]).is_err());
        assert!(history.record(1, &[4.0, 5.0]).is_err());
        history.record(1, &[4.0, 5.0, 9.0]).unwrap();
        assert!(history.record(2, &[0.0, 0.0, 0.0]).is_err());

        assert!(history.is_complete());
        assert_eq!(history.row(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(history.best_per_generation(), vec![3.0, 9.0]);
        assert_eq!(history.mean_per_generation(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_unwritten_rows_are_hidden() {
        let history = FitnessHistory::new(4, 2);
        assert_eq!(history.row(0), None);
        assert_eq!(history.rows().count(), 0);
        assert!(!history.is_complete());
    }
}
