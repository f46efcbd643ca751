use crate::config::{GenomeConfig, RunConfig};
use crate::engines::generation::genome::{ActuationStep, Genome};
use crate::engines::generation::operators::{elite_indices, tournament_selection};
use crate::error::SwingEvoError;
use rand::Rng;

/// Where a genome of the next generation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Copied unchanged from this index of the previous population.
    Elite { source: usize },
    /// Child of a crossover between the two tournament winners.
    Crossover { parents: (usize, usize) },
    /// Tournament winner passed through without crossover.
    Selected { parent: usize },
}

#[derive(Debug, Clone)]
pub struct Offspring<S> {
    pub genome: Genome<S>,
    pub origin: Origin,
    /// Joint touched by mutation, if the genome was mutated.
    pub mutated_joint: Option<usize>,
}

/// Builds generation g+1 from generation g: elitism, binary tournaments,
/// single-point crossover, then single-joint mutation of non-elite slots.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    elitism_count: usize,
    crossover_rate: f64,
    mutation_rate: f64,
    bounds: GenomeConfig,
}

impl PopulationEvolver {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            elitism_count: config.evolution.elitism_count,
            crossover_rate: config.evolution.crossover_rate,
            mutation_rate: config.evolution.mutation_rate,
            bounds: config.genome.clone(),
        }
    }

    pub fn next_generation<S: ActuationStep, R: Rng>(
        &self,
        population: &[Genome<S>],
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<Vec<Genome<S>>, SwingEvoError> {
        Ok(self
            .breed(population, fitness, rng)?
            .into_iter()
            .map(|offspring| offspring.genome)
            .collect())
    }

    /// Same as [`next_generation`](Self::next_generation) but keeps each slot's lineage.
    pub fn breed<S: ActuationStep, R: Rng>(
        &self,
        population: &[Genome<S>],
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<Vec<Offspring<S>>, SwingEvoError> {
        let n = population.len();
        if fitness.len() != n {
            return Err(SwingEvoError::State(format!(
                "{} genomes but {} fitness values",
                n,
                fitness.len()
            )));
        }
        if n < 2 {
            return Err(SwingEvoError::State(format!(
                "tournament selection needs at least 2 genomes, got {}",
                n
            )));
        }

        let elites = elite_indices(fitness, self.elitism_count.min(n));
        let mut next: Vec<Offspring<S>> = Vec::with_capacity(n);

        for &source in &elites {
            next.push(Offspring {
                genome: population[source].clone(),
                origin: Origin::Elite { source },
                mutated_joint: None,
            });
        }

        while next.len() < n {
            let parent1 = tournament_selection(fitness, rng);
            let parent2 = tournament_selection(fitness, rng);

            let (child1, child2, origins) = if rng.gen::<f64>() < self.crossover_rate {
                let (a, b) = population[parent1].crossover(&population[parent2], rng);
                let origin = Origin::Crossover {
                    parents: (parent1, parent2),
                };
                (a, b, (origin, origin))
            } else {
                (
                    population[parent1].clone(),
                    population[parent2].clone(),
                    (
                        Origin::Selected { parent: parent1 },
                        Origin::Selected { parent: parent2 },
                    ),
                )
            };

            next.push(Offspring {
                genome: child1,
                origin: origins.0,
                mutated_joint: None,
            });
            // An odd number of free slots leaves room for the first child only.
            if next.len() < n {
                next.push(Offspring {
                    genome: child2,
                    origin: origins.1,
                    mutated_joint: None,
                });
            }
        }

        for offspring in next.iter_mut().skip(elites.len()) {
            if rng.gen::<f64>() < self.mutation_rate {
                offspring.mutated_joint = offspring.genome.mutate(&self.bounds, rng);
            }
        }

        Ok(next)
    }
}
