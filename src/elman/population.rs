use std::ops::{Index, IndexMut};

use itertools::Itertools;
use log::{debug, trace};
use rand::RngCore;

use super::chromosome::{Chromosome, ChromosomeIndex};
use super::error::EngineError;
use super::fitness::Evaluator;
use super::network::RecurrentCell;
use super::shape::NetworkShape;

/// One generation of chromosomes. Order only matters for reproducible iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct Population(Vec<Chromosome>);

impl Population {
    pub fn new(data: Vec<Chromosome>) -> Population {
        debug_assert!(data.iter().map(|c| c.len()).all_equal(), "Chromosomes in a population must have the same gene count");
        Population(data)
    }

    pub fn init<R: RngCore>(rng: &mut R, population_size: usize, shape: &NetworkShape) -> Population {
        debug!("initializing population of {} with {} genes each", population_size, shape.parameter_count());
        let chromosomes = (0..population_size)
            .map(|_| Chromosome::init(rng, shape.parameter_count()))
            .collect_vec();
        Population::new(chromosomes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Chromosome> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<Chromosome> {
        self.0.iter_mut()
    }

    /// Gene count shared by every chromosome, `None` when empty.
    pub fn gene_count(&self) -> Option<usize> {
        self.0.first().map(|c| c.len())
    }

    /// Scores every chromosome in order on the same cell.
    pub fn evaluate<E: Evaluator>(&mut self, evaluator: &E, cell: &mut RecurrentCell) -> Result<(), EngineError> {
        for (i, chromosome) in self.0.iter_mut().enumerate() {
            evaluator.evaluate(chromosome, cell)?;
            trace!("chromosome {}: fitness {:.6}", i, chromosome.fitness());
        }
        Ok(())
    }

    /// First chromosome with the strictly highest fitness.
    pub fn best(&self) -> Result<(ChromosomeIndex, f64), EngineError> {
        let first = self.0.first().ok_or(EngineError::EmptyPopulation)?;
        let best = self.0.iter().enumerate().skip(1).fold((0, first.fitness()), |(best, best_fitness), (i, c)| {
            if c.fitness() > best_fitness {
                (i, c.fitness())
            } else {
                (best, best_fitness)
            }
        });
        Ok((ChromosomeIndex(best.0), best.1))
    }

    pub fn mean_fitness(&self) -> Result<f64, EngineError> {
        if self.0.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        Ok(self.0.iter().map(|c| c.fitness()).sum::<f64>() / self.0.len() as f64)
    }
}

impl Index<ChromosomeIndex> for Population {
    type Output = Chromosome;
    fn index(&self, index: ChromosomeIndex) -> &Self::Output {
        &self.0[index.0]
    }
}

impl IndexMut<ChromosomeIndex> for Population {
    fn index_mut(&mut self, index: ChromosomeIndex) -> &mut Self::Output {
        &mut self.0[index.0]
    }
}

impl FromIterator<Chromosome> for Population {
    fn from_iter<I: IntoIterator<Item = Chromosome>>(iter: I) -> Self {
        Population::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn with_fitness(values: &[f64]) -> Population {
        values.iter().map(|&f| Chromosome::scored(vec![f], f)).collect()
    }

    #[test]
    fn test_init() {
        let shape = NetworkShape::new(3, 8, 3).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let population = Population::init(&mut rng, 50, &shape);
        assert_eq!(population.len(), 50);
        assert_eq!(population.gene_count(), Some(120));
        assert!(population.iter().all(|c| c.len() == 120 && c.fitness() == 0.));
        assert_ne!(population[ChromosomeIndex(0)], population[ChromosomeIndex(1)]);
    }

    #[test]
    fn same_seed_same_population() {
        let shape = NetworkShape::standard();
        let a = Population::init(&mut Xoshiro256PlusPlus::seed_from_u64(9), 10, &shape);
        let b = Population::init(&mut Xoshiro256PlusPlus::seed_from_u64(9), 10, &shape);
        assert_eq!(a, b);
    }

    #[test]
    fn best_keeps_first_of_equals() {
        let population = with_fitness(&[0.2, 0.7, 0.1, 0.7]);
        assert_eq!(population.best().unwrap(), (ChromosomeIndex(1), 0.7));
        assert!((population.mean_fitness().unwrap() - 0.425).abs() < 1e-12);
    }

    #[test]
    fn empty_population() {
        let population = Population::new(Vec::new());
        assert_eq!(population.best(), Err(EngineError::EmptyPopulation));
        assert_eq!(population.mean_fitness(), Err(EngineError::EmptyPopulation));
        assert_eq!(population.gene_count(), None);
    }
}
