use rand::{Rng, RngCore};

use super::chromosome::ChromosomeIndex;
use super::error::EngineError;
use super::population::Population;

pub trait ParentSelector {
    fn select_parent<R: RngCore>(&self, rng: &mut R, population: &Population) -> Result<ChromosomeIndex, EngineError>;
}

/// Draws `size` chromosomes with replacement and keeps the fittest.
/// Only a strictly higher fitness displaces an earlier draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tournament {
    pub size: usize,
}

impl Default for Tournament {
    fn default() -> Self {
        Tournament { size: 2 }
    }
}

impl ParentSelector for Tournament {
    fn select_parent<R: RngCore>(&self, rng: &mut R, population: &Population) -> Result<ChromosomeIndex, EngineError> {
        if population.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        debug_assert!(self.size > 0, "Tournament needs at least one contestant");

        let n = population.len();
        let mut winner = ChromosomeIndex(rng.gen_range(0..n));
        for _ in 1..self.size {
            let challenger = ChromosomeIndex(rng.gen_range(0..n));
            if population[challenger].fitness() > population[winner].fitness() {
                winner = challenger;
            }
        }
        Ok(winner)
    }
}
