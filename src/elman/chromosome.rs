use rand::RngCore;
use rand_distr::{Distribution, Uniform};

use super::error::EngineError;
use super::reproduction::check_mutation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChromosomeIndex(pub usize);

/// One candidate network: a flat gene vector plus the fitness it last scored.
#[derive(Clone, Debug, PartialEq)]
pub struct Chromosome {
    pub genes: Vec<f64>,
    pub(crate) fitness: f64,
}

impl Chromosome {
    pub fn create(genes: Vec<f64>) -> Chromosome {
        Chromosome { genes, fitness: 0. }
    }

    /// Genes drawn independently from [-1, 1].
    pub fn init<R: RngCore>(rng: &mut R, n_genes: usize) -> Chromosome {
        let between = Uniform::new_inclusive(-1.0, 1.0);
        let genes = (0..n_genes).map(|_| between.sample(rng)).collect();
        Chromosome::create(genes)
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Each gene independently, with probability `rate`, gets a delta from [-amplitude, amplitude].
    pub fn mutate<R: RngCore>(&mut self, rng: &mut R, rate: f64, amplitude: f64) -> Result<(), EngineError> {
        check_mutation(rate, amplitude)?;
        let between = Uniform::from(0.0..1.0);
        let delta = Uniform::new_inclusive(-amplitude, amplitude);
        for gene in self.genes.iter_mut() {
            if between.sample(rng) < rate {
                *gene += delta.sample(rng);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
impl Chromosome {
    pub(crate) fn scored(genes: Vec<f64>, fitness: f64) -> Chromosome {
        Chromosome { genes, fitness }
    }
}

/// Uniform crossover: every gene comes from either parent with equal probability.
pub fn cross_over<R: RngCore>(rng: &mut R, parent_1: &Chromosome, parent_2: &Chromosome) -> Chromosome {
    debug_assert!(parent_1.len() == parent_2.len(), "Chromosomes with mismatching gene counts cannot be crossed");
    let between = Uniform::from(0.0..1.0);
    let genes = parent_1
        .genes
        .iter()
        .zip(&parent_2.genes)
        .map(|(&left, &right)| if between.sample(rng) < 0.5 { left } else { right })
        .collect();
    Chromosome::create(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn init_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let chromosome = Chromosome::init(&mut rng, 120);
        assert_eq!(chromosome.len(), 120);
        assert_eq!(chromosome.fitness(), 0.);
        assert!(chromosome.genes.iter().all(|g| (-1.0..=1.0).contains(g)));
        assert!(chromosome.genes.iter().any(|&g| g < 0.) && chromosome.genes.iter().any(|&g| g > 0.));
    }

    #[test]
    fn cross_over_takes_each_gene_from_a_parent() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let left = Chromosome::create(vec![1.; 200]);
        let right = Chromosome::create(vec![2.; 200]);
        let child = cross_over(&mut rng, &left, &right);

        assert_eq!(child.len(), 200);
        assert_eq!(child.fitness(), 0.);
        let from_left = child.genes.iter().filter(|&&g| g == 1.).count();
        let from_right = child.genes.iter().filter(|&&g| g == 2.).count();
        assert_eq!(from_left + from_right, 200);
        assert!(from_left > 50 && from_right > 50);
    }

    #[test]
    fn mutate_respects_amplitude() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let mut chromosome = Chromosome::create(vec![0.5; 1000]);
        chromosome.mutate(&mut rng, 0.05, 0.1).unwrap();

        let changed = chromosome.genes.iter().filter(|&&g| g != 0.5).count();
        assert!(changed > 10 && changed < 120, "changed {changed}");
        assert!(chromosome.genes.iter().all(|&g| (g - 0.5).abs() <= 0.1 + 1e-12));
    }

    #[test]
    fn zero_rate_is_identity() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let original = Chromosome::init(&mut rng, 50);
        let mut chromosome = original.clone();
        chromosome.mutate(&mut rng, 0., 0.1).unwrap();
        assert_eq!(chromosome, original);
    }

    #[test]
    fn invalid_mutation_is_rejected_without_change() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let original = Chromosome::init(&mut rng, 50);
        let mut chromosome = original.clone();
        for (rate, amplitude) in [(0.05, -0.1), (0.05, 1e308), (0.05, f64::NAN), (1.5, 0.1)] {
            let res = chromosome.mutate(&mut rng, rate, amplitude);
            assert!(matches!(res, Err(EngineError::InvalidSettings(_))), "rate {rate}, amplitude {amplitude}");
        }
        assert_eq!(chromosome, original);
    }
}
