use rand::RngCore;

use super::chromosome::cross_over;
use super::error::EngineError;
use super::population::Population;
use super::selection::ParentSelector;

pub(crate) fn check_mutation(mutation_rate: f64, mutation_amplitude: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&mutation_rate) {
        return Err(EngineError::InvalidSettings(format!("mutation rate {mutation_rate} is outside [0, 1]")));
    }
    // the delta range spans 2 * amplitude, which must stay finite too
    if !(2. * mutation_amplitude).is_finite() || mutation_amplitude < 0. {
        return Err(EngineError::InvalidSettings(format!("mutation amplitude {mutation_amplitude} must be finite and non-negative")));
    }
    Ok(())
}

/// Builds a same-sized population of children. Each child crosses two independently
/// selected parents gene by gene, then every gene may be nudged by mutation.
/// Children start with zero fitness.
pub fn reproduce<R: RngCore, S: ParentSelector>(
    rng: &mut R,
    population: &Population,
    selector: &S,
    mutation_rate: f64,
    mutation_amplitude: f64,
) -> Result<Population, EngineError> {
    check_mutation(mutation_rate, mutation_amplitude)?;

    let mut children = Vec::with_capacity(population.len());
    for _ in 0..population.len() {
        let parent_1 = selector.select_parent(rng, population)?;
        let parent_2 = selector.select_parent(rng, population)?;
        let mut child = cross_over(rng, &population[parent_1], &population[parent_2]);
        child.mutate(rng, mutation_rate, mutation_amplitude)?;
        children.push(child);
    }
    Ok(Population::new(children))
}
