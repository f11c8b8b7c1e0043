//! Population hooks called by [`Population::generation_step`].
//!
//! A [`PopulationPolicy`] supplies the five per-generation hooks. Each has a
//! working default, so a policy only overrides what it changes; the order in
//! which hooks run is fixed by the population.

use super::population::Population;
use super::report::GenerationReport;
use crate::base::Symbol;
use crate::errors::{OrganismError, PopulationError};
use crate::evolution::selection::truncate_above_mean;
use crate::evolution::{crossover, Selection};
use crate::genome::Organism;
use rand::Rng;
use std::fmt::Debug;
use std::sync::Arc;

/// Per-generation hooks of a population.
pub trait PopulationPolicy<S: Symbol>: Send + Sync + Debug {
    /// Selection before mating, skipped on generation 0. Defaults to
    /// [`truncation_selection`].
    fn prepopulation_control(&self, population: &mut Population<S>) -> Result<(), PopulationError> {
        truncation_selection(population);
        Ok(())
    }

    /// Defaults to [`random_crossover_mating`].
    fn mating(&self, population: &mut Population<S>) -> Result<(), PopulationError> {
        random_crossover_mating(population)?;
        Ok(())
    }

    fn postpopulation_control(
        &self,
        _population: &mut Population<S>,
    ) -> Result<(), PopulationError> {
        Ok(())
    }

    fn generation_events(&self, _population: &mut Population<S>) -> Result<(), PopulationError> {
        Ok(())
    }

    /// Defaults to the mean-fitness report.
    fn report(&self, population: &Population<S>) -> Result<GenerationReport, PopulationError> {
        population.mean_fitness_report()
    }
}

/// All hooks at their defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPolicy;

impl<S: Symbol> PopulationPolicy<S> for DefaultPolicy {}

/// Shared handle to [`DefaultPolicy`].
pub fn default_policy<S: Symbol>() -> Arc<dyn PopulationPolicy<S>> {
    Arc::new(DefaultPolicy)
}

/// Keep organisms strictly above the mean fitness, subject to the
/// population's limits.
pub fn truncation_selection<S: Symbol>(population: &mut Population<S>) -> Selection {
    let fitness = population.fitness_values();
    let limits = *population.limits();
    let selection = truncate_above_mean(
        &fitness,
        limits.survivor_cap,
        limits.extinction_floor,
        population.rng_mut(),
    );

    match &selection {
        Selection::Adopt(indices) => {
            let organisms = population.organisms();
            let survivors = indices.iter().map(|&i| organisms[i].clone()).collect();
            population.set_organisms(survivors);
        }
        Selection::KeepPrevious { survivors } => {
            log::debug!(
                "Generation {}: only {survivors} above the mean, keeping previous {} organisms",
                population.generation(),
                population.size()
            );
        }
    }
    selection
}

/// One crossover round per organism.
///
/// Each round draws two parents with replacement and produces one child with
/// [`crossover_offspring`]. Offspring are appended after all rounds. Returns
/// the number of offspring.
pub fn random_crossover_mating<S: Symbol>(
    population: &mut Population<S>,
) -> Result<usize, PopulationError> {
    let rounds = population.size();
    if rounds == 0 {
        log::debug!("No organisms to mate");
        return Ok(0);
    }

    let behavior = Arc::clone(population.behavior());
    let (organisms, rng) = population.organisms_and_rng();
    let mut offspring = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let parent1 = &organisms[rng.random_range(0..rounds)];
        let parent2 = &organisms[rng.random_range(0..rounds)];
        let child = crossover_offspring(parent1, parent2, rng)?;
        offspring.push(child.with_behavior(Arc::clone(&behavior)));
    }

    let count = offspring.len();
    population.add_organisms(offspring);
    Ok(count)
}

/// Cross the first chromosomes of two parents at a uniform cut in
/// `0..=len` of the first parent's.
///
/// The child's genome is the first product alone, with a fresh status; the
/// parents' other chromosomes are not inherited.
pub fn crossover_offspring<S: Symbol, R: Rng + ?Sized>(
    parent1: &Organism<S>,
    parent2: &Organism<S>,
    rng: &mut R,
) -> Result<Organism<S>, OrganismError> {
    let cut = rng.random_range(0..=parent1.first_chromosome().len());
    let (head, _) = crossover(parent1.first_chromosome(), parent2.first_chromosome(), cut);
    Organism::new(vec![head])
}
