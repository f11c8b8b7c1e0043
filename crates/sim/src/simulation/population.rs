//! In-memory population and its generational loop.
//!
//! A [`Population`] owns its organisms, a goal, a generation counter and a
//! seeded random source. [`Population::generation_step`] runs one
//! generation through the hooks of its [`PopulationPolicy`].

use super::configs::PopulationLimits;
use super::policy::{default_policy, PopulationPolicy};
use super::report::GenerationReport;
use crate::base::Symbol;
use crate::errors::PopulationError;
use crate::evolution::behavior::{default_behavior, OrganismBehavior};
use crate::evolution::selection::sample_with_replacement;
use crate::genome::Organism;
use crate::storage::snapshot::{freeze_sample_size, read_snapshot, write_snapshot, FrozenPopulation};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How revived organisms join the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevivalMode {
    /// Discard the current organisms.
    #[default]
    Replace,
    /// Append to the current organisms.
    Add,
}

/// A population of organisms evolving toward a fitness goal.
#[derive(Debug, Clone)]
pub struct Population<S: Symbol = u8> {
    organisms: Vec<Organism<S>>,
    goal: f64,
    /// `None` runs without a generation limit.
    max_generations: Option<usize>,
    generation: usize,
    limits: PopulationLimits,
    rng: Xoshiro256PlusPlus,
    behavior: Arc<dyn OrganismBehavior<S>>,
    policy: Arc<dyn PopulationPolicy<S>>,
}

impl<S: Symbol> Population<S> {
    /// Create a population at generation 0 with an entropy-seeded RNG.
    ///
    /// The organisms keep their own behaviour until [`with_behavior`] is
    /// called.
    ///
    /// [`with_behavior`]: Population::with_behavior
    pub fn new(goal: f64, max_generations: Option<usize>, organisms: Vec<Organism<S>>) -> Self {
        Self {
            organisms,
            goal,
            max_generations,
            generation: 0,
            limits: PopulationLimits::default(),
            rng: Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
            behavior: default_behavior(),
            policy: default_policy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn PopulationPolicy<S>>) -> Self {
        self.policy = policy;
        self
    }

    /// Use `behavior` for every current organism and every organism created
    /// or revived later.
    pub fn with_behavior(mut self, behavior: Arc<dyn OrganismBehavior<S>>) -> Self {
        self.set_behavior(behavior);
        self
    }

    pub fn with_limits(mut self, limits: PopulationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn set_behavior(&mut self, behavior: Arc<dyn OrganismBehavior<S>>) {
        for organism in &mut self.organisms {
            organism.set_behavior(Arc::clone(&behavior));
        }
        self.behavior = behavior;
    }

    pub fn behavior(&self) -> &Arc<dyn OrganismBehavior<S>> {
        &self.behavior
    }

    pub fn policy(&self) -> &Arc<dyn PopulationPolicy<S>> {
        &self.policy
    }

    pub fn organisms(&self) -> &[Organism<S>] {
        &self.organisms
    }

    pub fn organisms_mut(&mut self) -> &mut Vec<Organism<S>> {
        &mut self.organisms
    }

    pub fn set_organisms(&mut self, organisms: Vec<Organism<S>>) {
        self.organisms = organisms;
    }

    pub fn add_organisms(&mut self, organisms: impl IntoIterator<Item = Organism<S>>) {
        self.organisms.extend(organisms);
    }

    pub fn size(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    pub fn max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn limits(&self) -> &PopulationLimits {
        &self.limits
    }

    pub fn rng_mut(&mut self) -> &mut Xoshiro256PlusPlus {
        &mut self.rng
    }

    /// Organisms and RNG borrowed together.
    pub fn organisms_and_rng(&mut self) -> (&[Organism<S>], &mut Xoshiro256PlusPlus) {
        (&self.organisms, &mut self.rng)
    }

    /// Fitness of every organism, in collection order.
    pub fn fitness_values(&self) -> Vec<f64> {
        self.organisms.par_iter().map(Organism::fitness).collect()
    }

    /// Mean-fitness report at the current generation.
    pub fn mean_fitness_report(&self) -> Result<GenerationReport, PopulationError> {
        GenerationReport::from_fitness(self.generation, &self.fitness_values(), self.goal)
    }

    /// Run one generation and return its report.
    ///
    /// Order: pre-population control (from generation 1 on), mating,
    /// post-population control, mutation of every organism, generation
    /// events, counter increment, report.
    pub fn generation_step(&mut self) -> Result<GenerationReport, PopulationError> {
        let policy = Arc::clone(&self.policy);

        if self.generation > 0 {
            policy.prepopulation_control(self)?;
        }
        policy.mating(self)?;
        policy.postpopulation_control(self)?;
        self.apply_mutation();
        policy.generation_events(self)?;
        self.generation += 1;

        policy.report(self)
    }

    /// Run `generations` steps and return the last report.
    pub fn run_for(&mut self, generations: usize) -> Result<Option<GenerationReport>, PopulationError> {
        let mut last = None;
        for _ in 0..generations {
            last = Some(self.generation_step()?);
        }
        Ok(last)
    }

    /// Whether the generation limit has been reached.
    pub fn budget_reached(&self) -> bool {
        self.max_generations
            .is_some_and(|max| self.generation >= max)
    }

    /// Whether `report` meets the goal.
    pub fn goal_reached(&self, report: &GenerationReport) -> bool {
        report.average_fitness >= self.goal
    }

    /// Whether the generation limit or the goal has been reached.
    pub fn is_finished(&self) -> Result<bool, PopulationError> {
        if self.budget_reached() {
            return Ok(true);
        }
        if self.organisms.is_empty() {
            return Ok(false);
        }
        let report = self.mean_fitness_report()?;
        Ok(self.goal_reached(&report))
    }

    /// Apply every organism's mutation scheme.
    ///
    /// Each organism gets its own RNG seeded from the population RNG, so the
    /// outcome does not depend on the number of threads.
    fn apply_mutation(&mut self) {
        let seeds: Vec<u64> = (0..self.organisms.len())
            .map(|_| self.rng.random())
            .collect();

        self.organisms
            .par_iter_mut()
            .zip(seeds.par_iter())
            .for_each(|(organism, &seed)| {
                let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                organism.mutation_scheme(&mut local_rng);
            });
    }

    /// Write a sample of the population to `<prefix><generation>_<n>.gap`.
    pub fn freeze(&mut self, prefix: &str, proportion: f64) -> Result<PathBuf, PopulationError> {
        let size = self.organisms.len();
        let sample = match freeze_sample_size(size, proportion, self.limits.full_freeze_below) {
            None => self.organisms.clone(),
            Some(count) => {
                let indices: Vec<usize> = (0..size).collect();
                sample_with_replacement(&indices, count, &mut self.rng)
                    .into_iter()
                    .map(|i| self.organisms[i].clone())
                    .collect()
            }
        };

        let frozen = FrozenPopulation::new(self.generation, self.goal, sample);
        Ok(write_snapshot(prefix, &frozen)?)
    }

    /// Restore a frozen sample and return the number of organisms revived.
    ///
    /// The collection is only changed once the whole artifact has been
    /// decoded. Revived organisms get the population's behaviour.
    pub fn revive(&mut self, path: impl AsRef<Path>, mode: RevivalMode) -> Result<usize, PopulationError> {
        let path = path.as_ref();
        let frozen = read_snapshot::<S>(path)?;

        let mut revived = frozen.organisms;
        for organism in &mut revived {
            organism.set_behavior(Arc::clone(&self.behavior));
        }
        let count = revived.len();

        match mode {
            RevivalMode::Replace => self.organisms = revived,
            RevivalMode::Add => self.organisms.extend(revived),
        }
        log::info!(
            "Revived {count} organisms from {} ({mode:?}), population now {}",
            path.display(),
            self.organisms.len()
        );
        Ok(count)
    }

    /// Serialized RNG state, for resuming a run exactly.
    pub fn rng_state_bytes(&self) -> Result<Vec<u8>, PopulationError> {
        bincode::serialize(&self.rng).map_err(|e| PopulationError::Encoding(e.to_string()))
    }

    pub fn set_rng_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PopulationError> {
        self.rng = bincode::deserialize(bytes)
            .map_err(|e| PopulationError::Encoding(format!("RNG state: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Chromosome;

    fn binary_population(n: usize, len: usize, goal: f64) -> Population {
        let organisms = (0..n)
            .map(|_| {
                let chr = Chromosome::new(vec![0u8; len], vec![1, 0], 0.0).unwrap();
                Organism::new(vec![chr]).unwrap()
            })
            .collect();
        Population::new(goal, None, organisms).with_seed(42)
    }

    #[test]
    fn test_population_new() {
        let pop = binary_population(4, 10, 0.5);
        assert_eq!(pop.size(), 4);
        assert_eq!(pop.generation(), 0);
        assert_eq!(pop.goal(), 0.5);
        assert_eq!(pop.max_generations(), None);
        assert!(!pop.is_empty());
    }

    #[test]
    fn test_generation_step_increments_once() {
        let mut pop = binary_population(4, 10, 0.5);
        let report = pop.generation_step().unwrap();

        assert_eq!(pop.generation(), 1);
        assert_eq!(report.generation, 1);
        // Mating doubles the population on the first step
        assert_eq!(pop.size(), 8);
        let expected = (report.average_fitness - 0.5) / 0.5 * 100.0;
        assert!((report.percent_to_goal - expected).abs() < 1e-9);
    }

    #[test]
    fn test_generation_step_zero_goal() {
        let mut pop = binary_population(4, 10, 0.0);
        let err = pop.generation_step().unwrap_err();
        assert!(matches!(err, PopulationError::InvalidGoal));
    }

    #[test]
    fn test_generation_step_empty_population() {
        let mut pop: Population = Population::new(1.0, None, Vec::new());
        let err = pop.generation_step().unwrap_err();
        assert!(matches!(err, PopulationError::EmptyPopulation));
    }

    #[test]
    fn test_same_seed_same_reports() {
        let mut a = binary_population(6, 20, 0.5);
        let mut b = binary_population(6, 20, 0.5);

        for _ in 0..5 {
            assert_eq!(a.generation_step().unwrap(), b.generation_step().unwrap());
        }
        assert_eq!(a.organisms()[0].chromosomes(), b.organisms()[0].chromosomes());
    }

    #[test]
    fn test_budget_reached() {
        let organisms = vec![Organism::<u8>::default()];
        let mut pop = Population::new(10.0, Some(2), organisms).with_seed(1);
        assert!(!pop.budget_reached());
        pop.run_for(2).unwrap();
        assert!(pop.budget_reached());
        assert!(pop.is_finished().unwrap());
    }

    #[test]
    fn test_goal_reached() {
        let chr = Chromosome::new(vec![1u8; 10], vec![1], 0.0).unwrap();
        let pop = Population::new(0.5, None, vec![Organism::new(vec![chr]).unwrap()]);
        assert!(pop.is_finished().unwrap());
    }

    #[test]
    fn test_rng_state_round_trip() {
        let mut pop = binary_population(2, 4, 1.0);
        let state = pop.rng_state_bytes().unwrap();
        let first: u64 = pop.rng_mut().random();

        pop.set_rng_from_bytes(&state).unwrap();
        let again: u64 = pop.rng_mut().random();
        assert_eq!(first, again);
    }

    #[test]
    fn test_set_behavior_reaches_organisms() {
        #[derive(Debug)]
        struct Constant;
        impl OrganismBehavior<u8> for Constant {
            fn fitness(&self, _organism: &Organism) -> f64 {
                7.0
            }
        }

        let pop = binary_population(3, 4, 1.0).with_behavior(Arc::new(Constant));
        assert_eq!(pop.fitness_values(), vec![7.0, 7.0, 7.0]);
        assert_eq!(pop.mean_fitness_report().unwrap().average_fitness, 7.0);
    }

    #[test]
    fn test_freeze_and_revive_modes() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("pop").to_string_lossy().to_string();

        let mut pop = binary_population(5, 4, 1.0);
        let path = pop.freeze(&prefix, 0.5).unwrap();
        assert!(path.ends_with("pop0_5.gap"));

        assert_eq!(pop.revive(&path, RevivalMode::Add).unwrap(), 5);
        assert_eq!(pop.size(), 10);
        assert_eq!(pop.revive(&path, RevivalMode::Replace).unwrap(), 5);
        assert_eq!(pop.size(), 5);
    }
}
