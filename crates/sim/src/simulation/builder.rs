//! Builder for creating populations.
//!
//! Provides a fluent API for configuring a [`Population`] with sensible
//! defaults and validation, either from scratch or from a
//! [`PopulationConfig`].

use super::configs::{InitialChromosome, PopulationConfig, PopulationLimits};
use super::policy::PopulationPolicy;
use super::population::Population;
use crate::base::{Alphabet, Sequence, Symbol};
pub use crate::errors::BuilderError;
use crate::errors::MutationError;
use crate::evolution::{DefaultBehavior, OrganismBehavior};
use crate::genome::{Chromosome, Organism, DEFAULT_BACKGROUND_MUTATION};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::Arc;

/// Builder for constructing [`Population`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use chromevo_sim::simulation::{InitialChromosome, PopulationBuilder};
///
/// let mut population = PopulationBuilder::<u8>::new()
///     .alphabet(vec![1, 0])
///     .chromosome(InitialChromosome::Uniform { length: 10, symbol: 0 })
///     .population_size(4)
///     .goal(0.5)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let report = population.generation_step().unwrap();
/// assert_eq!(report.generation, 1);
/// ```
#[derive(Clone)]
pub struct PopulationBuilder<S: Symbol = u8> {
    // Required parameters
    chromosome: Option<InitialChromosome<S>>,
    population_size: Option<usize>,
    goal: Option<f64>,

    alphabet: Option<Vec<S>>,
    genome_size: usize, // Default: 1
    max_generations: Option<usize>,
    seed: Option<u64>,
    background_mutation: f64,
    mutation: DefaultBehavior,
    limits: PopulationLimits,

    behavior: Option<Arc<dyn OrganismBehavior<S>>>,
    policy: Option<Arc<dyn PopulationPolicy<S>>>,
}

impl<S: Symbol> Default for PopulationBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> PopulationBuilder<S> {
    pub fn new() -> Self {
        Self {
            chromosome: None,
            population_size: None,
            goal: None,
            alphabet: None,
            genome_size: 1,
            max_generations: None,
            seed: None,
            background_mutation: DEFAULT_BACKGROUND_MUTATION,
            mutation: DefaultBehavior::default(),
            limits: PopulationLimits::default(),
            behavior: None,
            policy: None,
        }
    }

    /// Start from a declarative configuration.
    pub fn from_config(config: PopulationConfig<S>) -> Self {
        Self {
            chromosome: Some(config.chromosome),
            population_size: Some(config.population_size),
            goal: Some(config.goal),
            alphabet: config.alphabet,
            genome_size: config.genome_size,
            max_generations: config.max_generations,
            seed: config.seed,
            background_mutation: config.background_mutation,
            mutation: config.mutation,
            limits: config.limits,
            behavior: None,
            policy: None,
        }
    }

    pub fn chromosome(mut self, chromosome: InitialChromosome<S>) -> Self {
        self.chromosome = Some(chromosome);
        self
    }

    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    pub fn goal(mut self, goal: f64) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn alphabet(mut self, alphabet: Vec<S>) -> Self {
        self.alphabet = Some(alphabet);
        self
    }

    /// Chromosomes per organism.
    pub fn genome_size(mut self, genome_size: usize) -> Self {
        self.genome_size = genome_size;
        self
    }

    pub fn max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = Some(max_generations);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn background_mutation(mut self, rate: f64) -> Self {
        self.background_mutation = rate;
        self
    }

    /// Kind and rate used by the built-in behaviour.
    pub fn mutation(mut self, mutation: DefaultBehavior) -> Self {
        self.mutation = mutation;
        self
    }

    pub fn limits(mut self, limits: PopulationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the built-in behaviour. The configured mutation defaults are
    /// then unused.
    pub fn behavior(mut self, behavior: Arc<dyn OrganismBehavior<S>>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn policy(mut self, policy: Arc<dyn PopulationPolicy<S>>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Validate the parameters and build the population.
    pub fn build(self) -> Result<Population<S>, BuilderError> {
        let chromosome = self
            .chromosome
            .ok_or(BuilderError::MissingRequired("chromosome"))?;
        let population_size = self
            .population_size
            .ok_or(BuilderError::MissingRequired("population_size"))?;
        let goal = self.goal.ok_or(BuilderError::MissingRequired("goal"))?;

        if population_size == 0 {
            return Err(BuilderError::InvalidParameter(
                "population_size must be at least 1".into(),
            ));
        }
        if self.genome_size == 0 {
            return Err(BuilderError::InvalidParameter(
                "genome_size must be at least 1".into(),
            ));
        }
        if goal == 0.0 || !goal.is_finite() {
            return Err(BuilderError::InvalidParameter(format!(
                "goal must be finite and non-zero, got {goal}"
            )));
        }
        if !self.mutation.rate.is_finite() || self.mutation.rate < 0.0 {
            return Err(MutationError::InvalidRate(self.mutation.rate).into());
        }

        let alphabet = Alphabet::new(self.alphabet.unwrap_or_else(S::default_alphabet))?;
        let mut rng = match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };

        let behavior: Arc<dyn OrganismBehavior<S>> = match self.behavior {
            Some(behavior) => behavior,
            None => Arc::new(self.mutation),
        };

        let mut organisms = Vec::with_capacity(population_size);
        for _ in 0..population_size {
            let genome = (0..self.genome_size)
                .map(|_| {
                    let sequence = founding_sequence(&chromosome, &alphabet, &mut rng);
                    Chromosome::from_parts(sequence, alphabet.clone(), self.background_mutation)
                })
                .collect::<Result<Vec<_>, _>>()?;
            organisms.push(Organism::new(genome)?);
        }

        log::debug!(
            "Built population of {population_size} organisms with {} chromosome(s) each",
            self.genome_size
        );

        let mut population = Population::new(goal, self.max_generations, organisms)
            .with_seed(rng.random())
            .with_limits(self.limits)
            .with_behavior(behavior);
        if let Some(policy) = self.policy {
            population = population.with_policy(policy);
        }
        Ok(population)
    }
}

fn founding_sequence<S: Symbol, R: Rng + ?Sized>(
    chromosome: &InitialChromosome<S>,
    alphabet: &Alphabet<S>,
    rng: &mut R,
) -> Sequence<S> {
    match chromosome {
        InitialChromosome::Defined { sequence } => Sequence::from(sequence.clone()),
        InitialChromosome::Uniform { length, symbol } => Sequence::filled(*symbol, *length),
        InitialChromosome::Random { length } => (0..*length).map(|_| alphabet.choose(&mut *rng)).collect(),
    }
}
