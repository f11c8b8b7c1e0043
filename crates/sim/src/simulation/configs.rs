//! Population configuration.
//!
//! [`PopulationConfig`] is the declarative description of a population that
//! can be stored as JSON and turned into a ready-to-run [`Population`] with
//! [`PopulationBuilder::from_config`].
//!
//! [`Population`]: crate::simulation::Population
//! [`PopulationBuilder::from_config`]: crate::simulation::PopulationBuilder::from_config

use crate::base::Symbol;
use crate::errors::BuilderError;
use crate::evolution::DefaultBehavior;
use crate::genome::DEFAULT_BACKGROUND_MUTATION;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Growth-control constants used by the built-in selection and freeze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationLimits {
    /// Survivors above this count are resampled down to it.
    pub survivor_cap: usize,
    /// Selection is only adopted with more survivors than this.
    pub extinction_floor: usize,
    /// Populations smaller than this are always frozen whole.
    pub full_freeze_below: usize,
}

impl Default for PopulationLimits {
    fn default() -> Self {
        Self {
            survivor_cap: 2000,
            extinction_floor: 20,
            full_freeze_below: 101,
        }
    }
}

/// How the founding chromosome is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InitialChromosome<S> {
    /// An explicit symbol sequence.
    Defined { sequence: Vec<S> },
    /// `length` copies of `symbol`.
    Uniform { length: usize, symbol: S },
    /// `length` symbols drawn from the alphabet with the population seed.
    Random { length: usize },
}

/// Declarative description of a population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "S: Symbol", deserialize = "S: Symbol"))]
pub struct PopulationConfig<S> {
    /// Alphabet of the founding chromosome; the symbol type's default when
    /// absent.
    #[serde(default)]
    pub alphabet: Option<Vec<S>>,
    pub chromosome: InitialChromosome<S>,
    /// Copies of the founding chromosome per organism.
    #[serde(default = "default_genome_size")]
    pub genome_size: usize,
    pub population_size: usize,
    pub goal: f64,
    /// `None` runs without a generation limit.
    #[serde(default)]
    pub max_generations: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_background_mutation")]
    pub background_mutation: f64,
    #[serde(default)]
    pub mutation: DefaultBehavior,
    #[serde(default)]
    pub limits: PopulationLimits,
}

fn default_genome_size() -> usize {
    1
}

fn default_background_mutation() -> f64 {
    DEFAULT_BACKGROUND_MUTATION
}

/// Symbols 1-4, a defined chromosome of 200 ones, 200 organisms, goal 4.
impl Default for PopulationConfig<u8> {
    fn default() -> Self {
        Self {
            alphabet: Some(vec![1, 2, 3, 4]),
            chromosome: InitialChromosome::Defined {
                sequence: vec![1; 200],
            },
            genome_size: 1,
            population_size: 200,
            goal: 4.0,
            max_generations: None,
            seed: None,
            background_mutation: DEFAULT_BACKGROUND_MUTATION,
            mutation: DefaultBehavior::default(),
            limits: PopulationLimits::default(),
        }
    }
}

impl<S: Symbol> PopulationConfig<S> {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), BuilderError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
