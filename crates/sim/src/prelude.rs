//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use chromevo_sim::prelude::*;
//!
//! let mut chromosome = Chromosome::new(vec![0u8; 8], vec![1, 0], 0.0).unwrap();
//! chromosome
//!     .kmutate(&KnownMutation::Point { position: 3, symbol: 1 })
//!     .unwrap();
//! assert_eq!(chromosome.to_string(), "00010000");
//! ```

pub use crate::base::{Alphabet, Nucleotide, Sequence, Symbol};
pub use crate::errors;
pub use crate::evolution::{
    crossover, DefaultBehavior, KnownMutation, MutationKind, OrganismBehavior, Region,
};
pub use crate::genome::{Chromosome, DeathCause, Organism, Status, StatusUpdate, StatusValue};
pub use crate::simulation::{
    GenerationReport, Population, PopulationBuilder, PopulationConfig, PopulationPolicy,
    RevivalMode, RunConfig, Runner,
};
pub use crate::storage::{DurablePopulation, FrozenPopulation};
