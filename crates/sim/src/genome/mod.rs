//! Genome structures: chromosomes, organisms and their status records.

mod chromosome;
mod organism;
pub mod status;

pub use chromosome::{Chromosome, DEFAULT_BACKGROUND_MUTATION, DEFAULT_CHROMOSOME_LENGTH};
pub use organism::Organism;
pub use status::{DeathCause, Status, StatusUpdate, StatusValue};
