//! Evolution module providing mutation, recombination, and selection.
//!
//! This module implements the core evolutionary processes:
//! - **Mutation**: random and directed edits of chromosome sequences
//! - **Recombination**: single-point crossover
//! - **Selection**: truncation against the mean fitness
//! - **Behavior**: pluggable per-organism fitness and mutation scheme

pub mod behavior;
pub mod mutation;
pub mod recombination;
pub mod selection;

pub use behavior::{DefaultBehavior, OrganismBehavior};
pub use mutation::{KnownMutation, MutationKind, Region};
pub use recombination::crossover;
pub use selection::Selection;
