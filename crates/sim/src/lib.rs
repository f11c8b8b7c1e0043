//! # Simulation Crate
//!
//! The `sim` crate provides the kernel of the evolutionary simulation.
//! It includes modules for defining chromosomes and organisms, executing
//! evolutionary operators (mutation, recombination, selection), stepping a
//! population through generations, and freezing and reviving populations.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod simulation;
pub mod storage;
pub mod prelude;

pub use base::{Nucleotide, Sequence, Symbol};
