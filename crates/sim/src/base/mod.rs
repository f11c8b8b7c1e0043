//! Base types for sequence representation.
//!
//! This module provides the symbol abstraction, the nucleotide alphabet,
//! and the raw sequence storage used by chromosomes.

mod alphabet;
mod nucleotide;
mod sequence;
mod symbol;

pub use alphabet::Alphabet;
pub use nucleotide::Nucleotide;
pub use sequence::Sequence;
pub use symbol::Symbol;
