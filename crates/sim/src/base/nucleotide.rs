use core::fmt;

use super::Symbol;
use crate::errors::InvalidNucleotide;
use serde::{Deserialize, Serialize};

/// A DNA nucleotide base.
///
/// The mapping of variants to integers is stable (A=0, C=1, G=2, T=3) and is
/// also the value each base contributes to the default fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    #[default]
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Nucleotide {
    /// All four bases in index order.
    pub const ALL: [Nucleotide; 4] = [Self::A, Self::C, Self::G, Self::T];

    const LETTERS: [u8; 4] = *b"ACGT";

    /// Base with the given index, `None` above 3.
    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(usize::from(idx)).copied()
    }

    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Parse a base letter, case-insensitively.
    pub fn from_ascii(byte: u8) -> Option<Self> {
        let upper = byte.to_ascii_uppercase();
        Self::LETTERS
            .iter()
            .position(|&letter| letter == upper)
            .map(|i| Self::ALL[i])
    }

    pub const fn to_char(self) -> char {
        Self::LETTERS[self as usize] as char
    }
}

impl TryFrom<u8> for Nucleotide {
    type Error = InvalidNucleotide;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_ascii(byte).ok_or(InvalidNucleotide(byte))
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Symbol for Nucleotide {
    fn value(&self) -> f64 {
        f64::from(self.to_index())
    }

    fn default_alphabet() -> Vec<Self> {
        Self::ALL.to_vec()
    }

    fn filler() -> Self {
        Self::A
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nucleotide_from_index() {
        assert_eq!(Nucleotide::from_index(0), Some(Nucleotide::A));
        assert_eq!(Nucleotide::from_index(3), Some(Nucleotide::T));
        assert_eq!(Nucleotide::from_index(4), None);
    }

    #[test]
    fn test_nucleotide_try_from_u8() {
        assert_eq!(Nucleotide::try_from(b'A'), Ok(Nucleotide::A));
        assert_eq!(Nucleotide::try_from(b'g'), Ok(Nucleotide::G));

        let err = Nucleotide::try_from(b'X').unwrap_err();
        assert_eq!(err.0, b'X');
    }

    #[test]
    fn test_nucleotide_symbol_values() {
        let values: Vec<f64> = Nucleotide::ALL.iter().map(Symbol::value).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(Nucleotide::default_alphabet().len(), 4);
        assert_eq!(Nucleotide::filler(), Nucleotide::A);
    }

    #[test]
    fn test_nucleotide_letters_round_trip_index() {
        let text: String = Nucleotide::ALL.iter().map(|n| n.to_char()).collect();
        assert_eq!(text, "ACGT");
        assert_eq!(Nucleotide::C.to_string(), "C");
        assert_eq!(Nucleotide::from_ascii(b't').map(Nucleotide::to_index), Some(3));
    }
}
