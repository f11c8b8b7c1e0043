use crate::base::{Alphabet, Sequence, Symbol};
use crate::errors::{ChromosomeError, MutationError};
use crate::evolution::mutation::{self, KnownMutation, MutationKind, Region};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the default chromosome.
pub const DEFAULT_CHROMOSOME_LENGTH: usize = 1000;

/// Background mutation rate of the default chromosome.
pub const DEFAULT_BACKGROUND_MUTATION: f64 = 0.0001;

/// A chromosome: a mutable sequence of symbols together with the alphabet
/// new symbols are drawn from and a background mutation rate.
///
/// The background rate is added to every requested rate in [`rmutate`].
/// Sequence symbols are not required to belong to the alphabet.
///
/// # Examples
///
/// ```rust
/// # use chromevo_sim::genome::Chromosome;
/// let chr = Chromosome::new(vec![0u8, 1, 1, 0], vec![1, 0], 0.0).unwrap();
/// assert_eq!(chr.len(), 4);
/// assert_eq!(chr.to_string(), "0110");
/// ```
///
/// [`rmutate`]: Chromosome::rmutate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "S: Symbol", deserialize = "S: Symbol"))]
pub struct Chromosome<S = u8> {
    sequence: Sequence<S>,
    alphabet: Alphabet<S>,
    background_mutation: f64,
}

impl<S: Symbol> Chromosome<S> {
    /// Create a chromosome.
    ///
    /// Fails with `EmptyAlphabet` for an empty alphabet and with
    /// `InvalidBackgroundRate` for a rate outside [0, 1].
    pub fn new(
        sequence: impl Into<Sequence<S>>,
        alphabet: Vec<S>,
        background_mutation: f64,
    ) -> Result<Self, ChromosomeError> {
        let alphabet = Alphabet::new(alphabet)?;
        Self::from_parts(sequence.into(), alphabet, background_mutation)
    }

    /// Create a chromosome from an already validated alphabet.
    pub fn from_parts(
        sequence: Sequence<S>,
        alphabet: Alphabet<S>,
        background_mutation: f64,
    ) -> Result<Self, ChromosomeError> {
        if !(0.0..=1.0).contains(&background_mutation) {
            return Err(ChromosomeError::InvalidBackgroundRate(background_mutation));
        }
        Ok(Self {
            sequence,
            alphabet,
            background_mutation,
        })
    }

    /// A one-symbol chromosome for organisms whose genome is unused.
    pub fn dummy() -> Self {
        Self {
            sequence: Sequence::filled(S::filler(), 1),
            alphabet: Alphabet::default(),
            background_mutation: DEFAULT_BACKGROUND_MUTATION,
        }
    }

    /// Same alphabet and background rate as `self`, new sequence.
    pub(crate) fn with_sequence(&self, sequence: Sequence<S>) -> Self {
        Self {
            sequence,
            alphabet: self.alphabet.clone(),
            background_mutation: self.background_mutation,
        }
    }

    #[inline]
    pub fn sequence(&self) -> &Sequence<S> {
        &self.sequence
    }

    #[inline]
    pub fn sequence_mut(&mut self) -> &mut Sequence<S> {
        &mut self.sequence
    }

    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    pub fn background_mutation(&self) -> f64 {
        self.background_mutation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Sum of symbol values.
    pub fn total_value(&self) -> f64 {
        self.sequence.iter().map(Symbol::value).sum()
    }

    /// Independent deep copy.
    pub fn replicate(&self) -> Self {
        self.clone()
    }

    /// Random mutation over `region`.
    ///
    /// Performs `floor((background + rate) * region_len)` edits of `kind` and
    /// returns how many of them applied.
    pub fn rmutate<R: Rng + ?Sized>(
        &mut self,
        kind: MutationKind,
        rate: f64,
        region: Region,
        rng: &mut R,
    ) -> usize {
        mutation::random_mutation(
            &mut self.sequence,
            &self.alphabet,
            self.background_mutation,
            kind,
            rate,
            region,
            rng,
        )
    }

    /// Directed mutation at explicit coordinates.
    pub fn kmutate(&mut self, mutation: &KnownMutation<S>) -> Result<(), MutationError> {
        mutation::apply_known(&mut self.sequence, mutation)
    }
}

/// 1000 filler symbols, the symbol type's default alphabet and a background
/// rate of 0.0001.
impl<S: Symbol> Default for Chromosome<S> {
    fn default() -> Self {
        Self {
            sequence: Sequence::filled(S::filler(), DEFAULT_CHROMOSOME_LENGTH),
            alphabet: Alphabet::default(),
            background_mutation: DEFAULT_BACKGROUND_MUTATION,
        }
    }
}

impl<S: fmt::Display> fmt::Display for Chromosome<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence)
    }
}
