use super::Symbol;
use crate::errors::ChromosomeError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Non-empty, ordered set of symbols a chromosome draws new symbols from.
///
/// Duplicates are allowed and weight the random choice accordingly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<S>", into = "Vec<S>")]
#[serde(bound(serialize = "S: Serialize + Clone", deserialize = "S: Deserialize<'de>"))]
pub struct Alphabet<S>(Vec<S>);

impl<S> Alphabet<S> {
    /// Create an alphabet, failing with `EmptyAlphabet` for an empty list.
    pub fn new(symbols: Vec<S>) -> Result<Self, ChromosomeError> {
        if symbols.is_empty() {
            return Err(ChromosomeError::EmptyAlphabet);
        }
        Ok(Self(symbols))
    }

    pub fn symbols(&self) -> &[S] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed alphabet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Copy> Alphabet<S> {
    /// Pick a symbol uniformly at random.
    #[inline]
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> S {
        self.0[rng.random_range(0..self.0.len())]
    }
}

impl<S: PartialEq> Alphabet<S> {
    pub fn contains(&self, symbol: &S) -> bool {
        self.0.contains(symbol)
    }
}

impl<S: Symbol> Default for Alphabet<S> {
    fn default() -> Self {
        Self::new(S::default_alphabet()).unwrap_or_else(|_| Self(vec![S::filler()]))
    }
}

impl<S> TryFrom<Vec<S>> for Alphabet<S> {
    type Error = ChromosomeError;

    fn try_from(symbols: Vec<S>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl<S> From<Alphabet<S>> for Vec<S> {
    fn from(alphabet: Alphabet<S>) -> Self {
        alphabet.0
    }
}
