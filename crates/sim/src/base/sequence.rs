use crate::errors::OutOfBounds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutable sequence of symbols backed by a vector.
///
/// `Sequence` is the raw storage under a chromosome. Mutation operators edit
/// it in place; every fallible accessor checks bounds instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence<S>(Vec<S>);

impl<S: Copy> Sequence<S> {
    /// Create a new, empty `Sequence`.
    ///
    /// ```rust
    /// # use chromevo_sim::base::Sequence;
    /// let seq: Sequence<u8> = Sequence::new();
    /// assert_eq!(seq.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a `Sequence` with reserved capacity for `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Create a sequence of `len` copies of `symbol`.
    pub fn filled(symbol: S, len: usize) -> Self {
        Self(vec![symbol; len])
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the symbol at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<S> {
        self.0.get(index).copied()
    }

    /// Replace the symbol at `index`.
    pub fn set(&mut self, index: usize, symbol: S) -> Result<(), OutOfBounds> {
        let len = self.0.len();
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = symbol;
                Ok(())
            }
            None => Err(OutOfBounds { index, len }),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[S] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [S] {
        &mut self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.0.iter()
    }

    pub fn push(&mut self, symbol: S) {
        self.0.push(symbol);
    }

    pub fn pop(&mut self) -> Option<S> {
        self.0.pop()
    }

    /// Insert a symbol at `index` (which may equal `len`).
    pub fn insert(&mut self, index: usize, symbol: S) -> Result<(), OutOfBounds> {
        if index > self.0.len() {
            return Err(OutOfBounds {
                index,
                len: self.0.len(),
            });
        }
        self.0.insert(index, symbol);
        Ok(())
    }

    /// Insert `symbols` at `index`, preserving their order.
    pub fn insert_slice(&mut self, index: usize, symbols: &[S]) -> Result<(), OutOfBounds> {
        if index > self.0.len() {
            return Err(OutOfBounds {
                index,
                len: self.0.len(),
            });
        }
        self.0.splice(index..index, symbols.iter().copied());
        Ok(())
    }

    /// Remove and return the symbol at `index`.
    pub fn remove(&mut self, index: usize) -> Result<S, OutOfBounds> {
        if index >= self.0.len() {
            return Err(OutOfBounds {
                index,
                len: self.0.len(),
            });
        }
        Ok(self.0.remove(index))
    }

    /// Reverse the half-open range `[start, end)` in place.
    pub fn reverse_range(&mut self, start: usize, end: usize) -> Result<(), OutOfBounds> {
        self.check_range(start, end)?;
        self.0[start..end].reverse();
        Ok(())
    }

    /// Remove and return the half-open range `[start, end)`.
    pub fn drain_range(&mut self, start: usize, end: usize) -> Result<Vec<S>, OutOfBounds> {
        self.check_range(start, end)?;
        Ok(self.0.drain(start..end).collect())
    }

    /// Split the sequence at `index`, clamped to the length.
    pub fn split_clamped(&self, index: usize) -> (&[S], &[S]) {
        self.0.split_at(index.min(self.0.len()))
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), OutOfBounds> {
        let len = self.0.len();
        if end > len {
            return Err(OutOfBounds { index: end, len });
        }
        if start > end {
            return Err(OutOfBounds { index: start, len });
        }
        Ok(())
    }

    pub fn into_vec(self) -> Vec<S> {
        self.0
    }
}

impl<S> Default for Sequence<S> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<S> From<Vec<S>> for Sequence<S> {
    fn from(symbols: Vec<S>) -> Self {
        Self(symbols)
    }
}

impl<S: Copy> From<&[S]> for Sequence<S> {
    fn from(symbols: &[S]) -> Self {
        Self(symbols.to_vec())
    }
}

impl<S> FromIterator<S> for Sequence<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Symbols are written back to back, so `[0, 1, 1]` prints as `011`.
impl<S: fmt::Display> fmt::Display for Sequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
