//! Mutation operations for sequences.
//!
//! Two families of operators edit a [`Sequence`] in place:
//!
//! ## Random mutation
//! [`random_mutation`] applies a number of edits of one [`MutationKind`] at
//! uniformly random positions inside a [`Region`]. The number of edits is
//! fixed up front from the background and requested rates, so a rate of 0.1
//! over a 1000-symbol region always performs 100 edits.
//!
//! ## Directed mutation
//! [`apply_known`] performs a single [`KnownMutation`] at caller-chosen
//! positions and rejects out-of-range coordinates without touching the
//! sequence.

use crate::base::{Alphabet, Sequence};
pub use crate::errors::MutationError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six structural edits a chromosome can undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    /// Replace one symbol with a random alphabet symbol.
    #[default]
    Point,
    /// Insert a random alphabet symbol.
    Insert,
    /// Remove one symbol.
    Delete,
    /// Reverse a stretch in place.
    Invert,
    /// Copy a stretch and insert the copy right after it.
    Duplicate,
    /// Excise a stretch and re-insert it elsewhere.
    Translocate,
}

impl MutationKind {
    pub const ALL: [MutationKind; 6] = [
        Self::Point,
        Self::Insert,
        Self::Delete,
        Self::Invert,
        Self::Duplicate,
        Self::Translocate,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Invert => "invert",
            Self::Duplicate => "duplicate",
            Self::Translocate => "translocate",
        }
    }

    /// Whether the edit acts on a stretch rather than a single position.
    pub const fn is_segmental(self) -> bool {
        matches!(self, Self::Invert | Self::Duplicate | Self::Translocate)
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutationKind {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MutationError::UnknownKind(s.to_string()))
    }
}

/// Half-open window `[start, end)` that random mutation is confined to.
///
/// `end = None` means "to the end of the sequence". A window that clamps to
/// nothing (`start >= end`) when a mutation starts is treated as the whole
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: Option<usize>,
}

impl Region {
    pub const fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// The whole sequence, whatever its length.
    pub const fn whole() -> Self {
        Self {
            start: 0,
            end: None,
        }
    }

    /// Resolve the window against a sequence of length `len`.
    #[inline]
    pub fn resolve(&self, len: usize) -> (usize, usize) {
        let end = self.end.map_or(len, |e| e.min(len));
        if self.start >= end {
            (0, len)
        } else {
            (self.start, end)
        }
    }
}

/// Number of edits a random mutation performs on a region.
///
/// `floor((background + rate) * region_len)`, or zero when that is not a
/// positive finite number.
pub fn edit_count(background: f64, rate: f64, region_len: usize) -> usize {
    let count = ((background + rate) * region_len as f64).floor();
    if !count.is_finite() || count <= 0.0 {
        0
    } else {
        count as usize
    }
}

/// Apply `kind` at random positions of `region`, returning the edits applied.
///
/// New symbols are drawn uniformly from `alphabet`. The region is resolved
/// once, against the length at call time, and each edit clamps it to the
/// current length so length-changing kinds never index past the end. An edit
/// whose clamped window is empty is skipped and not counted.
pub fn random_mutation<S: Copy, R: Rng + ?Sized>(
    sequence: &mut Sequence<S>,
    alphabet: &Alphabet<S>,
    background: f64,
    kind: MutationKind,
    rate: f64,
    region: Region,
    rng: &mut R,
) -> usize {
    let (start, end) = region.resolve(sequence.len());
    let count = edit_count(background, rate, end - start);

    let mut applied = 0;
    for _ in 0..count {
        if random_edit(sequence, alphabet, kind, start, end, rng) {
            applied += 1;
        }
    }
    applied
}

fn random_edit<S: Copy, R: Rng + ?Sized>(
    sequence: &mut Sequence<S>,
    alphabet: &Alphabet<S>,
    kind: MutationKind,
    lo: usize,
    end: usize,
    rng: &mut R,
) -> bool {
    let hi = end.min(sequence.len());
    if lo >= hi {
        return false;
    }

    let position = rng.random_range(lo..hi);

    match kind {
        MutationKind::Point => sequence.set(position, alphabet.choose(rng)).is_ok(),
        MutationKind::Delete => sequence.remove(position).is_ok(),
        MutationKind::Insert => sequence.insert(position, alphabet.choose(rng)).is_ok(),
        MutationKind::Duplicate => {
            let cut = rng.random_range(position + 1..=hi);
            let fragment = sequence.as_slice()[position..cut].to_vec();
            sequence.insert_slice(cut, &fragment).is_ok()
        }
        MutationKind::Invert => {
            let cut = rng.random_range(position + 1..=hi);
            sequence.reverse_range(position, cut).is_ok()
        }
        MutationKind::Translocate => {
            let cut = rng.random_range(position + 1..=hi);
            match sequence.drain_range(position, cut) {
                Ok(fragment) => {
                    let target = rng.random_range(0..=sequence.len());
                    sequence.insert_slice(target, &fragment).is_ok()
                }
                Err(_) => false,
            }
        }
    }
}

/// A single edit at explicit coordinates. Ranges are half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KnownMutation<S> {
    Point { position: usize, symbol: S },
    Insert { position: usize, symbols: Vec<S> },
    Delete { position: usize },
    Invert { start: usize, end: usize },
    Duplicate { start: usize, end: usize },
    /// `target` indexes the sequence after the stretch has been excised.
    Translocate { start: usize, end: usize, target: usize },
}

impl<S> KnownMutation<S> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Point { .. } => MutationKind::Point,
            Self::Insert { .. } => MutationKind::Insert,
            Self::Delete { .. } => MutationKind::Delete,
            Self::Invert { .. } => MutationKind::Invert,
            Self::Duplicate { .. } => MutationKind::Duplicate,
            Self::Translocate { .. } => MutationKind::Translocate,
        }
    }
}

fn check_range(start: usize, end: usize, len: usize) -> Result<(), MutationError> {
    if start >= end || end > len {
        return Err(MutationError::InvalidRange { start, end, len });
    }
    Ok(())
}

/// Apply a directed mutation, leaving the sequence untouched on error.
pub fn apply_known<S: Copy>(
    sequence: &mut Sequence<S>,
    mutation: &KnownMutation<S>,
) -> Result<(), MutationError> {
    let len = sequence.len();
    match mutation {
        KnownMutation::Point { position, symbol } => {
            sequence.set(*position, *symbol)?;
        }
        KnownMutation::Insert { position, symbols } => {
            sequence.insert_slice(*position, symbols)?;
        }
        KnownMutation::Delete { position } => {
            sequence.remove(*position)?;
        }
        KnownMutation::Invert { start, end } => {
            check_range(*start, *end, len)?;
            sequence.reverse_range(*start, *end)?;
        }
        KnownMutation::Duplicate { start, end } => {
            check_range(*start, *end, len)?;
            let fragment = sequence.as_slice()[*start..*end].to_vec();
            sequence.insert_slice(*end, &fragment)?;
        }
        KnownMutation::Translocate { start, end, target } => {
            check_range(*start, *end, len)?;
            let remaining = len - (end - start);
            if *target > remaining {
                return Err(MutationError::OutOfBounds {
                    position: *target,
                    len: remaining,
                });
            }
            let fragment = sequence.drain_range(*start, *end)?;
            sequence.insert_slice(*target, &fragment)?;
        }
    }
    Ok(())
}
