//! Truncation selection against the mean fitness.
//!
//! These helpers work on plain fitness vectors so both the in-memory and the
//! store-backed population share one selection rule.

use rand::Rng;

/// Arithmetic mean of `values`, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Indices of values strictly above the mean, in their original order.
pub fn above_mean(fitness: &[f64]) -> Vec<usize> {
    let Some(threshold) = mean(fitness) else {
        return Vec::new();
    };
    fitness
        .iter()
        .enumerate()
        .filter(|(_, &f)| f > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// `count` uniform draws with replacement from `pool`.
pub fn sample_with_replacement<T: Copy, R: Rng + ?Sized>(
    pool: &[T],
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect()
}

/// Outcome of truncation selection on one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Replace the collection with these indices (duplicates allowed).
    Adopt(Vec<usize>),
    /// Too few survivors; keep the collection as it was.
    KeepPrevious { survivors: usize },
}

/// Select organisms above the mean fitness.
///
/// Survivors beyond `survivor_cap` are replaced by `survivor_cap` draws with
/// replacement. The selection is adopted only with more than
/// `extinction_floor` members.
pub fn truncate_above_mean<R: Rng + ?Sized>(
    fitness: &[f64],
    survivor_cap: usize,
    extinction_floor: usize,
    rng: &mut R,
) -> Selection {
    let mut survivors = above_mean(fitness);
    if survivors.len() > survivor_cap {
        log::debug!(
            "Sampling {survivor_cap} of {} survivors with replacement",
            survivors.len()
        );
        survivors = sample_with_replacement(&survivors, survivor_cap, rng);
    }

    if survivors.len() > extinction_floor {
        Selection::Adopt(survivors)
    } else {
        Selection::KeepPrevious {
            survivors: survivors.len(),
        }
    }
}
