//! Frozen population artifacts.
//!
//! A snapshot is a bincode-encoded [`FrozenPopulation`] written to
//! `<prefix><generation>_<sample size>.gap`. Decoding is all-or-nothing: a
//! snapshot is either fully restored or rejected as corrupt.

use crate::base::Symbol;
use crate::errors::SnapshotError;
use crate::genome::Organism;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Current encoding version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// File extension of snapshot artifacts.
pub const SNAPSHOT_EXTENSION: &str = "gap";

/// A sample of a population at one generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "S: Symbol", deserialize = "S: Symbol"))]
pub struct FrozenPopulation<S: Symbol> {
    pub version: u32,
    /// Type name of the symbols, checked on load.
    pub symbol_type: String,
    pub generation: usize,
    pub goal: f64,
    pub organisms: Vec<Organism<S>>,
}

impl<S: Symbol> FrozenPopulation<S> {
    pub fn new(generation: usize, goal: f64, organisms: Vec<Organism<S>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            symbol_type: std::any::type_name::<S>().to_string(),
            generation,
            goal,
            organisms,
        }
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    /// Mean fitness of the frozen organisms under their current behaviour.
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.organisms.is_empty() {
            return None;
        }
        let total: f64 = self.organisms.iter().map(Organism::fitness).sum();
        Some(total / self.organisms.len() as f64)
    }
}

/// Name of the artifact for `generation` holding `sample_size` organisms.
pub fn snapshot_path(prefix: &str, generation: usize, sample_size: usize) -> PathBuf {
    PathBuf::from(format!(
        "{prefix}{generation}_{sample_size}.{SNAPSHOT_EXTENSION}"
    ))
}

/// Number of draws for a freeze of `size` organisms, `None` for the whole
/// collection.
///
/// `proportion` is clamped to `[0, 1]`. Collections smaller than
/// `full_freeze_below` and a proportion of 1 are frozen whole; otherwise
/// `floor(size * proportion)` organisms are drawn with replacement, at least
/// one.
///
/// Only the collection size is compared with `full_freeze_below`, never the
/// sample size: 1,000 organisms at 0.05 draw 50 rather than freezing all
/// 1,000, even though 50 is below the threshold.
pub fn freeze_sample_size(size: usize, proportion: f64, full_freeze_below: usize) -> Option<usize> {
    let proportion = if proportion.is_nan() {
        0.0
    } else {
        proportion.clamp(0.0, 1.0)
    };
    if size < full_freeze_below || proportion >= 1.0 {
        return None;
    }
    Some(((size as f64 * proportion).floor() as usize).max(1))
}

/// Write `frozen` under its canonical name and return the path.
pub fn write_snapshot<S: Symbol>(
    prefix: &str,
    frozen: &FrozenPopulation<S>,
) -> Result<PathBuf, SnapshotError> {
    let path = snapshot_path(prefix, frozen.generation, frozen.len());
    let mut writer = BufWriter::new(File::create(&path)?);
    bincode::serialize_into(&mut writer, frozen)
        .map_err(|e| SnapshotError::Encode(e.to_string()))?;
    writer.flush()?;

    log::info!(
        "Froze {} organisms at generation {} to {}",
        frozen.len(),
        frozen.generation,
        path.display()
    );
    Ok(path)
}

/// Read a snapshot, validating version, symbol type and genomes.
pub fn read_snapshot<S: Symbol>(
    path: impl AsRef<Path>,
) -> Result<FrozenPopulation<S>, SnapshotError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SnapshotError::NotFound(path.to_path_buf()),
        _ => SnapshotError::Io(e),
    })?;

    let corrupt = |reason: String| SnapshotError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let frozen: FrozenPopulation<S> =
        bincode::deserialize(&bytes).map_err(|e| corrupt(e.to_string()))?;

    if frozen.version != SNAPSHOT_VERSION {
        return Err(corrupt(format!(
            "unsupported version {} (expected {SNAPSHOT_VERSION})",
            frozen.version
        )));
    }
    let expected = std::any::type_name::<S>();
    if frozen.symbol_type != expected {
        return Err(corrupt(format!(
            "symbol type {} does not match {expected}",
            frozen.symbol_type
        )));
    }
    for (i, organism) in frozen.organisms.iter().enumerate() {
        organism
            .check_genome()
            .map_err(|e| corrupt(format!("organism {i}: {e}")))?;
    }

    Ok(frozen)
}
