use std::path::PathBuf;
use thiserror::Error;

/// Error returned when attempting to convert an invalid byte/character into
/// a `Nucleotide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid nucleotide byte: {0}")]
pub struct InvalidNucleotide(pub u8);

/// Error returned when an index is outside the valid range for a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Index {index} out of bounds (len = {len})")]
pub struct OutOfBounds {
    /// The index that was requested
    pub index: usize,

    /// The current length of the sequence (upper bound)
    pub len: usize,
}

/// Errors that can occur during directed mutation or when validating rates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// A position lies outside the sequence.
    #[error("Position {position} out of bounds (len = {len})")]
    OutOfBounds { position: usize, len: usize },

    /// A half-open range is empty, reversed, or runs past the sequence.
    #[error("Invalid range [{start}, {end}) for sequence of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Mutation rates must be finite.
    #[error("Invalid mutation rate: {0}")]
    InvalidRate(f64),

    /// Unrecognized mutation kind name.
    #[error("Unknown mutation kind: '{0}'")]
    UnknownKind(String),
}

impl From<OutOfBounds> for MutationError {
    fn from(e: OutOfBounds) -> Self {
        Self::OutOfBounds {
            position: e.index,
            len: e.len,
        }
    }
}

/// Errors that can occur during Chromosome construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChromosomeError {
    /// The alphabet has no symbols to draw from.
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,

    /// Background mutation rate outside [0, 1].
    #[error("Invalid background mutation rate: {0} (must be between 0.0 and 1.0)")]
    InvalidBackgroundRate(f64),
}

/// Errors raised by organism construction and status lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrganismError {
    /// An organism needs at least one chromosome.
    #[error("Organism genome must contain at least one chromosome")]
    EmptyGenome,

    /// Status lookup of a field that is neither built in nor previously set.
    #[error("Unknown status field: '{0}'")]
    UnknownStatusField(String),
}

/// Errors from writing or restoring population snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The artifact does not exist.
    #[error("Snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The artifact exists but could not be decoded.
    #[error("Corrupt snapshot {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// Encoding the population failed.
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    /// IO error
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database error types.
#[derive(Debug, Clone, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(String),
    #[error("Database initialization error: {0}")]
    Initialization(String),
    #[error("Transaction error: {0}")]
    Transaction(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Insert error: {0}")]
    Insert(String),
    #[error("Close error: {0}")]
    Close(String),
    #[error("Vacuum error: {0}")]
    Vacuum(String),
    /// A stored organism could not be serialized or deserialized.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Errors raised while stepping, reporting, or checkpointing a population.
#[derive(Debug, Error)]
pub enum PopulationError {
    /// `percent_to_goal` is undefined for a zero goal.
    #[error("Population goal must be non-zero")]
    InvalidGoal,

    /// Reporting or mating needs at least one organism.
    #[error("Population has no organisms")]
    EmptyPopulation,

    /// Failure raised by a custom policy hook.
    #[error("Population hook failed: {0}")]
    Hook(String),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Organism(#[from] OrganismError),

    /// A run was requested with neither a generation limit nor a goal stop.
    #[error("Run has no generation limit and does not stop at the goal")]
    Unbounded,

    /// Failed to encode or decode an organism or RNG state.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Writing reports failed.
    #[error("Report IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while building a population from configuration.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required parameter is missing
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    /// An invalid parameter value was provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Chromosome(#[from] ChromosomeError),

    #[error(transparent)]
    Organism(#[from] OrganismError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for BuilderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("JSON error: {e}"))
    }
}
