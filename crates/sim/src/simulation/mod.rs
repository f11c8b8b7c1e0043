//! Population management and the generational loop.
//!
//! This module provides the in-memory population, its pluggable hooks, and
//! the tooling to configure and drive it.

//! Re-exports
//!
//! The most commonly used simulation types are re-exported here for
//! convenience so consumers can import them from `chromevo_sim::simulation`.
//!
//! - `Population`: organisms, goal and generation counter, stepped one
//!   generation at a time.
//! - `PopulationPolicy`: selection, mating and reporting hooks.
//! - `PopulationBuilder`: fluent builder with validation, also usable from a
//!   `PopulationConfig`.
//! - `Runner`: steps a population to its budget or goal, writing reports and
//!   checkpoints.

pub mod builder;
pub mod configs;
pub mod policy;
pub mod population;
pub mod report;
pub mod runner;

pub use builder::PopulationBuilder;
pub use configs::{InitialChromosome, PopulationConfig, PopulationLimits};
pub use policy::{DefaultPolicy, PopulationPolicy};
pub use population::{Population, RevivalMode};
pub use report::{GenerationReport, ReportFormat, ReportSink, ResultFile};
pub use runner::{Evolvable, RunConfig, RunSummary, Runner};
