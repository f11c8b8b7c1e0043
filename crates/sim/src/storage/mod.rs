//! Storage module for persisting populations.
//!
//! This module provides the `.gap` snapshot artifacts written by `freeze`
//! and read by `revive`, and a SQLite-backed population for collections that
//! should live outside memory.

mod database;
pub mod durable;
pub mod snapshot;

pub use database::{Database, DatabaseStats};
pub use durable::DurablePopulation;
pub use snapshot::{read_snapshot, snapshot_path, write_snapshot, FrozenPopulation};
