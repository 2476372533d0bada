//! # Adapters Module
//!
//! - `memory`: `InMemoryLedger` and the `SnapshotIterator` cursor
//! - `scan`: `RangeScan`, the scoped owner of a state iterator
//! - `faulty`: `FaultyLedger`, failure injection around any ledger (tests only)

#[cfg(test)]
pub mod faulty;
pub mod memory;
pub mod scan;

#[cfg(test)]
pub use faulty::FaultyLedger;
pub use memory::{InMemoryLedger, IteratorTracker, SnapshotIterator};
pub use scan::RangeScan;
