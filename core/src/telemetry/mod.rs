//! telemetry/mod.rs
//! Dispatch counters and read-only snapshots.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
