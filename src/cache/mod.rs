//! Snapshot cache
//!
//! Holds the process-wide current `SchemaSnapshot` and mirrors it to a JSON
//! file used as startup fallback.

mod store;

pub use store::SnapshotStore;
