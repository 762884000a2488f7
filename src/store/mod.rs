//! Dated catalog snapshots on disk.
//!
//! One pretty-printed JSON document per calendar day, named `YYYY-MM-DD.json`
//! inside the snapshot directory:
//! - writing twice on the same date replaces that day's file
//! - the previous snapshot is the newest file dated before the current one
//! - nothing is ever deleted
//!
//! `diff` compares two snapshots and lists items that appeared.

pub mod diff;
pub mod snapshot;

pub use snapshot::{SnapshotFile, SnapshotStore};
