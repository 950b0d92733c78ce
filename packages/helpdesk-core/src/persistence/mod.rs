//! Snapshot persistence of a helpdesk site.

pub mod io_utils;
mod snapshot;

pub use snapshot::{SiteSnapshot, SnapshotManager, SNAPSHOT_VERSION};
