//! Watches a SUUMO search-results listing and reports added, removed and
//! re-priced properties between runs.

pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod runner;
pub mod scrapers;
pub mod store;

pub use config::Config;
pub use diff::{compute_added, compute_changed, compute_removed, Delta, FieldChange};
pub use error::{Result, WatchError};
pub use models::{Field, PropertyId, PropertyRecord, Snapshot};
pub use runner::{RunOptions, RunReport, Watcher};
pub use store::SnapshotStore;
