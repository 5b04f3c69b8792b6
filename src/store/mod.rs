//! Store Module
//!
//! Provides the TTL key-value store the pipeline persists results into.

mod entry;
mod expiring;

pub use entry::StoreEntry;
pub use expiring::ExpiringStore;

// == Public Constants ==
/// Default TTL, in seconds, for results written by the pipeline
pub const DEFAULT_TTL_SECS: i64 = 60;

/// Default interval, in milliseconds, between two reaper sweeps
pub const DEFAULT_REAP_INTERVAL_MS: u64 = 1000;
