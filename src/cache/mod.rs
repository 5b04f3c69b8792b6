//! Cache Module
//!
//! Provides the capacity-bounded recency cache used in front of the pipeline.

mod lru;
mod recency;
mod stats;

// Re-export public types
pub use lru::LruTracker;
pub use recency::BoundedRecencyCache;
pub use stats::CacheStats;

// == Public Constants ==
/// Default number of results kept by the recency cache
pub const DEFAULT_CAPACITY: usize = 5;
