//! Data models produced and reported by the pipeline
//!
//! Word frequency results and the serializable rows of the end-of-run store dump.

pub mod dump;
pub mod word_counts;

// Re-export commonly used types
pub use dump::StoreDumpEntry;
pub use word_counts::WordCounts;
