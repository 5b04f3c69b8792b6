//! Pipeline Module
//!
//! Extract, transform and load steps, and the orchestrator that sequences
//! them in front of the recency cache and the expiring store.

mod extract;
mod orchestrator;
mod transform;

pub use extract::{Fetcher, HttpFetcher};
pub use orchestrator::{Outcome, Pause, Pipeline, RunSummary, SharedCounts, SharedStore};
pub use transform::Transformer;
