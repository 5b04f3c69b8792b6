//! Scrape ETL - fetch pages, count their words, cache and store the results
//!
//! Combines a capacity-bounded LRU cache with a TTL key-value store whose
//! expired entries are reaped by a cancellable background task.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod tasks;


pub use config::Config;
pub use error::{EtlError, FetchError};
pub use pipeline::{Fetcher, Outcome, Pipeline};
pub use tasks::spawn_reaper;
