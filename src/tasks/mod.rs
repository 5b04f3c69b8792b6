//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the pipeline.
//!
//! # Tasks
//! - Store reaper: Removes expired store entries at a configured interval

mod reaper;

pub use reaper::{spawn_reaper, ReaperHandle};
