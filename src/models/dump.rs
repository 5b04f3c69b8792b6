//! Store dump rows printed at the end of a run

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::WordCounts;

/// One live store entry, reduced to its most frequent words.
#[derive(Debug, Clone, Serialize)]
pub struct StoreDumpEntry {
    /// Store key (the processed URL)
    pub key: String,
    /// RFC 3339 deadline, absent when the entry never expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    /// Distinct words in the stored result
    pub unique_words: usize,
    /// Most frequent words with their counts
    pub top_words: Vec<(String, u64)>,
}

impl StoreDumpEntry {
    pub fn new(
        key: impl Into<String>,
        counts: &WordCounts,
        expires_at: Option<DateTime<Utc>>,
        words: usize,
    ) -> Self {
        Self {
            key: key.into(),
            expires_at: expires_at.map(|deadline| deadline.to_rfc3339()),
            unique_words: counts.unique_words(),
            top_words: counts
                .top(words)
                .into_iter()
                .map(|(word, count)| (word.to_string(), count))
                .collect(),
        }
    }
}
