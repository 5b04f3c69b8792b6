//! Error types for the pipeline
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Etl Error Enum ==
/// Unified error type for pipeline construction and setup.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Invalid configuration value (e.g. zero cache capacity)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A text-processing pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] fancy_regex::Error),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

// == Fetch Error Enum ==
/// Reason a fetch produced no content.
///
/// Fetch failures never cross the fetcher boundary as panics; they are values
/// the orchestrator reports and moves past.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete within the client timeout
    #[error("request to {0} timed out")]
    Timeout(String),

    /// Connection, DNS or body read failure
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Server answered successfully but with an empty body
    #[error("empty body from {0}")]
    Empty(String),
}

impl FetchError {
    /// The URL the failed request targeted.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout(url) | FetchError::Empty(url) => url,
            FetchError::Transport { url, .. } | FetchError::Status { url, .. } => url,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the pipeline.
pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_url() {
        let err = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        };
        assert_eq!(err.url(), "https://example.com");
        assert_eq!(err.to_string(), "HTTP 404 for https://example.com");

        let err = FetchError::Timeout("https://slow.test".to_string());
        assert_eq!(err.url(), "https://slow.test");
    }

    #[test]
    fn test_configuration_error_message() {
        let err = EtlError::Configuration("cache capacity must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: cache capacity must be positive"
        );
    }
}
