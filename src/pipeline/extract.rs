//! Extract step: fetching page markup over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{EtlError, FetchError};

/// Source of raw page content for a URL.
///
/// Implementations bound their own wait time and report every failure as a
/// [`FetchError`] value rather than panicking.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, EtlError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scrape_etl/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let result = fetch_text(&self.client, url).await;
        if let Err(e) = &result {
            debug!(url, error = %e, "fetch failed");
        }
        result
    }
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| classify(url, e))?;
    if body.is_empty() {
        return Err(FetchError::Empty(url.to_string()));
    }

    Ok(body)
}

fn classify(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
