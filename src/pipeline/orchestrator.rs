//! Pipeline orchestration: cache check, fetch, transform, persist.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use rand::Rng;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{BoundedRecencyCache, CacheStats};
use crate::config::Config;
use crate::error::{FetchError, Result};
use crate::models::{StoreDumpEntry, WordCounts};
use crate::pipeline::{Fetcher, HttpFetcher, Transformer};
use crate::store::ExpiringStore;
use crate::tasks::{spawn_reaper, ReaperHandle};

/// Shared handle to a stored result.
pub type SharedCounts = Arc<WordCounts>;

/// Store shared between the pipeline and its reaper.
pub type SharedStore = Arc<RwLock<ExpiringStore<SharedCounts>>>;

// == Outcome ==
/// Terminal state of one work-unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Served from the recency cache, nothing fetched
    Cached(SharedCounts),
    /// Fetched, transformed and persisted
    Processed(SharedCounts),
    /// Fetch produced no content; cache and store untouched
    FetchFailed(FetchError),
}

impl Outcome {
    /// The word counts, if the unit produced any.
    pub fn counts(&self) -> Option<&SharedCounts> {
        match self {
            Outcome::Cached(counts) | Outcome::Processed(counts) => Some(counts),
            Outcome::FetchFailed(_) => None,
        }
    }

    pub fn into_counts(self) -> Option<SharedCounts> {
        match self {
            Outcome::Cached(counts) | Outcome::Processed(counts) => Some(counts),
            Outcome::FetchFailed(_) => None,
        }
    }
}

// == Run Summary ==
/// Tally of outcomes over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cached: usize,
    pub processed: usize,
    pub failed: usize,
    /// True when the run stopped before every URL was processed
    pub interrupted: bool,
}

impl RunSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Cached(_) => self.cached += 1,
            Outcome::Processed(_) => self.processed += 1,
            Outcome::FetchFailed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.cached + self.processed + self.failed
    }
}

/// Bounds of the random pause inserted between two work-units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub min: Duration,
    pub max: Duration,
}

impl Pause {
    pub const NONE: Pause = Pause {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

impl From<&Config> for Pause {
    fn from(config: &Config) -> Self {
        Self {
            min: Duration::from_millis(config.pause_min_ms),
            max: Duration::from_millis(config.pause_max_ms),
        }
    }
}

// == Pipeline ==
/// Owns the recency cache, the expiring store and its reaper, and drives
/// URLs through fetch → clean → count → persist.
pub struct Pipeline<F = HttpFetcher> {
    fetcher: F,
    transformer: Transformer,
    cache: BoundedRecencyCache<String, SharedCounts>,
    store: SharedStore,
    store_ttl: TimeDelta,
    reaper: ReaperHandle,
}

impl Pipeline<HttpFetcher> {
    /// Builds a pipeline that fetches over HTTP.
    ///
    /// See [`Pipeline::with_fetcher`] for validation and runtime requirements.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: Fetcher> Pipeline<F> {
    /// Builds a pipeline around any [`Fetcher`] and starts the store reaper.
    ///
    /// Must be called from within a tokio runtime; the store reaper is
    /// spawned immediately. `config` is validated first.
    pub fn with_fetcher(config: &Config, fetcher: F) -> Result<Self> {
        config.validate()?;

        let cache = BoundedRecencyCache::new(config.cache_capacity)?;
        let store: SharedStore = Arc::new(RwLock::new(ExpiringStore::new()));
        let reaper = spawn_reaper(
            store.clone(),
            config.reap_interval(),
            CancellationToken::new(),
        );

        Ok(Self {
            fetcher,
            transformer: Transformer::new()?,
            cache,
            store,
            store_ttl: config.store_ttl(),
            reaper,
        })
    }

    // == Process ==
    /// Runs one work-unit for `url`.
    ///
    /// A fetch failure is terminal for this unit only and leaves both the
    /// cache and the store unchanged.
    pub async fn process(&mut self, url: &str) -> Outcome {
        let key = url.to_string();

        if let Some(counts) = self.cache.get(&key) {
            info!(url, "Using cached data");
            return Outcome::Cached(counts);
        }

        let markup = match self.fetcher.fetch(url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(url, error = %e, "Failed to fetch");
                return Outcome::FetchFailed(e);
            }
        };

        let counts: SharedCounts = Arc::new(self.transformer.transform(&markup));

        self.store
            .write()
            .await
            .set(key.clone(), counts.clone(), Some(self.store_ttl));
        self.cache.put(key, counts.clone());

        info!(url, unique_words = counts.unique_words(), "Processed");
        Outcome::Processed(counts)
    }

    // == Run ==
    /// Processes `urls` in order with a random pause between units.
    ///
    /// Stops early, between units, once `shutdown` is cancelled.
    pub async fn run<I, S>(
        &mut self,
        urls: I,
        pause: Pause,
        shutdown: &CancellationToken,
    ) -> RunSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = RunSummary::default();

        for url in urls {
            if shutdown.is_cancelled() {
                summary.interrupted = true;
                break;
            }

            let outcome = self.process(url.as_ref()).await;
            summary.record(&outcome);

            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(pause.sample()) => {}
            }
        }

        info!(
            processed = summary.processed,
            cached = summary.cached,
            failed = summary.failed,
            "Run finished"
        );
        summary
    }

    // == Inspection ==
    /// Live store entries rendered for the end-of-run dump.
    pub async fn dump(&self, limit: usize, words: usize) -> Vec<StoreDumpEntry> {
        self.store
            .read()
            .await
            .snapshot()
            .into_iter()
            .take(limit)
            .map(|(key, counts, expires_at)| StoreDumpEntry::new(key, &counts, expires_at, words))
            .collect()
    }

    /// Reads a persisted result, honouring its deadline.
    pub async fn stored(&self, url: &str) -> Option<SharedCounts> {
        self.store.write().await.get(url)
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn cache(&self) -> &BoundedRecencyCache<String, SharedCounts> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn store_stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn reaper_running(&self) -> bool {
        self.reaper.is_running()
    }

    /// Stops the store reaper and waits for it to exit.
    pub async fn shutdown(self) {
        self.reaper.stop().await;
    }
}
