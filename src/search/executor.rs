//! Search execution against the shared index

use super::builders::Builders;
use super::models::{SearchMode, SearchRequest};
use crate::config::SearchSettings;
use crate::index::{IndexError, SearchIndex};
use crate::metrics::Metrics;
use crate::query::SearchParams;
use crate::results::SearchResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Why a single search failed
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("search timed out after {0:?}")]
    Timeout(Duration),

    #[error("search task failed: {0}")]
    Task(String),
}

/// Search executor that runs built requests against the long-lived index
pub struct Search {
    /// Index handle shared by all requests
    index: Arc<dyn SearchIndex>,
    /// Per-mode request builders
    builders: Builders,
    /// Per-request timeout
    timeout: Duration,
    /// Metrics sink
    metrics: Arc<Metrics>,
}

impl Search {
    /// Create a new search executor
    pub fn new(index: Arc<dyn SearchIndex>, settings: &SearchSettings) -> Self {
        Self {
            index,
            builders: Builders::from_settings(settings),
            timeout: settings.timeout(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Metrics recorded by this executor
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// The shared index handle
    pub fn index(&self) -> &Arc<dyn SearchIndex> {
        &self.index
    }

    /// Build the request for `mode` without running it
    pub fn build(&self, mode: SearchMode, params: &SearchParams) -> SearchRequest {
        self.builders.get(mode).build(params)
    }

    /// Build and run a search for one endpoint
    pub async fn execute(
        &self,
        mode: SearchMode,
        params: &SearchParams,
    ) -> Result<SearchResult, SearchError> {
        let request = self.build(mode, params);
        self.run(mode, request).await
    }

    /// Run a built request on the blocking pool, bounded by the timeout.
    ///
    /// A failing, panicking or slow search only fails its own call.
    pub async fn run(
        &self,
        mode: SearchMode,
        request: SearchRequest,
    ) -> Result<SearchResult, SearchError> {
        debug!(
            "Executing {} search '{}' (from={}, size={})",
            mode,
            request.query.text(),
            request.from,
            request.size
        );

        let start = Instant::now();
        let index = Arc::clone(&self.index);
        let task = tokio::task::spawn_blocking(move || index.search(&request));

        // On timeout the blocking task is left to finish on its own
        let outcome = match timeout(self.timeout, task).await {
            Ok(Ok(Ok(result))) => Ok(result),
            Ok(Ok(Err(e))) => Err(SearchError::Index(e)),
            Ok(Err(e)) => Err(SearchError::Task(e.to_string())),
            Err(_) => Err(SearchError::Timeout(self.timeout)),
        };

        let elapsed = start.elapsed();
        self.metrics
            .record_search(mode, elapsed.as_millis() as u64, outcome.is_ok());

        match &outcome {
            Ok(result) => debug!(
                "{} search returned {} of {} hits in {:?}",
                mode,
                result.hits.len(),
                result.total_hits,
                elapsed
            ),
            Err(e) => warn!("{} search failed after {:?}: {}", mode, elapsed, e),
        }

        outcome
    }
}
