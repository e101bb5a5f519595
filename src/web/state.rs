//! Application state shared across handlers

use crate::config::Settings;
use crate::index::SearchIndex;
use crate::search::Search;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor holding the index handle
    pub search: Arc<Search>,
}

impl AppState {
    /// Create new application state around an opened index
    pub fn new(settings: Settings, index: Arc<dyn SearchIndex>) -> Self {
        let search = Arc::new(Search::new(index, &settings.search));
        Self {
            settings: Arc::new(settings),
            search,
        }
    }

    /// Number of documents in the index
    pub fn doc_count(&self) -> u64 {
        self.search.index().doc_count()
    }
}
