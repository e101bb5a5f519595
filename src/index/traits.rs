//! Index traits and errors

use crate::results::SearchResult;
use crate::search::SearchRequest;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by an index while opening or searching
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index directory not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to open index at {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("search failed: {0}")]
    Search(String),
}

impl From<tantivy::TantivyError> for IndexError {
    fn from(err: tantivy::TantivyError) -> Self {
        Self::Search(err.to_string())
    }
}

impl From<std::io::Error> for IndexError {
    fn from(err: std::io::Error) -> Self {
        Self::Search(err.to_string())
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Search(err.to_string())
    }
}

/// A read-only, pre-built full-text index.
///
/// One handle is opened at startup and shared by every request, so
/// implementations must tolerate concurrent calls to [`SearchIndex::search`].
/// Searches are blocking and are run off the async runtime by the executor.
pub trait SearchIndex: Send + Sync {
    /// Run a search request
    fn search(&self, request: &SearchRequest) -> Result<SearchResult, IndexError>;

    /// Number of searchable documents
    fn doc_count(&self) -> u64;
}
