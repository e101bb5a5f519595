//! asma-search: a read-only JSON search API over a pre-built archive index
//!
//! Requests come in through three endpoints (query-string, prefix and fuzzy
//! search), are translated into structured search requests, run against a
//! shared full-text index and returned as JSON with internal index metadata
//! stripped.

pub mod config;
pub mod index;
pub mod metrics;
pub mod query;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use index::{IndexError, SearchIndex, TantivyIndex};
pub use query::SearchParams;
pub use results::SearchResult;
pub use search::{Search, SearchError, SearchMode, SearchRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
