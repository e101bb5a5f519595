//! Query parameter extraction
//!
//! Turns the raw URL parameters of a search request into [`SearchParams`]:
//! - `q`: query text, used verbatim
//! - `f`: offset of the first hit
//! - `s`: page size
//! - `fa`: number of facet buckets
//!
//! Malformed numbers never fail a request; each field falls back to its
//! default on its own.

use crate::config::SearchSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameter key for the query text
pub const QUERY_KEY: &str = "q";
/// Parameter key for the result offset
pub const FROM_KEY: &str = "f";
/// Parameter key for the page size
pub const SIZE_KEY: &str = "s";
/// Parameter key for the facet bucket count
pub const FACET_SIZE_KEY: &str = "fa";

/// Validated, defaulted search parameters for a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Raw query text, case preserved
    pub query: String,
    /// Offset of the first hit
    pub from: usize,
    /// Maximum number of hits
    pub size: usize,
    /// Number of facet buckets requested
    pub facet_size: usize,
}

impl SearchParams {
    /// Parse with the built-in defaults (`from=0`, `size=10`, `facet_size=8`)
    pub fn parse(params: &HashMap<String, String>) -> Self {
        Self::from_query(params, &SearchSettings::default())
    }

    /// Parse using the configured defaults, offset cap and size cap
    pub fn from_query(params: &HashMap<String, String>, settings: &SearchSettings) -> Self {
        let query = params.get(QUERY_KEY).cloned().unwrap_or_default();
        let from = parse_or(params, FROM_KEY, settings.default_from).min(settings.max_from);
        let size = parse_or(params, SIZE_KEY, settings.default_size).min(settings.max_size);
        let facet_size =
            parse_or(params, FACET_SIZE_KEY, settings.default_facet_size).min(settings.max_size);

        Self {
            query,
            from,
            size,
            facet_size,
        }
    }

    /// Query text folded to lower case for case-insensitive modes
    pub fn lowercase_query(&self) -> String {
        self.query.to_lowercase()
    }

    /// Check if the query text is blank
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::parse(&HashMap::new())
    }
}

fn parse_or(params: &HashMap<String, String>, key: &str, default: usize) -> usize {
    params
        .get(key)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(default)
}
