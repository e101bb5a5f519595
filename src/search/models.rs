//! Search request and related data models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which endpoint a search came through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Standard,
    Prefix,
    Fuzzy,
}

impl SearchMode {
    /// All modes, in route order
    pub const ALL: [SearchMode; 3] = [Self::Standard, Self::Prefix, Self::Fuzzy];

    /// Get the string representation used in logs and stats
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Prefix => "prefix",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The query shapes the index understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryKind {
    /// Full query-string syntax (`+must -not field:value "phrase"`)
    QueryString(String),
    /// Terms starting with the given text
    Prefix(String),
    /// Terms within `fuzziness` edits of the given text
    Fuzzy { term: String, fuzziness: u8 },
}

impl QueryKind {
    /// The user text carried by the query
    pub fn text(&self) -> &str {
        match self {
            Self::QueryString(text) | Self::Prefix(text) => text,
            Self::Fuzzy { term, .. } => term,
        }
    }
}

/// Terms facet over a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// Field to bucket over
    pub field: String,
    /// Maximum number of buckets
    pub size: usize,
}

impl FacetRequest {
    pub fn new(field: impl Into<String>, size: usize) -> Self {
        Self {
            field: field.into(),
            size,
        }
    }
}

/// Engine-facing search request, immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query to run
    pub query: QueryKind,
    /// Offset of the first hit
    pub from: usize,
    /// Maximum number of hits
    pub size: usize,
    /// Whether to return highlighted fragments
    pub highlight: bool,
    /// Named facets to compute
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, FacetRequest>,
}

impl SearchRequest {
    /// Create a request for the first `size` hits of `query`
    pub fn new(query: QueryKind, size: usize) -> Self {
        Self {
            query,
            from: 0,
            size,
            highlight: false,
            facets: BTreeMap::new(),
        }
    }

    /// Set the offset of the first hit
    pub fn with_from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Enable or disable highlighting
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Add a named facet
    pub fn with_facet(mut self, name: impl Into<String>, facet: FacetRequest) -> Self {
        self.facets.insert(name.into(), facet);
        self
    }
}
