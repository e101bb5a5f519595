//! Result type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hits and facets returned for one search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Number of documents matching the query, before pagination
    pub total_hits: u64,
    /// Highest score among the returned hits
    pub max_score: f64,
    /// Time spent inside the index, in milliseconds
    pub took_ms: u64,
    /// Hits ordered by descending score
    pub hits: Vec<Hit>,
    /// Facet results keyed by facet name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, FacetResult>,
}

impl SearchResult {
    /// Check if there are no hits on this page
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// A single matched document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// External document id
    pub id: String,
    /// Index segment that produced the hit; internal, cleared before leaving the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Relevance score
    pub score: f64,
    /// Stored field values
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Highlighted fragments per field
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fragments: BTreeMap<String, Vec<String>>,
}

impl Hit {
    /// Create a hit without fields or fragments
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            index: None,
            score,
            fields: BTreeMap::new(),
            fragments: BTreeMap::new(),
        }
    }

    /// Set the index location
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Add a stored field value
    pub fn with_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// Terms facet result for one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetResult {
    /// Field the facet was computed over
    pub field: String,
    /// Values counted across matching documents
    pub total: u64,
    /// Matching documents without a value for the field
    pub missing: u64,
    /// Values counted but not in the returned buckets
    pub other: u64,
    /// Top buckets by descending count
    #[serde(default)]
    pub terms: Vec<TermFacet>,
}

/// One facet bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFacet {
    pub term: String,
    pub count: u64,
}
