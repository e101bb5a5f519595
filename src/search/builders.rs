//! Request builders, one per search endpoint
//!
//! Each builder owns its own case, highlighting and faceting policy. The route
//! picks the builder; nothing in [`SearchParams`] selects a mode.

use super::models::{FacetRequest, QueryKind, SearchMode, SearchRequest};
use crate::config::SearchSettings;
use crate::query::SearchParams;

/// Turns request parameters into an engine request
pub trait RequestBuilder: Send + Sync {
    /// Endpoint this builder serves
    fn mode(&self) -> SearchMode;

    /// Build the request for one search
    fn build(&self, params: &SearchParams) -> SearchRequest;
}

/// Query-string search with a terms facet
#[derive(Debug, Clone)]
pub struct StandardBuilder {
    facet_name: String,
    facet_field: String,
}

impl StandardBuilder {
    pub fn new(facet_name: impl Into<String>, facet_field: impl Into<String>) -> Self {
        Self {
            facet_name: facet_name.into(),
            facet_field: facet_field.into(),
        }
    }
}

impl Default for StandardBuilder {
    fn default() -> Self {
        Self::new("Date", "Date")
    }
}

impl RequestBuilder for StandardBuilder {
    fn mode(&self) -> SearchMode {
        SearchMode::Standard
    }

    fn build(&self, params: &SearchParams) -> SearchRequest {
        SearchRequest::new(QueryKind::QueryString(params.query.clone()), params.size)
            .with_from(params.from)
            .with_facet(
                self.facet_name.clone(),
                FacetRequest::new(self.facet_field.clone(), params.facet_size),
            )
    }
}

/// Case-insensitive prefix search, no highlighting, no facets
#[derive(Debug, Clone, Default)]
pub struct PrefixBuilder;

impl RequestBuilder for PrefixBuilder {
    fn mode(&self) -> SearchMode {
        SearchMode::Prefix
    }

    fn build(&self, params: &SearchParams) -> SearchRequest {
        SearchRequest::new(QueryKind::Prefix(params.lowercase_query()), params.size)
            .with_from(params.from)
            .with_highlight(false)
    }
}

/// Case-insensitive fuzzy search with highlighting, no facets
#[derive(Debug, Clone)]
pub struct FuzzyBuilder {
    fuzziness: u8,
}

impl FuzzyBuilder {
    pub fn new(fuzziness: u8) -> Self {
        Self { fuzziness }
    }
}

impl Default for FuzzyBuilder {
    fn default() -> Self {
        Self::new(2)
    }
}

impl RequestBuilder for FuzzyBuilder {
    fn mode(&self) -> SearchMode {
        SearchMode::Fuzzy
    }

    fn build(&self, params: &SearchParams) -> SearchRequest {
        let query = QueryKind::Fuzzy {
            term: params.lowercase_query(),
            fuzziness: self.fuzziness,
        };
        SearchRequest::new(query, params.size)
            .with_from(params.from)
            .with_highlight(true)
    }
}

/// The three builders configured from settings
#[derive(Debug, Clone)]
pub struct Builders {
    pub standard: StandardBuilder,
    pub prefix: PrefixBuilder,
    pub fuzzy: FuzzyBuilder,
}

impl Builders {
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            standard: StandardBuilder::new(&settings.facet_name, &settings.facet_field),
            prefix: PrefixBuilder,
            fuzzy: FuzzyBuilder::new(settings.fuzziness),
        }
    }

    /// Get the builder serving a mode
    pub fn get(&self, mode: SearchMode) -> &dyn RequestBuilder {
        match mode {
            SearchMode::Standard => &self.standard,
            SearchMode::Prefix => &self.prefix,
            SearchMode::Fuzzy => &self.fuzzy,
        }
    }
}

impl Default for Builders {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> SearchParams {
        SearchParams {
            query: query.to_string(),
            from: 3,
            size: 7,
            facet_size: 4,
        }
    }

    #[test]
    fn test_standard_keeps_case_and_adds_facet() {
        let request = StandardBuilder::default().build(&params("Title:Kant"));
        assert_eq!(request.query, QueryKind::QueryString("Title:Kant".into()));
        assert_eq!((request.from, request.size), (3, 7));
        assert!(!request.highlight);
        assert_eq!(request.facets.len(), 1);
        assert_eq!(request.facets["Date"], FacetRequest::new("Date", 4));
    }

    #[test]
    fn test_prefix_lowercases_without_facets() {
        let request = PrefixBuilder.build(&params("KaN"));
        assert_eq!(request.query, QueryKind::Prefix("kan".into()));
        assert_eq!((request.from, request.size), (3, 7));
        assert!(!request.highlight);
        assert!(request.facets.is_empty());
    }

    #[test]
    fn test_fuzzy_lowercases_and_highlights() {
        let request = FuzzyBuilder::default().build(&params("Hegle"));
        assert_eq!(
            request.query,
            QueryKind::Fuzzy {
                term: "hegle".into(),
                fuzziness: 2
            }
        );
        assert!(request.highlight);
        assert!(request.facets.is_empty());
    }

    #[test]
    fn test_builders_follow_settings() {
        let settings = SearchSettings {
            fuzziness: 1,
            facet_name: "Year".into(),
            facet_field: "published".into(),
            ..Default::default()
        };
        let builders = Builders::from_settings(&settings);

        let fuzzy = builders.get(SearchMode::Fuzzy).build(&params("x"));
        assert_eq!(
            fuzzy.query,
            QueryKind::Fuzzy {
                term: "x".into(),
                fuzziness: 1
            }
        );

        let standard = builders.get(SearchMode::Standard).build(&params("x"));
        assert_eq!(standard.facets["Year"], FacetRequest::new("published", 4));
    }

    #[test]
    fn test_builder_modes() {
        let builders = Builders::default();
        for mode in SearchMode::ALL {
            assert_eq!(builders.get(mode).mode(), mode);
        }
    }
}
