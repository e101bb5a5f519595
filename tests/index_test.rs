//! Tests of the on-disk index adapter outside the HTTP layer.

mod common;

use asma_search::index::{IndexError, SearchIndex, TantivyIndex};
use asma_search::query::SearchParams;
use asma_search::results::sanitize;
use asma_search::search::{Builders, SearchMode};
use common::TestIndex;
use std::collections::HashMap;

fn params(pairs: &[(&str, &str)]) -> SearchParams {
    let raw: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    SearchParams::parse(&raw)
}

#[test]
fn test_open_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nothing-here");

    let err = TantivyIndex::open(&missing, "id").err().unwrap();
    assert!(matches!(err, IndexError::NotFound(_)));
}

#[test]
fn test_open_directory_without_index() {
    let dir = tempfile::tempdir().unwrap();

    let err = TantivyIndex::open(dir.path(), "id").err().unwrap();
    assert!(matches!(err, IndexError::Open { .. }));
}

#[test]
fn test_hits_carry_location_until_sanitized() {
    let fixture = TestIndex::archive();
    let index = fixture.open();
    let builders = Builders::default();

    let request = builders
        .get(SearchMode::Standard)
        .build(&params(&[("q", "cat"), ("s", "3")]));
    let mut result = index.search(&request).unwrap();

    assert_eq!(result.hits.len(), 3);
    assert!(result.hits.iter().all(|h| h.index.is_some()));

    let before = result.clone();
    sanitize(&mut result);
    assert!(result.hits.iter().all(|h| h.index.is_none()));

    // everything except the location survives the JSON round trip
    let json = serde_json::to_string(&result).unwrap();
    assert!(!json.contains("\"index\""));
    let back: asma_search::SearchResult = serde_json::from_str(&json).unwrap();
    for (after, original) in back.hits.iter().zip(&before.hits) {
        assert_eq!(after.id, original.id);
        assert_eq!(after.score, original.score);
        assert_eq!(after.fields, original.fields);
    }
    assert_eq!(back.facets, before.facets);
}

#[test]
fn test_fallback_ids_without_id_field() {
    let fixture = TestIndex::archive();
    let index = TantivyIndex::open(fixture.path(), "uuid").unwrap();

    let request = Builders::default()
        .get(SearchMode::Prefix)
        .build(&params(&[("q", "philosophy")]));
    let result = index.search(&request).unwrap();

    assert_eq!(result.hits.len(), 1);
    assert!(result.hits[0].id.contains(':'));
}

#[test]
fn test_fuzzy_request_asks_for_highlighting() {
    let fixture = TestIndex::archive();
    let index = fixture.open();

    let request = Builders::default()
        .get(SearchMode::Fuzzy)
        .build(&params(&[("q", "Philosophi")]));
    assert!(request.highlight);

    let result = index.search(&request).unwrap();
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].id, "d13");
    let title = &result.hits[0].fragments["Title"][0];
    assert!(title.contains("<b>Philosophy</b>"), "{}", title);
}

#[test]
fn test_huge_offset_is_bounded() {
    let fixture = TestIndex::archive();
    let index = fixture.open();
    let builders = Builders::default();

    for from in ["1000000000000", "18446744073709551615"] {
        let request = builders
            .get(SearchMode::Standard)
            .build(&params(&[("q", "cat"), ("f", from)]));
        assert!(request.from <= 10_000);

        let result = index.search(&request).unwrap();
        assert_eq!(result.total_hits, 10);
        assert!(result.hits.is_empty());
    }
}
