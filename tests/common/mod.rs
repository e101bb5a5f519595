//! Shared fixtures for integration tests.
//!
//! Each test builds its own small on-disk index in a temporary directory, so
//! tests never share index state.

#![allow(dead_code)] // Helpers used across different integration test crates

use asma_search::config::Settings;
use asma_search::index::TantivyIndex;
use asma_search::web::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tantivy::schema::{Schema, FAST, STORED, STRING, TEXT};
use tantivy::{doc, Index};
use tempfile::TempDir;
use tower::ServiceExt;

/// A document in the test archive: (id, Title, Body, Date)
pub type Record = (&'static str, &'static str, &'static str, &'static str);

/// Archive with more cat documents than one page and more dates than one facet page
pub const ARCHIVE: &[Record] = &[
    ("d01", "The cat in the archive", "A cat, another cat and a third cat", "1901"),
    ("d02", "Cat studies", "Notes on the domestic cat", "1902"),
    ("d03", "A catalogue of letters", "Letters sorted by sender", "1903"),
    ("d04", "Cats of Vienna", "Street cats photographed", "1904"),
    ("d05", "On the cat", "The cat sleeps", "1905"),
    ("d06", "Cat and mouse", "A fable about a cat", "1906"),
    ("d07", "Black cat", "Superstition about the black cat", "1907"),
    ("d08", "The old cat", "An old cat by the stove", "1908"),
    ("d09", "Cat sketches", "Pencil sketches of a cat", "1909"),
    ("d10", "Cat diary", "The diary of a cat owner", "1910"),
    ("d11", "Another cat", "Yet another cat", "1901"),
    ("d12", "Cat census", "Counting every cat in town", "1902"),
    ("d13", "Philosophy of history", "Lectures given at the archive", "1920"),
    ("d14", "Dog days", "Summer without any felines", "1921"),
];

/// Temporary on-disk index; removed on drop
pub struct TestIndex {
    dir: TempDir,
}

impl TestIndex {
    /// Build an index holding `records`
    pub fn build(records: &[Record]) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");

        let mut builder = Schema::builder();
        let id = builder.add_text_field("id", STRING | STORED);
        let title = builder.add_text_field("Title", TEXT | STORED);
        let body = builder.add_text_field("Body", TEXT | STORED);
        let date = builder.add_text_field("Date", STRING | STORED | FAST);

        let index = Index::create_in_dir(dir.path(), builder.build()).expect("create index");
        let mut writer = index.writer_with_num_threads(1, 15_000_000).expect("index writer");
        for (doc_id, doc_title, doc_body, doc_date) in records {
            writer
                .add_document(doc!(
                    id => *doc_id,
                    title => *doc_title,
                    body => *doc_body,
                    date => *doc_date
                ))
                .expect("add document");
        }
        writer.commit().expect("commit");

        Self { dir }
    }

    /// Build the standard test archive
    pub fn archive() -> Self {
        Self::build(ARCHIVE)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the index the way the server does
    pub fn open(&self) -> TantivyIndex {
        TantivyIndex::open(self.path(), "id").expect("open index")
    }

    /// Router over this index with the given settings
    pub fn router_with(&self, settings: Settings) -> Router {
        create_router(AppState::new(settings, Arc::new(self.open())))
    }

    /// Router over this index with default settings
    pub fn router(&self) -> Router {
        self.router_with(Settings::default())
    }
}

/// Send a GET request through the router
pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("router is infallible")
}

/// Send a GET request and decode the JSON body
pub async fn get_json(router: &Router, uri: &str) -> (u16, serde_json::Value) {
    let response = get(router, uri).await;
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

/// Ids of the hits in a JSON search response, in response order
pub fn hit_ids(body: &serde_json::Value) -> Vec<String> {
    body["hits"]
        .as_array()
        .expect("hits array")
        .iter()
        .map(|h| h["id"].as_str().expect("hit id").to_string())
        .collect()
}
