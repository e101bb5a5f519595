//! Redaction of internal metadata before results leave the server

use super::types::SearchResult;

/// Clear the index location of every hit
pub fn sanitize(result: &mut SearchResult) {
    for hit in &mut result.hits {
        hit.index = None;
    }
}
