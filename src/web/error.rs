//! Conversion of request failures into JSON error responses

use crate::index::IndexError;
use crate::search::SearchError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Everything that can fail a single API request
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("failed to serialize response: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Search(SearchError::Index(IndexError::InvalidQuery(_))) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Search(SearchError::Index(IndexError::InvalidQuery(_))) => "invalid_query",
            Self::Search(SearchError::Index(_)) => "search_failed",
            Self::Search(SearchError::Timeout(_)) => "search_timeout",
            Self::Search(SearchError::Task(_)) => "internal_error",
            Self::Serialization(_) => "serialization_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });

        (
            status,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            body.to_string(),
        )
            .into_response()
    }
}
