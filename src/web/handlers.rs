//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::query::SearchParams;
use crate::results::sanitize;
use crate::search::SearchMode;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

/// Query-string search with date faceting
pub async fn search(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    run_search(&state, SearchMode::Standard, &raw).await
}

/// Case-insensitive prefix search
pub async fn prefix(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    run_search(&state, SearchMode::Prefix, &raw).await
}

/// Case-insensitive fuzzy search
pub async fn fuzzy(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    run_search(&state, SearchMode::Fuzzy, &raw).await
}

async fn run_search(
    state: &AppState,
    mode: SearchMode,
    raw: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let params = SearchParams::from_query(raw, &state.settings.search);
    let mut result = state.search.execute(mode, &params).await?;
    sanitize(&mut result);
    json_response(StatusCode::OK, &result)
}

/// Serialize `body` into a JSON response open to any origin
fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(body).map_err(ApiError::Serialization)?;
    Ok((
        status,
        [
            (header::CONTENT_TYPE, "application/json"),
            // Set here as well as by the CORS layer so it is present without an Origin header
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        bytes,
    )
        .into_response())
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "documents": state.doc_count(),
    }))
}

/// Per-mode search statistics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search.metrics().snapshot())
}
