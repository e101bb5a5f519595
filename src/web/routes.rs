//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        // Search API
        .route("/search", get(handlers::search))
        .route("/prefix", get(handlers::prefix))
        .route("/fuzzy", get(handlers::fuzzy))
        // Service routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats));

    let statics = &state.settings.static_files;
    if let Some(dir) = &statics.dir {
        info!(
            "Serving {} under {}",
            dir.display(),
            statics.url_prefix
        );
        router = router.nest_service(&statics.url_prefix, ServeDir::new(dir));
    }

    router
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
