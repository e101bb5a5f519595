//! Web server module
//!
//! Provides the JSON search API and static archive serving.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
