//! Search orchestration module
//!
//! Builds mode-specific requests and runs them against the shared index
//! with per-request timeouts.

mod builders;
mod executor;
mod models;

pub use builders::{Builders, FuzzyBuilder, PrefixBuilder, RequestBuilder, StandardBuilder};
pub use executor::{Search, SearchError};
pub use models::*;
