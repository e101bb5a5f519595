//! Search result module
//!
//! Typed result structures and the sanitizer applied before serialization.

mod sanitize;
mod types;

pub use sanitize::sanitize;
pub use types::*;
