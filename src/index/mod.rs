//! Index module
//!
//! The [`SearchIndex`] contract the web layer searches through, and its
//! tantivy-backed implementation.

mod tantivy_index;
mod traits;

pub use tantivy_index::TantivyIndex;
pub use traits::{IndexError, SearchIndex};
