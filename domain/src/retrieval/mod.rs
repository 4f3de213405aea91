//! Retrieval domain
//!
//! Evidence passages and the merged [`Context`] built from them.

pub mod context;
pub mod passage;

pub use context::Context;
pub use passage::{Passage, RetrievedPassage};
