//! Retrieved document type
//!
//! Shared by retrieval and answer composition so both sides agree on the
//! record shape instead of passing loose maps around.

use serde::{Deserialize, Serialize};

/// A single retrieved document (or chunk) with its provenance and score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document text content
    pub text: String,
    /// Where the document came from (corpus id, file, or "built-in")
    pub source: String,
    /// Relevance score from the search that produced it
    pub score: f32,
}

impl Document {
    pub fn new(text: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            score,
        }
    }
}
