//! Retrieval trait

use crate::document::Document;
use crate::Result;
use async_trait::async_trait;

/// Vector search over the ingested document corpus
///
/// The index itself (embeddings, storage) is a black box. An empty result
/// is a normal outcome; the retrieval layer decides whether to fall back
/// to built-in knowledge.
#[async_trait]
pub trait VectorSearch: Send + Sync + 'static {
    /// Return up to `k` ranked documents for the query
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}
