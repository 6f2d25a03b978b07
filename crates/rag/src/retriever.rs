//! Retrieval front-end
//!
//! Delegates to the configured vector index and falls back to built-in
//! knowledge when the index is absent, empty, or failing.

use std::sync::Arc;

use agri_voice_core::{Document, VectorSearch};
use tracing::{debug, warn};

use crate::fallback::keyword_search;

/// Retriever configuration
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Default number of documents to return
    pub top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Retrieval front-end over an optional vector index
pub struct Retriever {
    config: RetrieverConfig,
    index: Option<Arc<dyn VectorSearch>>,
}

impl Retriever {
    /// Create a retriever with no index (fallback knowledge only)
    pub fn new(config: RetrieverConfig) -> Self {
        Self {
            config,
            index: None,
        }
    }

    /// Attach a vector index collaborator
    pub fn with_index(mut self, index: Arc<dyn VectorSearch>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Search the corpus. Never fails: index errors and empty results
    /// both degrade to the built-in knowledge fallback.
    pub async fn search(&self, query: &str, k: usize) -> Vec<Document> {
        if let Some(index) = &self.index {
            match index.search(query, k).await {
                Ok(docs) if !docs.is_empty() => {
                    debug!(count = docs.len(), "retrieved documents from vector index");
                    return docs;
                }
                Ok(_) => {
                    debug!("vector index returned no results, using built-in knowledge");
                }
                Err(e) => {
                    warn!(error = %e, "vector search failed, using built-in knowledge");
                }
            }
        } else {
            debug!("no vector index configured, using built-in knowledge");
        }

        keyword_search(query, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_voice_core::{Error, Result};
    use async_trait::async_trait;

    struct FixedIndex(Vec<Document>);

    #[async_trait]
    impl VectorSearch for FixedIndex {
        async fn search(&self, _query: &str, k: usize) -> Result<Vec<Document>> {
            Ok(self.0.iter().take(k).cloned().collect())
        }
    }

    struct BrokenIndex;

    #[async_trait]
    impl VectorSearch for BrokenIndex {
        async fn search(&self, _query: &str, _k: usize) -> Result<Vec<Document>> {
            Err(Error::Retrieval("index unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_no_index_uses_fallback() {
        let retriever = Retriever::new(RetrieverConfig::default());
        let results = retriever.search("How to grow rice?", 5).await;
        assert!(!results.is_empty());
        assert!(results[0].text.starts_with("Rice is best grown"));
    }

    #[tokio::test]
    async fn test_empty_index_uses_fallback() {
        let retriever =
            Retriever::new(RetrieverConfig::default()).with_index(Arc::new(FixedIndex(vec![])));
        let results = retriever.search("How to grow rice?", 5).await;
        assert!(results[0].text.starts_with("Rice is best grown"));
    }

    #[tokio::test]
    async fn test_failing_index_uses_fallback() {
        let retriever =
            Retriever::new(RetrieverConfig::default()).with_index(Arc::new(BrokenIndex));
        let results = retriever.search("How to grow rice?", 5).await;
        assert!(!results.is_empty());
        assert_eq!(results[0].source, "built-in");
    }

    #[tokio::test]
    async fn test_populated_index_passthrough() {
        let docs = vec![
            Document::new("ingested rice guide", "corpus/rice.pdf", 0.92),
            Document::new("ingested wheat guide", "corpus/wheat.pdf", 0.71),
        ];
        let retriever =
            Retriever::new(RetrieverConfig::default()).with_index(Arc::new(FixedIndex(docs)));

        let results = retriever.search("rice", 5).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, "corpus/rice.pdf");
    }
}
