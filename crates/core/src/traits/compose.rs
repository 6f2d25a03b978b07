//! Answer composition trait

use crate::document::Document;
use crate::Result;
use async_trait::async_trait;

/// LLM-backed answer composition
///
/// Given the pivot-language question and the top retrieved documents,
/// produce a short focused answer. The collaborator may be unreachable;
/// the pipeline then falls back to a deterministic truncation of the top
/// document instead of propagating the error.
#[async_trait]
pub trait AnswerComposer: Send + Sync + 'static {
    async fn compose(&self, question: &str, retrieved: &[Document]) -> Result<String>;
}
