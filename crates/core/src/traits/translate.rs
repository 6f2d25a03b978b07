//! Translation trait

use crate::language::Language;
use crate::Result;
use async_trait::async_trait;

/// Source language for a translation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationSource {
    /// Let the engine detect the source language
    Auto,
    Lang(Language),
}

/// Result of a translation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Source language the engine detected; engines asked to auto-detect
    /// should report it, others may leave it `None`
    pub detected_source: Option<Language>,
}

/// Translation interface
///
/// Callers short-circuit identity translations (source == target) before
/// reaching the collaborator; on failure the pipeline falls back to the
/// untranslated text rather than surfacing an error.
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    async fn translate(
        &self,
        text: &str,
        source: TranslationSource,
        target: Language,
    ) -> Result<Translation>;
}
