//! Error types shared across the workspace
//!
//! Only `InvalidInput` ever reaches the pipeline's caller; every other
//! variant is absorbed by a degraded fallback and logged.

use thiserror::Error;

/// Workspace-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// The request itself is unusable (empty audio, unsupported language).
    /// This is the only category surfaced to the pipeline caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("retrieval error: {0}")]
    Retrieval(String),

    #[error("composition error: {0}")]
    Composition(String),

    #[error("speech synthesis error: {0}")]
    Synthesis(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("context error: {0}")]
    Context(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Workspace-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error must propagate to the pipeline caller
    /// instead of being absorbed by a fallback.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_input_is_fatal() {
        assert!(Error::InvalidInput("empty audio".into()).is_fatal());
        assert!(!Error::Translation("upstream 500".into()).is_fatal());
        assert!(!Error::Cache("disk full".into()).is_fatal());
    }
}
