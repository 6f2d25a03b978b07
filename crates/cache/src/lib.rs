//! Two-tier response cache
//!
//! Sits in front of the expensive pipeline stages (translation, retrieval,
//! answer composition) so repeated questions do not re-run them. Entries
//! live in an in-process map backed by one JSON file per key on disk; the
//! disk tier survives restarts and feeds the memory tier on a hit
//! (promotion). Everything is keyed by a deterministic fingerprint of
//! (normalized query, context, language).
//!
//! The cache is an optimization, never a correctness dependency: disk I/O
//! failures degrade to memory-only operation and malformed entries count
//! as misses.

pub mod fingerprint;
pub mod similarity;
pub mod store;

pub use fingerprint::fingerprint;
pub use similarity::jaccard;
pub use store::{CacheConfig, CacheStats, ResponseCache, SimilarQuery};

use thiserror::Error;

/// Cache errors (construction only; runtime failures degrade internally)
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache directory error: {0}")]
    Directory(String),
}

impl From<CacheError> for agri_voice_core::Error {
    fn from(err: CacheError) -> Self {
        agri_voice_core::Error::Cache(err.to_string())
    }
}
