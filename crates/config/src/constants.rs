//! Centralized defaults
//!
//! Single source of truth for tunable defaults referenced by both
//! `settings.rs` and the crates that consume them.

/// Cache defaults
pub mod cache {
    /// Default on-disk cache root
    pub const DEFAULT_DIR: &str = "storage/cache";
    /// Entries older than this are invalid
    pub const DEFAULT_TTL_HOURS: i64 = 24;
    /// Jaccard similarity threshold for fuzzy query reuse
    pub const SIMILARITY_THRESHOLD: f64 = 0.8;
}

/// Conversation context defaults
pub mod context {
    /// Rolling window of turns kept per user
    pub const DEFAULT_MAX_TURNS: usize = 5;
    /// Only turns this recent are restored from persistence
    pub const DEFAULT_WINDOW_HOURS: i64 = 24;
    /// Contexts idle longer than this are swept from the registry
    pub const DEFAULT_INACTIVE_SWEEP_HOURS: i64 = 2;
    /// Previous answers are truncated to this many chars in summaries
    pub const SUMMARY_ANSWER_CHARS: usize = 100;
}

/// Pipeline defaults
pub mod pipeline {
    /// Documents retrieved per query
    pub const DEFAULT_TOP_K: usize = 5;
    /// Synthesis input is capped at this many chars to bound latency
    pub const TTS_MAX_CHARS: usize = 2000;
    /// Composer fallback answers are capped at this many chars
    pub const FALLBACK_ANSWER_MAX_CHARS: usize = 200;
    /// Clauses shorter than this are skipped by the fallback truncation
    pub const FALLBACK_MIN_CLAUSE_CHARS: usize = 15;
}

/// Analytics defaults
pub mod analytics {
    /// Rollups are recomputed after this long
    pub const DEFAULT_ROLLUP_TTL_MINUTES: i64 = 15;
}
