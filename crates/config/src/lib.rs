//! Configuration for the agri voice QA backend
//!
//! Settings load from an optional TOML file layered with
//! `AGRI_VOICE_`-prefixed environment variables. Defaults live in
//! `constants` so code and config agree on one source of truth.

pub mod constants;
pub mod observability;
pub mod settings;

pub use observability::init_tracing;
pub use settings::{
    AnalyticsSettings, CacheSettings, ContextSettings, PipelineSettings, Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
