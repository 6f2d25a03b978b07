//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{analytics, cache, context, pipeline};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheSettings,

    /// Conversation context configuration
    #[serde(default)]
    pub context: ContextSettings,

    /// Pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Directory for the disk tier (one file per fingerprint)
    #[serde(default = "default_cache_dir")]
    pub dir: String,

    /// Entry time-to-live in hours
    #[serde(default = "default_cache_ttl_hours")]
    pub ttl_hours: i64,
}

fn default_cache_dir() -> String {
    cache::DEFAULT_DIR.to_string()
}

fn default_cache_ttl_hours() -> i64 {
    cache::DEFAULT_TTL_HOURS
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            ttl_hours: default_cache_ttl_hours(),
        }
    }
}

/// Conversation context settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Rolling window of turns kept per user
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Only persisted turns this recent are restored at construction
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,

    /// Contexts idle longer than this are swept
    #[serde(default = "default_inactive_sweep_hours")]
    pub inactive_sweep_hours: i64,
}

fn default_max_turns() -> usize {
    context::DEFAULT_MAX_TURNS
}

fn default_window_hours() -> i64 {
    context::DEFAULT_WINDOW_HOURS
}

fn default_inactive_sweep_hours() -> i64 {
    context::DEFAULT_INACTIVE_SWEEP_HOURS
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            window_hours: default_window_hours(),
            inactive_sweep_hours: default_inactive_sweep_hours(),
        }
    }
}

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Documents retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Synthesis input cap in chars (bounds TTS latency)
    #[serde(default = "default_tts_max_chars")]
    pub tts_max_chars: usize,

    /// Per-request overall deadline in milliseconds (0 = none)
    #[serde(default)]
    pub deadline_ms: u64,
}

fn default_top_k() -> usize {
    pipeline::DEFAULT_TOP_K
}

fn default_tts_max_chars() -> usize {
    pipeline::TTS_MAX_CHARS
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            tts_max_chars: default_tts_max_chars(),
            deadline_ms: 0,
        }
    }
}

/// Analytics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Rollup cache TTL in minutes
    #[serde(default = "default_rollup_ttl_minutes")]
    pub rollup_ttl_minutes: i64,
}

fn default_rollup_ttl_minutes() -> i64 {
    analytics::DEFAULT_ROLLUP_TTL_MINUTES
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            rollup_ttl_minutes: default_rollup_ttl_minutes(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file layered with
    /// `AGRI_VOICE_`-prefixed environment variables
    /// (e.g. `AGRI_VOICE_CACHE__TTL_HOURS=48`).
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("AGRI_VOICE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?.try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would make the system misbehave silently
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "cache.ttl_hours must be positive".into(),
            ));
        }
        if self.context.max_turns == 0 {
            return Err(ConfigError::Invalid(
                "context.max_turns must be at least 1".into(),
            ));
        }
        if self.pipeline.top_k == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.top_k must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.cache.ttl_hours, 24);
        assert_eq!(settings.context.max_turns, 5);
        assert_eq!(settings.pipeline.top_k, 5);
        assert_eq!(settings.pipeline.tts_max_chars, 2000);
        assert_eq!(settings.analytics.rollup_ttl_minutes, 15);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert_eq!(settings.context.window_hours, 24);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[cache]\nttl_hours = 48\n\n[context]\nmax_turns = 10").unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.cache.ttl_hours, 48);
        assert_eq!(settings.context.max_turns, 10);
        // Untouched sections keep defaults
        assert_eq!(settings.pipeline.top_k, 5);
    }

    #[test]
    fn test_validation_rejects_zero_turns() {
        let mut settings = Settings::default();
        settings.context.max_turns = 0;
        assert!(settings.validate().is_err());
    }
}
