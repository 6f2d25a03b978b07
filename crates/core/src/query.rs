//! Pipeline request and result types
//!
//! Transient per-request records; nothing here is persisted by the core.

use crate::audio::{AudioBlob, AudioRef};
use crate::language::{Language, LanguageHint};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Raw request input: text, or audio to be transcribed first
#[derive(Debug, Clone)]
pub enum QueryInput {
    Text(String),
    Audio(AudioBlob),
}

/// An inbound voice or text query
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: QueryInput,
    /// Declared language, or auto-detect
    pub language: LanguageHint,
    /// User identity for conversation context; anonymous when absent
    pub user_id: Option<String>,
    /// Optional overall budget; elapsed stages take their fallback path
    pub deadline: Option<Duration>,
}

impl PipelineRequest {
    pub fn text(text: impl Into<String>, language: LanguageHint) -> Self {
        Self {
            input: QueryInput::Text(text.into()),
            language,
            user_id: None,
            deadline: None,
        }
    }

    pub fn voice(audio: AudioBlob, language: LanguageHint) -> Self {
        Self {
            input: QueryInput::Audio(audio),
            language,
            user_id: None,
            deadline: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// The assembled outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub request_id: Uuid,
    /// Transcribed or original query text, in the user's language
    pub query_text: String,
    /// Pivot-language (English) form of the query
    pub query_en: String,
    /// Language the answer was delivered in
    pub language: Language,
    /// Language reported by transcription/translation (falls back to the
    /// declared language when the collaborator does not report one)
    pub detected_language: Language,
    pub intent: String,
    pub confidence: f32,
    pub entities: HashMap<String, Vec<String>>,
    /// Answer in the user's language
    pub answer: String,
    /// Pivot-language form of the answer
    pub answer_en: String,
    /// Number of retrieved source documents
    pub source_count: usize,
    /// Wall-clock processing time for the whole pipeline
    pub processing_ms: u64,
    /// Whether the composed answer came from the cache
    pub cache_hit: bool,
    /// Synthesized audio, when requested and successful
    pub audio: Option<AudioRef>,
    /// Names of stages that fell back to a degraded path
    pub degraded_stages: Vec<String>,
}
