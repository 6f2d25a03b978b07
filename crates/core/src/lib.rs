//! Core traits and types for the agri voice QA backend
//!
//! This crate provides foundational types used across all other crates:
//! - Collaborator traits for pluggable external services (ASR, TTS,
//!   translation, vector search, answer composition, turn persistence)
//! - Language definitions (11 supported Indian languages + English)
//! - Conversation turn types
//! - Request/result types for the query pipeline
//! - Error types
//! - Clock abstraction for testable time-based logic

pub mod audio;
pub mod clock;
pub mod conversation;
pub mod document;
pub mod error;
pub mod language;
pub mod query;
pub mod traits;

pub use audio::{AudioBlob, AudioRef};
pub use clock::{Clock, ManualClock, SystemClock};
pub use conversation::ConversationTurn;
pub use document::Document;
pub use error::{Error, Result};
pub use language::{Language, LanguageHint};
pub use query::{PipelineRequest, PipelineResult, QueryInput};

pub use traits::{
    AnswerComposer, SpeechToText, TextToSpeech, Transcript, Translation, TranslationSource,
    Translator, TurnStore, VectorSearch,
};
