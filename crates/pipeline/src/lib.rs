//! Query pipeline orchestrator
//!
//! Sequences the stages of a voice or text query — transcription,
//! translation to the pivot language, intent classification, retrieval,
//! answer composition, translation back, speech synthesis — and applies
//! the response cache around the expensive middle. Each external stage
//! is a collaborator behind a core trait; every collaborator failure has
//! a degraded fallback, and only unusable input is surfaced to the
//! caller as an error.

pub mod compose_fallback;
pub mod orchestrator;
pub mod stage;

pub use compose_fallback::fallback_answer;
pub use orchestrator::{CachedAnswer, PipelineConfig, QueryPipeline};
pub use stage::PipelineStage;
