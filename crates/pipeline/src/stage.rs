//! Pipeline stage state machine
//!
//! A request moves through these stages in order; optional stages are
//! skipped, and any stage may degrade (continue on its fallback path)
//! rather than fail. Only a request with no usable input fails outright.

use std::fmt;

/// Stages of a single pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    /// Voice requests only
    Transcribing,
    /// User language -> pivot language
    Translating,
    ClassifyingIntent,
    Retrieving,
    /// Cache check, then compose on miss
    Composing,
    /// Pivot language -> user language
    TranslatingBack,
    /// Voice requests only
    Synthesizing,
    Completed,
}

impl PipelineStage {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Transcribing => "transcribing",
            PipelineStage::Translating => "translating",
            PipelineStage::ClassifyingIntent => "classifying_intent",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Composing => "composing",
            PipelineStage::TranslatingBack => "translating_back",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Completed => "completed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
