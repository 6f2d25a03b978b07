//! Conversation turn types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One question/answer exchange in a user's conversation.
///
/// Turns are owned exclusively by a single user's context and are never
/// shared across users. `user_input` and `ai_response` are stored in the
/// pivot language (English) since that is what prompt enrichment consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_input: String,
    pub ai_response: String,
    /// Intent label from classification ("unknown" when not classified)
    pub intent: String,
    /// Extracted entities by type (e.g. "crops" -> ["rice", "wheat"])
    pub entities: HashMap<String, Vec<String>>,
    pub timestamp: DateTime<Utc>,
    /// Classification confidence in [0, 1]
    pub confidence: f32,
}

impl ConversationTurn {
    pub fn new(
        user_input: impl Into<String>,
        ai_response: impl Into<String>,
        intent: impl Into<String>,
        entities: HashMap<String, Vec<String>>,
        timestamp: DateTime<Utc>,
        confidence: f32,
    ) -> Self {
        Self {
            user_input: user_input.into(),
            ai_response: ai_response.into(),
            intent: intent.into(),
            entities,
            timestamp,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
