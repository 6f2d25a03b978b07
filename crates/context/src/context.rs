//! Per-user conversation context
//!
//! A bounded ring of recent turns (oldest first) plus the digest
//! operations the pipeline uses for prompt enrichment.

use std::collections::HashMap;

use agri_voice_config::constants::context::SUMMARY_ANSWER_CHARS;
use agri_voice_core::ConversationTurn;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Phrases that mark a question as a likely follow-up.
///
/// Deliberately coarse: single-word indicators like "and"/"how"/"why"
/// match almost any question containing that word. This mirrors the
/// observed production behavior and is not a precision classifier.
const FOLLOW_UP_INDICATORS: &[&str] = &[
    "what about",
    "how about",
    "and",
    "also",
    "more",
    "tell me more",
    "explain",
    "why",
    "how",
    "when",
    "where",
    "can you",
    "what if",
];

/// Analytics digest of a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub total_turns: usize,
    /// Distinct intents across all held turns, in first-seen order
    pub topics: Vec<String>,
    /// Minutes between the first and last turn; 0 with fewer than 2 turns
    pub duration_minutes: f64,
    /// Mean confidence across turns; 0 with no turns
    pub avg_confidence: f32,
}

/// Rolling conversation memory for one user.
///
/// Holds at most `max_turns` turns in chronological order (oldest first);
/// adding beyond the bound evicts from the front.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    user_id: String,
    max_turns: usize,
    history: Vec<ConversationTurn>,
}

impl ConversationContext {
    pub fn new(user_id: impl Into<String>, max_turns: usize) -> Self {
        Self {
            user_id: user_id.into(),
            max_turns,
            history: Vec::new(),
        }
    }

    /// Build from already window-filtered history in chronological order
    pub fn from_history(
        user_id: impl Into<String>,
        max_turns: usize,
        history: Vec<ConversationTurn>,
    ) -> Self {
        let mut ctx = Self::new(user_id, max_turns);
        for turn in history {
            ctx.add_turn(turn);
        }
        ctx
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Timestamp of the most recent turn
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.history.last().map(|turn| turn.timestamp)
    }

    /// Append a turn, evicting from the front past `max_turns`
    pub fn add_turn(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
        while self.history.len() > self.max_turns {
            self.history.remove(0);
        }
    }

    /// Short human-readable digest for prompt enrichment: recent topics,
    /// plus the previous question and truncated previous answer when at
    /// least two turns exist. Empty string with no turns.
    pub fn context_summary(&self) -> String {
        if self.history.is_empty() {
            return String::new();
        }

        let mut parts = Vec::new();

        let recent_start = self.history.len().saturating_sub(3);
        let recent_intents = distinct(self.history[recent_start..].iter().map(|t| t.intent.as_str()));
        if !recent_intents.is_empty() {
            parts.push(format!("Recent topics: {}", recent_intents.join(", ")));
        }

        if self.history.len() >= 2 {
            let prev = &self.history[self.history.len() - 2];
            parts.push(format!("Previous question: {}", prev.user_input));
            let truncated: String = prev.ai_response.chars().take(SUMMARY_ANSWER_CHARS).collect();
            parts.push(format!("Previous answer: {truncated}..."));
        }

        parts.join(" | ")
    }

    /// Whether `current_input` looks like a follow-up to this conversation.
    /// Always false on an empty context.
    pub fn is_follow_up(&self, current_input: &str) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let lower = current_input.to_lowercase();
        FOLLOW_UP_INDICATORS
            .iter()
            .any(|indicator| lower.contains(indicator))
    }

    /// Union of entity values across all turns, de-duplicated per type.
    /// Values are sorted for deterministic output.
    pub fn related_entities(&self) -> HashMap<String, Vec<String>> {
        let mut all: HashMap<String, Vec<String>> = HashMap::new();

        for turn in &self.history {
            for (entity_type, values) in &turn.entities {
                let bucket = all.entry(entity_type.clone()).or_default();
                for value in values {
                    if !bucket.contains(value) {
                        bucket.push(value.clone());
                    }
                }
            }
        }

        for bucket in all.values_mut() {
            bucket.sort();
        }
        all
    }

    /// Analytics digest of the whole held history
    pub fn summary(&self) -> ConversationSummary {
        if self.history.is_empty() {
            return ConversationSummary {
                total_turns: 0,
                topics: Vec::new(),
                duration_minutes: 0.0,
                avg_confidence: 0.0,
            };
        }

        let topics = distinct(self.history.iter().map(|t| t.intent.as_str()))
            .into_iter()
            .map(String::from)
            .collect();

        let duration_minutes = if self.history.len() > 1 {
            let start = self.history[0].timestamp;
            let end = self.history[self.history.len() - 1].timestamp;
            round2((end - start).num_seconds() as f64 / 60.0)
        } else {
            0.0
        };

        let avg_confidence =
            self.history.iter().map(|t| t.confidence).sum::<f32>() / self.history.len() as f32;

        ConversationSummary {
            total_turns: self.history.len(),
            topics,
            duration_minutes,
            avg_confidence,
        }
    }
}

/// First-seen-order de-duplication
fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
