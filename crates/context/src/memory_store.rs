//! In-memory turn store
//!
//! Default `TurnStore` when no database is configured, and the store used
//! by tests. Keeps per-user insertion-ordered turn lists.

use agri_voice_core::{ConversationTurn, Result, TurnStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Per-user in-memory turn history
#[derive(Default)]
pub struct MemoryTurnStore {
    turns: DashMap<String, Vec<ConversationTurn>>,
}

impl MemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total persisted turns for a user (test/introspection helper)
    pub fn turn_count(&self, user_id: &str) -> usize {
        self.turns.get(user_id).map(|t| t.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TurnStore for MemoryTurnStore {
    async fn load_recent(&self, user_id: &str, limit: usize) -> Result<Vec<ConversationTurn>> {
        let turns = match self.turns.get(user_id) {
            Some(turns) => turns,
            None => return Ok(Vec::new()),
        };
        // Most recent first, like a DB query ordered by created_at desc
        Ok(turns.iter().rev().take(limit).cloned().collect())
    }

    async fn persist_turn(&self, user_id: &str, turn: &ConversationTurn) -> Result<()> {
        self.turns
            .entry(user_id.to_string())
            .or_default()
            .push(turn.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_load_recent_returns_most_recent_first() {
        let store = MemoryTurnStore::new();
        let now = Utc::now();

        for i in 0..4 {
            store
                .persist_turn(
                    "u1",
                    &ConversationTurn::new(
                        format!("q{i}"),
                        "a",
                        "weather",
                        HashMap::new(),
                        now + Duration::minutes(i),
                        0.9,
                    ),
                )
                .await
                .unwrap();
        }

        let recent = store.load_recent("u1", 2).await.unwrap();
        let inputs: Vec<&str> = recent.iter().map(|t| t.user_input.as_str()).collect();
        assert_eq!(inputs, vec!["q3", "q2"]);
    }

    #[tokio::test]
    async fn test_unknown_user_is_empty() {
        let store = MemoryTurnStore::new();
        assert!(store.load_recent("nobody", 5).await.unwrap().is_empty());
    }
}
