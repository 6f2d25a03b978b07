//! Context registry service
//!
//! Owns the process-wide map of per-user contexts with an injected
//! persistence collaborator and clock, constructed once at startup and
//! passed by reference to the orchestrator. Contexts are created lazily
//! on first access, loading recent history from the store; creation is
//! race-free (at most one context object per user), and mutation is
//! serialized per user by the context's own mutex. No lock is held
//! across a store call.

use std::collections::HashMap;
use std::sync::Arc;

use agri_voice_core::{Clock, ConversationTurn, TurnStore};
use chrono::Duration;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::context::ConversationContext;

/// Context manager configuration
#[derive(Debug, Clone)]
pub struct ContextManagerConfig {
    /// Rolling window of turns kept per user
    pub max_turns: usize,
    /// Only persisted turns this recent are restored at construction
    pub window_hours: i64,
}

impl Default for ContextManagerConfig {
    fn default() -> Self {
        Self {
            max_turns: 5,
            window_hours: 24,
        }
    }
}

/// Process-wide registry of per-user conversation contexts
pub struct ContextManager {
    config: ContextManagerConfig,
    contexts: DashMap<String, Arc<Mutex<ConversationContext>>>,
    store: Arc<dyn TurnStore>,
    clock: Arc<dyn Clock>,
}

impl ContextManager {
    pub fn new(
        config: ContextManagerConfig,
        store: Arc<dyn TurnStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            contexts: DashMap::new(),
            store,
            clock,
        }
    }

    /// Get or lazily create the context for a user.
    ///
    /// First access loads up to `max_turns` recent turns from the store,
    /// keeps only those inside the context window, and restores them in
    /// chronological order. A load failure starts an empty context; it
    /// never blocks the pipeline.
    pub async fn get(&self, user_id: &str) -> Arc<Mutex<ConversationContext>> {
        if let Some(existing) = self.contexts.get(user_id) {
            return Arc::clone(&existing);
        }

        let loaded = self.load_context(user_id).await;

        // Under concurrent first access both tasks load, but the entry
        // API guarantees only one context object ends up registered.
        let entry = self
            .contexts
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(loaded)));
        Arc::clone(&entry)
    }

    /// Append a completed turn to the user's context and persist it
    /// (best effort; persistence failure is logged, not surfaced).
    pub async fn record_turn(
        &self,
        user_id: &str,
        user_input: &str,
        ai_response: &str,
        intent: &str,
        entities: HashMap<String, Vec<String>>,
        confidence: f32,
    ) {
        let turn = ConversationTurn::new(
            user_input,
            ai_response,
            intent,
            entities,
            self.clock.now(),
            confidence,
        );

        let context = self.get(user_id).await;
        context.lock().add_turn(turn.clone());

        if let Err(e) = self.store.persist_turn(user_id, &turn).await {
            warn!(user_id, error = %e, "failed to persist conversation turn");
        }
    }

    /// Remove every context whose most recent turn is older than
    /// `max_age`. Contexts with no turns are never swept by this rule.
    pub fn sweep_inactive(&self, max_age: Duration) {
        let cutoff = self.clock.now() - max_age;
        let before = self.contexts.len();

        self.contexts.retain(|_, context| match context.lock().last_activity() {
            Some(last) => last >= cutoff,
            None => true,
        });

        let swept = before.saturating_sub(self.contexts.len());
        debug!(swept, "swept inactive conversation contexts");
    }

    /// Number of registered contexts
    pub fn active_count(&self) -> usize {
        self.contexts.len()
    }

    async fn load_context(&self, user_id: &str) -> ConversationContext {
        let recent = match self.store.load_recent(user_id, self.config.max_turns).await {
            Ok(turns) => turns,
            Err(e) => {
                warn!(user_id, error = %e, "failed to load conversation history, starting empty");
                Vec::new()
            }
        };

        let cutoff = self.clock.now() - Duration::hours(self.config.window_hours);
        // Store returns most recent first; reverse into chronological
        // order and drop turns outside the context window.
        let history: Vec<ConversationTurn> = recent
            .into_iter()
            .rev()
            .filter(|turn| turn.timestamp > cutoff)
            .collect();

        ConversationContext::from_history(user_id, self.config.max_turns, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryTurnStore;
    use agri_voice_core::{Error, ManualClock, Result};
    use async_trait::async_trait;
    use chrono::Utc;

    struct FailingStore;

    #[async_trait]
    impl TurnStore for FailingStore {
        async fn load_recent(&self, _user_id: &str, _limit: usize) -> Result<Vec<ConversationTurn>> {
            Err(Error::Persistence("connection refused".into()))
        }

        async fn persist_turn(&self, _user_id: &str, _turn: &ConversationTurn) -> Result<()> {
            Err(Error::Persistence("connection refused".into()))
        }
    }

    fn manager_with(
        store: Arc<dyn TurnStore>,
        clock: Arc<ManualClock>,
    ) -> ContextManager {
        ContextManager::new(ContextManagerConfig::default(), store, clock)
    }

    #[tokio::test]
    async fn test_same_context_object_per_user() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager_with(Arc::new(MemoryTurnStore::new()), clock);

        let a = manager.get("u1").await;
        let b = manager.get("u1").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(manager.active_count(), 1);
    }

    #[tokio::test]
    async fn test_user_isolation() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager_with(Arc::new(MemoryTurnStore::new()), clock);

        manager
            .record_turn("alice", "how to grow rice", "use good soil", "crop_advice", HashMap::new(), 0.9)
            .await;
        manager
            .record_turn("bob", "onion mandi price", "around 20/kg", "market_query", HashMap::new(), 0.8)
            .await;

        let alice = manager.get("alice").await;
        let bob = manager.get("bob").await;

        let alice_inputs: Vec<String> = alice.lock().history().iter().map(|t| t.user_input.clone()).collect();
        let bob_inputs: Vec<String> = bob.lock().history().iter().map(|t| t.user_input.clone()).collect();

        assert_eq!(alice_inputs, vec!["how to grow rice"]);
        assert_eq!(bob_inputs, vec!["onion mandi price"]);
    }

    #[tokio::test]
    async fn test_restores_recent_history_in_chronological_order() {
        let clock = Arc::new(ManualClock::starting_now());
        let store = Arc::new(MemoryTurnStore::new());
        let now = clock.now();

        for (i, age_hours) in [(0, 3), (1, 2), (2, 1)] {
            store
                .persist_turn(
                    "u1",
                    &ConversationTurn::new(
                        format!("q{i}"),
                        "a",
                        "crop_advice",
                        HashMap::new(),
                        now - Duration::hours(age_hours),
                        0.9,
                    ),
                )
                .await
                .unwrap();
        }

        let manager = manager_with(store, clock);
        let context = manager.get("u1").await;
        let inputs: Vec<String> = context.lock().history().iter().map(|t| t.user_input.clone()).collect();
        assert_eq!(inputs, vec!["q0", "q1", "q2"]);
    }

    #[tokio::test]
    async fn test_window_filters_old_turns_on_load() {
        let clock = Arc::new(ManualClock::starting_now());
        let store = Arc::new(MemoryTurnStore::new());
        let now = clock.now();

        store
            .persist_turn(
                "u1",
                &ConversationTurn::new("ancient", "a", "weather", HashMap::new(), now - Duration::hours(30), 0.9),
            )
            .await
            .unwrap();
        store
            .persist_turn(
                "u1",
                &ConversationTurn::new("recent", "a", "weather", HashMap::new(), now - Duration::hours(1), 0.9),
            )
            .await
            .unwrap();

        let manager = manager_with(store, clock);
        let context = manager.get("u1").await;
        let inputs: Vec<String> = context.lock().history().iter().map(|t| t.user_input.clone()).collect();
        assert_eq!(inputs, vec!["recent"]);
    }

    #[tokio::test]
    async fn test_load_failure_starts_empty() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager_with(Arc::new(FailingStore), clock);

        let context = manager.get("u1").await;
        assert!(context.lock().is_empty());

        // Persist failure is absorbed too
        manager
            .record_turn("u1", "q", "a", "weather", HashMap::new(), 0.9)
            .await;
        assert_eq!(manager.get("u1").await.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_inactive_removes_idle_contexts() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager_with(Arc::new(MemoryTurnStore::new()), clock.clone());

        manager
            .record_turn("idle", "q", "a", "weather", HashMap::new(), 0.9)
            .await;

        clock.advance(Duration::hours(3));
        manager
            .record_turn("active", "q", "a", "weather", HashMap::new(), 0.9)
            .await;

        manager.sweep_inactive(Duration::hours(2));
        assert_eq!(manager.active_count(), 1);
        assert!(manager.get("active").await.lock().len() == 1);
    }

    #[tokio::test]
    async fn test_sweep_never_touches_empty_contexts() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager_with(Arc::new(MemoryTurnStore::new()), clock.clone());

        manager.get("empty-user").await;
        clock.advance(Duration::hours(48));
        manager.sweep_inactive(Duration::hours(2));

        assert_eq!(manager.active_count(), 1);
    }

    #[tokio::test]
    async fn test_bounding_applies_when_recording() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = manager_with(Arc::new(MemoryTurnStore::new()), clock.clone());

        for i in 0..8 {
            manager
                .record_turn("u1", &format!("q{i}"), "a", "weather", HashMap::new(), 0.9)
                .await;
            clock.advance(Duration::minutes(1));
        }

        let context = manager.get("u1").await;
        let inputs: Vec<String> = context.lock().history().iter().map(|t| t.user_input.clone()).collect();
        assert_eq!(inputs, vec!["q3", "q4", "q5", "q6", "q7"]);
    }
}
