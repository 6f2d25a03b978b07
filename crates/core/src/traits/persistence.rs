//! Turn persistence trait

use crate::conversation::ConversationTurn;
use crate::Result;
use async_trait::async_trait;

/// History persistence for conversation turns
///
/// Assumed eventually consistent, but `load_recent` must return turns in
/// insertion order for the requested window. Load failures are absorbed
/// by the context manager (it starts with an empty context).
#[async_trait]
pub trait TurnStore: Send + Sync + 'static {
    /// Load up to `limit` most recent turns for the user, most recent first
    async fn load_recent(&self, user_id: &str, limit: usize) -> Result<Vec<ConversationTurn>>;

    /// Persist a completed turn (best effort)
    async fn persist_turn(&self, user_id: &str, turn: &ConversationTurn) -> Result<()>;
}
