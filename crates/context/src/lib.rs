//! Conversation context management
//!
//! Gives the pipeline a short rolling memory per user so follow-up
//! questions can be recognized and prompts enriched without re-querying
//! full history every turn. One bounded context per user, held in a
//! process-wide registry service with an injected persistence
//! collaborator and clock.

pub mod context;
pub mod manager;
pub mod memory_store;

pub use context::{ConversationContext, ConversationSummary};
pub use manager::{ContextManager, ContextManagerConfig};
pub use memory_store::MemoryTurnStore;

use thiserror::Error;

/// Context errors
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context load error: {0}")]
    Load(String),
}

impl From<ContextError> for agri_voice_core::Error {
    fn from(err: ContextError) -> Self {
        agri_voice_core::Error::Context(err.to_string())
    }
}
