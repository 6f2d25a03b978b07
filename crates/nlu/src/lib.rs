//! NLU — intent detection and entity extraction
//!
//! Keyword-based for speed; runs locally on the pivot-language (English)
//! text, unlike the remote pipeline collaborators. Deterministic by
//! construction so cached answers stay consistent.

pub mod entities;
pub mod intent;

pub use entities::extract_entities;
pub use intent::{detect_intent, IntentResult};
