//! Collaborator traits
//!
//! Every expensive capability (ASR, translation, vector search, answer
//! composition, TTS, turn persistence) is an external collaborator behind
//! a narrow async contract. The pipeline treats each as potentially slow
//! and potentially failing.

mod compose;
mod persistence;
mod retrieve;
mod speech;
mod translate;

pub use compose::AnswerComposer;
pub use persistence::TurnStore;
pub use retrieve::VectorSearch;
pub use speech::{SpeechToText, TextToSpeech, Transcript};
pub use translate::{Translation, TranslationSource, Translator};
