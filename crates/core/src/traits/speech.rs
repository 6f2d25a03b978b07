//! Speech processing traits

use crate::audio::{AudioBlob, AudioRef};
use crate::language::{Language, LanguageHint};
use crate::Result;
use async_trait::async_trait;

/// Result of transcribing an audio blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    /// Language the engine detected, if it reports one
    pub detected_language: Option<Language>,
}

/// Speech-to-Text interface
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(WhisperStt::new(config));
/// let transcript = stt.transcribe(&blob, LanguageHint::Auto).await?;
/// println!("Transcribed: {}", transcript.text);
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe an audio blob
    ///
    /// # Arguments
    /// * `audio` - Uploaded audio bytes
    /// * `hint` - Declared language, forced onto the engine when concrete
    ///
    /// # Returns
    /// Transcript text plus the detected language when the engine reports one
    async fn transcribe(&self, audio: &AudioBlob, hint: LanguageHint) -> Result<Transcript>;

    /// Engine name for logging
    fn engine_name(&self) -> &str;
}

/// Text-to-Speech interface
///
/// Synthesis failures are never fatal: the pipeline returns a text-only
/// answer when audio cannot be produced.
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Synthesize text in the given language, returning a reference to
    /// the generated audio (relative URL or storage path)
    async fn synthesize(&self, text: &str, lang: Language) -> Result<AudioRef>;
}
