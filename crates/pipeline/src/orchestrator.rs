//! Pipeline orchestration
//!
//! Full flow for one request:
//! Audio -> ASR -> Translate(user->en) -> NLU -> Retrieve -> Compose
//! (cache-wrapped) -> Translate(en->user) -> TTS
//!
//! The orchestrator owns its collaborators behind `Arc`s, constructed
//! once at startup; an unconfigured collaborator is a visible `None`
//! checked before use, not a runtime surprise. No shared lock is held
//! across a collaborator call.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use agri_voice_cache::ResponseCache;
use agri_voice_config::constants;
use agri_voice_context::ContextManager;
use agri_voice_core::{
    AnswerComposer, AudioRef, Error, Language, LanguageHint, PipelineRequest,
    PipelineResult, QueryInput, Result, SpeechToText, TextToSpeech, Transcript,
    Translation, TranslationSource, Translator,
};
use agri_voice_nlu::{detect_intent, extract_entities};
use agri_voice_rag::Retriever;

use crate::compose_fallback::fallback_answer;
use crate::stage::PipelineStage;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Documents retrieved per query
    pub top_k: usize,
    /// Synthesis input cap (bounds TTS latency)
    pub tts_max_chars: usize,
    /// Default overall budget per request; a request's own deadline wins
    pub deadline: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: constants::pipeline::DEFAULT_TOP_K,
            tts_max_chars: constants::pipeline::TTS_MAX_CHARS,
            deadline: None,
        }
    }
}

impl From<&agri_voice_config::PipelineSettings> for PipelineConfig {
    fn from(settings: &agri_voice_config::PipelineSettings) -> Self {
        Self {
            top_k: settings.top_k,
            tts_max_chars: settings.tts_max_chars,
            deadline: (settings.deadline_ms > 0)
                .then(|| Duration::from_millis(settings.deadline_ms)),
        }
    }
}

/// Payload cached around the compose stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAnswer {
    /// Composed answer in the pivot language
    pub answer_en: String,
}

/// Transcript sentinel when the ASR collaborator is down; the request
/// still flows so the user gets a spoken explanation instead of a 500.
const ASR_UNAVAILABLE: &str = "Audio transcription service is not available";

/// The query pipeline orchestrator
pub struct QueryPipeline {
    config: PipelineConfig,
    stt: Option<Arc<dyn SpeechToText>>,
    translator: Option<Arc<dyn Translator>>,
    composer: Option<Arc<dyn AnswerComposer>>,
    tts: Option<Arc<dyn TextToSpeech>>,
    retriever: Retriever,
    cache: ResponseCache<CachedAnswer>,
    contexts: Arc<ContextManager>,
}

impl QueryPipeline {
    /// Create a pipeline with no external collaborators configured.
    /// Attach them with the `with_*` builders at startup.
    pub fn new(
        config: PipelineConfig,
        retriever: Retriever,
        cache: ResponseCache<CachedAnswer>,
        contexts: Arc<ContextManager>,
    ) -> Self {
        Self {
            config,
            stt: None,
            translator: None,
            composer: None,
            tts: None,
            retriever,
            cache,
            contexts,
        }
    }

    pub fn with_stt(mut self, stt: Arc<dyn SpeechToText>) -> Self {
        self.stt = Some(stt);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_composer(mut self, composer: Arc<dyn AnswerComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn with_tts(mut self, tts: Arc<dyn TextToSpeech>) -> Self {
        self.tts = Some(tts);
        self
    }

    /// Shared context manager (for sweeps and introspection)
    pub fn contexts(&self) -> &Arc<ContextManager> {
        &self.contexts
    }

    /// Cache statistics
    pub fn cache_stats(&self) -> agri_voice_cache::CacheStats {
        self.cache.stats()
    }

    /// Handle a text query
    pub async fn handle_query(&self, request: PipelineRequest) -> Result<PipelineResult> {
        self.run(request, false).await
    }

    /// Handle a voice query (transcribes first, synthesizes the answer)
    pub async fn handle_voice_query(&self, request: PipelineRequest) -> Result<PipelineResult> {
        self.run(request, true).await
    }

    async fn run(&self, request: PipelineRequest, voice: bool) -> Result<PipelineResult> {
        let started = Instant::now();
        let request_id = Uuid::new_v4();
        let budget = Budget {
            started,
            limit: request.deadline.or(self.config.deadline),
        };
        let mut degraded: Vec<PipelineStage> = Vec::new();

        // The user's selected language governs the whole interaction.
        // For voice, "auto" resolves to the pivot and transcription
        // reports the detected language; for text, "auto" defers to the
        // translator's detection in stage 2.
        let mut target_lang = request.language.resolve(Language::PIVOT);
        debug!(%request_id, stage = %PipelineStage::Received, lang = %target_lang, voice, "query received");

        // Stage 1: transcription (voice only)
        let (query_text, mut detected_language) = match &request.input {
            QueryInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(Error::InvalidInput("query text is empty".into()));
                }
                (text.clone(), target_lang)
            }
            QueryInput::Audio(audio) => {
                if audio.is_empty() {
                    return Err(Error::InvalidInput("audio is empty or failed to upload".into()));
                }
                let transcript = self
                    .transcribe(audio, request.language, &budget, &mut degraded)
                    .await;
                if transcript.text.trim().is_empty() {
                    return Err(Error::InvalidInput("audio produced no transcribable speech".into()));
                }
                let detected = transcript.detected_language.unwrap_or(target_lang);
                (transcript.text, detected)
            }
        };
        debug!(%request_id, stage = %PipelineStage::Transcribing, text = %truncate_for_log(&query_text), "input text ready");

        // Stage 2: translate to the pivot language
        let auto_text = !voice && request.language.is_auto();
        let query_en = if auto_text {
            // Auto-detect: the translator identifies the source language,
            // which becomes the answer's delivery language.
            match self.translate_auto(&query_text, &budget, &mut degraded).await {
                Some(translation) => {
                    let detected = translation.detected_source.unwrap_or(Language::PIVOT);
                    detected_language = detected;
                    target_lang = detected;
                    translation.text
                }
                None => query_text.clone(),
            }
        } else if target_lang != Language::PIVOT {
            self.translate(
                &query_text,
                TranslationSource::Lang(target_lang),
                Language::PIVOT,
                PipelineStage::Translating,
                &budget,
                &mut degraded,
            )
            .await
        } else {
            query_text.clone()
        };
        debug!(%request_id, stage = %PipelineStage::Translating, text = %truncate_for_log(&query_en), "pivot text ready");

        // Stage 3: intent + entities (local, deterministic)
        let intent = detect_intent(&query_en);
        let entities = extract_entities(&query_en);
        debug!(%request_id, stage = %PipelineStage::ClassifyingIntent, intent = %intent.intent, confidence = intent.confidence, "intent classified");

        // Stage 4: retrieval
        let retrieved = match budget
            .run(self.retriever.search(&query_en, self.config.top_k))
            .await
        {
            Some(docs) => docs,
            None => {
                warn!(%request_id, "retrieval deadline elapsed, using built-in knowledge");
                degraded.push(PipelineStage::Retrieving);
                agri_voice_rag::keyword_search(&query_en, self.config.top_k)
            }
        };
        debug!(%request_id, stage = %PipelineStage::Retrieving, count = retrieved.len(), "documents retrieved");

        // Stage 5: compose, wrapped by the response cache
        let retrieved_context: Vec<&str> = retrieved.iter().map(|d| d.text.as_str()).collect();
        let cache_context = retrieved_context.join("\n---\n");

        let (answer_en, cache_hit) =
            match self.cache.get(&query_en, &cache_context, target_lang.code()) {
                Some(cached) => {
                    info!(%request_id, "answer served from cache");
                    (cached.answer_en, true)
                }
                None => {
                    let answer = self
                        .compose(&query_en, &retrieved, &budget, &mut degraded)
                        .await;
                    // Degraded (fallback) answers are not cached: a later
                    // request should retry the composer, not inherit the
                    // truncation for the full TTL.
                    if !degraded.contains(&PipelineStage::Composing) {
                        self.cache.put(
                            &query_en,
                            &cache_context,
                            target_lang.code(),
                            CachedAnswer {
                                answer_en: answer.clone(),
                            },
                        );
                    }
                    (answer, false)
                }
            };

        // Stage 6: translate back to the user's language
        let answer = if target_lang != Language::PIVOT {
            self.translate(
                &answer_en,
                TranslationSource::Lang(Language::PIVOT),
                target_lang,
                PipelineStage::TranslatingBack,
                &budget,
                &mut degraded,
            )
            .await
        } else {
            answer_en.clone()
        };

        // Stage 7: synthesis (voice requests only, capped input)
        let audio = if voice {
            self.synthesize(&answer, target_lang, &budget, &mut degraded)
                .await
        } else {
            None
        };

        // Stage 8: record the turn (pivot-language forms)
        if let Some(user_id) = &request.user_id {
            self.contexts
                .record_turn(
                    user_id,
                    &query_en,
                    &answer_en,
                    &intent.intent,
                    entities.clone(),
                    intent.confidence,
                )
                .await;
        }

        let processing_ms = started.elapsed().as_millis() as u64;
        info!(
            %request_id,
            stage = %PipelineStage::Completed,
            processing_ms,
            cache_hit,
            degraded = degraded.len(),
            "pipeline complete"
        );

        Ok(PipelineResult {
            request_id,
            query_text,
            query_en,
            language: target_lang,
            detected_language,
            intent: intent.intent,
            confidence: intent.confidence,
            entities,
            answer,
            answer_en,
            source_count: retrieved.len(),
            processing_ms,
            cache_hit,
            audio,
            degraded_stages: degraded.iter().map(|s| s.name().to_string()).collect(),
        })
    }

    async fn transcribe(
        &self,
        audio: &agri_voice_core::AudioBlob,
        hint: LanguageHint,
        budget: &Budget,
        degraded: &mut Vec<PipelineStage>,
    ) -> Transcript {
        let stt = match &self.stt {
            Some(stt) => stt,
            None => {
                warn!("no transcription collaborator configured");
                degraded.push(PipelineStage::Transcribing);
                return Transcript {
                    text: ASR_UNAVAILABLE.to_string(),
                    detected_language: Some(Language::PIVOT),
                };
            }
        };

        match budget.run(stt.transcribe(audio, hint)).await {
            Some(Ok(transcript)) => transcript,
            Some(Err(e)) => {
                warn!(error = %e, engine = stt.engine_name(), "transcription failed");
                degraded.push(PipelineStage::Transcribing);
                Transcript {
                    text: ASR_UNAVAILABLE.to_string(),
                    detected_language: Some(Language::PIVOT),
                }
            }
            None => {
                warn!(engine = stt.engine_name(), "transcription deadline elapsed");
                degraded.push(PipelineStage::Transcribing);
                Transcript {
                    text: ASR_UNAVAILABLE.to_string(),
                    detected_language: Some(Language::PIVOT),
                }
            }
        }
    }

    /// Translate with the degraded-to-original fallback shared by both
    /// translation stages.
    async fn translate(
        &self,
        text: &str,
        source: TranslationSource,
        target: Language,
        stage: PipelineStage,
        budget: &Budget,
        degraded: &mut Vec<PipelineStage>,
    ) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        // Identity translations short-circuit before the collaborator
        if let TranslationSource::Lang(lang) = source {
            if lang == target {
                return text.to_string();
            }
        }

        let translator = match &self.translator {
            Some(translator) => translator,
            None => {
                warn!(stage = %stage, "no translation collaborator configured");
                degraded.push(stage);
                return text.to_string();
            }
        };

        match budget.run(translator.translate(text, source, target)).await {
            Some(Ok(translation)) if !translation.text.trim().is_empty() => translation.text,
            Some(Ok(_)) => {
                debug!(stage = %stage, "translator returned empty text, keeping original");
                degraded.push(stage);
                text.to_string()
            }
            Some(Err(e)) => {
                warn!(stage = %stage, error = %e, "translation failed, keeping original");
                degraded.push(stage);
                text.to_string()
            }
            None => {
                warn!(stage = %stage, "translation deadline elapsed, keeping original");
                degraded.push(stage);
                text.to_string()
            }
        }
    }

    /// Auto-detect the source language and translate to the pivot.
    /// `None` means the caller keeps the original text (and the pivot as
    /// the delivery language); the degraded mark is recorded here.
    async fn translate_auto(
        &self,
        text: &str,
        budget: &Budget,
        degraded: &mut Vec<PipelineStage>,
    ) -> Option<Translation> {
        let translator = match &self.translator {
            Some(translator) => translator,
            None => {
                warn!("no translation collaborator configured for language detection");
                degraded.push(PipelineStage::Translating);
                return None;
            }
        };

        match budget
            .run(translator.translate(text, TranslationSource::Auto, Language::PIVOT))
            .await
        {
            Some(Ok(translation)) if !translation.text.trim().is_empty() => Some(translation),
            Some(Ok(_)) => {
                debug!("translator returned empty text, keeping original");
                degraded.push(PipelineStage::Translating);
                None
            }
            Some(Err(e)) => {
                warn!(error = %e, "auto-detect translation failed, keeping original");
                degraded.push(PipelineStage::Translating);
                None
            }
            None => {
                warn!("auto-detect translation deadline elapsed, keeping original");
                degraded.push(PipelineStage::Translating);
                None
            }
        }
    }

    async fn compose(
        &self,
        question: &str,
        retrieved: &[agri_voice_core::Document],
        budget: &Budget,
        degraded: &mut Vec<PipelineStage>,
    ) -> String {
        let composer = match &self.composer {
            Some(composer) => composer,
            None => {
                warn!("no composition collaborator configured, using truncation fallback");
                degraded.push(PipelineStage::Composing);
                return fallback_answer(retrieved);
            }
        };

        match budget.run(composer.compose(question, retrieved)).await {
            Some(Ok(answer)) if !answer.trim().is_empty() => answer,
            Some(Ok(_)) => {
                warn!("composer returned an empty answer, using truncation fallback");
                degraded.push(PipelineStage::Composing);
                fallback_answer(retrieved)
            }
            Some(Err(e)) => {
                warn!(error = %e, "composition failed, using truncation fallback");
                degraded.push(PipelineStage::Composing);
                fallback_answer(retrieved)
            }
            None => {
                warn!("composition deadline elapsed, using truncation fallback");
                degraded.push(PipelineStage::Composing);
                fallback_answer(retrieved)
            }
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        lang: Language,
        budget: &Budget,
        degraded: &mut Vec<PipelineStage>,
    ) -> Option<AudioRef> {
        if text.trim().is_empty() {
            return None;
        }
        let tts = self.tts.as_ref()?;

        let capped: String = if text.chars().count() > self.config.tts_max_chars {
            let mut truncated: String = text.chars().take(self.config.tts_max_chars).collect();
            truncated.push_str("...");
            truncated
        } else {
            text.to_string()
        };

        match budget.run(tts.synthesize(&capped, lang)).await {
            Some(Ok(audio)) => Some(audio),
            Some(Err(e)) => {
                warn!(error = %e, lang = %lang, "speech synthesis failed, returning text only");
                degraded.push(PipelineStage::Synthesizing);
                None
            }
            None => {
                warn!(lang = %lang, "synthesis deadline elapsed, returning text only");
                degraded.push(PipelineStage::Synthesizing);
                None
            }
        }
    }

}

/// Remaining-time budget for collaborator calls
struct Budget {
    started: Instant,
    limit: Option<Duration>,
}

impl Budget {
    /// Run a collaborator future under the remaining budget.
    /// `None` means the deadline elapsed; callers take the fallback path.
    async fn run<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        match self.limit {
            None => Some(fut.await),
            Some(limit) => {
                let remaining = limit.saturating_sub(self.started.elapsed());
                if remaining.is_zero() {
                    return None;
                }
                tokio::time::timeout(remaining, fut).await.ok()
            }
        }
    }
}

fn truncate_for_log(text: &str) -> String {
    text.chars().take(60).collect()
}
