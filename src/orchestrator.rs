//! Pipeline orchestrator for vidqa.
//!
//! Coordinates transcript acquisition, retrieval and the answer model, and
//! applies the timeouts around the external calls.

use crate::config::{Prompts, Settings};
use crate::error::{Result, VidqaError};
use crate::llm::{AnswerModel, OpenAIAnswerModel, UnconfiguredModel};
use crate::rag::{RagEngine, RagResponse, ScoredChunk};
use crate::transcript::{parse_input, Transcript, TranscriptSource, YoutubeSource};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the question-answering pipeline.
pub struct Orchestrator {
    settings: Settings,
    engine: RagEngine,
}

impl Orchestrator {
    /// Create an orchestrator backed by the OpenAI answer model.
    ///
    /// Without an API key the orchestrator can still fetch and rank
    /// transcripts; answering fails with [`VidqaError::MissingApiKey`].
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let model: Arc<dyn AnswerModel> = match settings.api_key() {
            Ok(api_key) => Arc::new(OpenAIAnswerModel::with_config(
                &api_key,
                settings.answer_timeout(),
                &settings.openai.model,
                settings.openai.max_tokens,
                settings.openai.temperature,
            )?),
            Err(VidqaError::MissingApiKey) => Arc::new(UnconfiguredModel),
            Err(e) => return Err(e),
        };

        Self::with_model(settings, model)
    }

    /// Create an orchestrator with a custom answer model.
    pub fn with_model(settings: Settings, model: Arc<dyn AnswerModel>) -> Result<Self> {
        settings.validate()?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let engine = RagEngine::from_settings(model, &settings, prompts);

        Ok(Self { settings, engine })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the RAG engine.
    pub fn engine(&self) -> &RagEngine {
        &self.engine
    }

    /// Fetch the transcript for a YouTube URL/ID, local file, or `-` (stdin).
    #[instrument(skip(self))]
    pub async fn fetch_transcript(&self, input: &str) -> Result<Transcript> {
        let (source, id) = parse_input(input, &self.settings).ok_or_else(|| {
            VidqaError::InvalidInput(format!("Could not parse input: {}", input))
        })?;

        self.fetch_from(source.as_ref(), &id).await
    }

    /// Fetch a transcript for a YouTube URL or ID only.
    ///
    /// Local paths and `-` are rejected, so callers that take input from the
    /// network cannot read files or stdin on this machine.
    #[instrument(skip(self))]
    pub async fn fetch_youtube_transcript(&self, input: &str) -> Result<Transcript> {
        let source = YoutubeSource::with_config(
            &self.settings.transcript.languages,
            self.settings.temp_dir(),
        );
        let id = source.extract_id(input).ok_or_else(|| {
            VidqaError::InvalidInput(format!("Not a YouTube URL or video ID: {}", input))
        })?;

        self.fetch_from(&source, &id).await
    }

    async fn fetch_from(&self, source: &dyn TranscriptSource, id: &str) -> Result<Transcript> {
        info!("Fetching transcript from {} source", source.source_type());
        let status = with_timeout(
            "Transcript fetch",
            self.settings.transcript_timeout(),
            source.fetch(id),
        )
        .await?;

        let transcript = status.into_result()?;
        info!("Transcript has {} characters", transcript.char_len());
        Ok(transcript)
    }

    /// Answer a question about the video named by `input`.
    #[instrument(skip(self))]
    pub async fn answer(&self, input: &str, question: &str) -> Result<RagResponse> {
        let question = validate_question(question)?;
        let transcript = self.fetch_transcript(input).await?;
        self.answer_question(&transcript, question).await
    }

    /// Answer a question about a transcript the caller already has.
    pub async fn answer_transcript(
        &self,
        transcript: &Transcript,
        question: &str,
    ) -> Result<RagResponse> {
        let question = validate_question(question)?;
        if transcript.is_blank() {
            return Err(VidqaError::TranscriptUnavailable(
                crate::transcript::NO_TRANSCRIPT.to_string(),
            ));
        }
        self.answer_question(transcript, question).await
    }

    /// Select context chunks for a question without calling the model.
    pub fn retrieve(&self, transcript: &Transcript, question: &str) -> Result<Vec<ScoredChunk>> {
        let question = validate_question(question)?;
        self.engine.retrieve(question, transcript)
    }

    /// Rank every chunk of a transcript against a question.
    pub fn rank(&self, transcript: &Transcript, question: &str) -> Result<Vec<ScoredChunk>> {
        let question = validate_question(question)?;
        self.engine.rank(question, transcript)
    }

    async fn answer_question(&self, transcript: &Transcript, question: &str) -> Result<RagResponse> {
        with_timeout(
            "Answer generation",
            self.settings.answer_timeout(),
            self.engine.ask(question, transcript),
        )
        .await
    }
}

/// Trim the question and reject it when nothing is left.
pub fn validate_question(question: &str) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(VidqaError::InvalidInput("Please enter a question".to_string()));
    }
    Ok(question)
}

/// Run `future`, failing with [`VidqaError::Timeout`] if it takes longer than `limit`.
async fn with_timeout<T>(
    operation: &'static str,
    limit: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| VidqaError::Timeout {
            operation,
            seconds: limit.as_secs(),
        })?
}
