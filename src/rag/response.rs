//! RAG response generation.

use super::context::{join_context, ContextBuilder, ScoredChunk, CONTEXT_SEPARATOR};
use crate::chunking::{chunk_text, ChunkingConfig};
use crate::config::{Prompts, Settings};
use crate::error::{Result, VidqaError};
use crate::llm::AnswerModel;
use crate::transcript::Transcript;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering over a single transcript.
pub struct RagEngine {
    model: Arc<dyn AnswerModel>,
    chunking: ChunkingConfig,
    context_builder: ContextBuilder,
    prompts: Prompts,
    separator: String,
}

impl RagEngine {
    /// Create a new RAG engine with default chunking and retrieval.
    pub fn new(model: Arc<dyn AnswerModel>) -> Self {
        Self {
            model,
            chunking: ChunkingConfig::default(),
            context_builder: ContextBuilder::new(),
            prompts: Prompts::default(),
            separator: CONTEXT_SEPARATOR.to_string(),
        }
    }

    /// Create a RAG engine configured from settings.
    pub fn from_settings(model: Arc<dyn AnswerModel>, settings: &Settings, prompts: Prompts) -> Self {
        Self::new(model)
            .with_chunking(settings.chunking_config())
            .with_context_builder(ContextBuilder::new().with_config(settings.retrieval_config()))
            .with_separator(&settings.retrieval.separator)
            .with_prompts(prompts)
    }

    /// Set chunking parameters.
    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    /// Set the context builder (scorer and limits).
    pub fn with_context_builder(mut self, context_builder: ContextBuilder) -> Self {
        self.context_builder = context_builder;
        self
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the separator placed between context chunks.
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Chunk the transcript and rank every chunk against the question.
    pub fn rank(&self, question: &str, transcript: &Transcript) -> Result<Vec<ScoredChunk>> {
        let chunks = chunk_text(&transcript.text, &self.chunking)?;
        Ok(self.context_builder.rank(question, &chunks))
    }

    /// Chunk the transcript and select the context for the question.
    pub fn retrieve(&self, question: &str, transcript: &Transcript) -> Result<Vec<ScoredChunk>> {
        let chunks = chunk_text(&transcript.text, &self.chunking)?;
        debug!("Split transcript {} into {} chunks", transcript.id, chunks.len());
        Ok(self.context_builder.select(question, &chunks))
    }

    /// Ask a question about a transcript and get a response.
    ///
    /// Fails with [`VidqaError::NoRelevantContent`] without calling the model
    /// when no chunk is relevant enough.
    #[instrument(skip(self, transcript), fields(question = %question, transcript = %transcript.id))]
    pub async fn ask(&self, question: &str, transcript: &Transcript) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        let sources = self.retrieve(question, transcript)?;
        if sources.is_empty() {
            return Err(VidqaError::NoRelevantContent);
        }

        let texts: Vec<&str> = sources.iter().map(|s| s.text.as_str()).collect();
        let context = join_context(&texts, &self.separator);
        let (system, user) = self.prompts.render_answer(question, &context);

        let answer = self.model.answer(&system, &user).await?;

        debug!(
            "Generated response with {} sources using {}",
            sources.len(),
            self.model.model_name()
        );

        Ok(RagResponse { answer, sources })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks used as context, in the order they were given to the model.
    pub sources: Vec<ScoredChunk>,
}

impl RagResponse {
    /// Approximate tokens of context sent with the question.
    pub fn context_tokens(&self) -> usize {
        self.sources.iter().map(ScoredChunk::tokens).sum()
    }

    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\nchunk #{} (score: {:.2})",
                    source.index + 1,
                    source.score
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and replies with a canned answer.
    struct RecordingModel {
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingModel {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AnswerModel for RecordingModel {
        async fn answer(&self, system: &str, user: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            Ok("The cat is black.".to_string())
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn engine(model: Arc<RecordingModel>) -> RagEngine {
        RagEngine::new(model).with_chunking(ChunkingConfig::new(16, 0))
    }

    #[tokio::test]
    async fn test_ask_sends_question_and_context() {
        let model = RecordingModel::new();
        let transcript = Transcript::inline("the cat is black dogs bark loudly color theory ok");

        let response = engine(model.clone())
            .ask("what color is the cat", &transcript)
            .await
            .unwrap();

        assert_eq!(response.answer, "The cat is black.");
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.sources[0].text, "the cat is black");

        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (system, user) = &calls[0];
        assert_eq!(system, "Answer the question using only the provided video context:");
        assert!(user.starts_with("QUESTION: what color is the cat\n\nCONTEXT:\n"));
        assert!(user.contains("the cat is black\n\n[...CONTEXT BREAK...]\n\n"));
    }

    #[tokio::test]
    async fn test_no_relevant_content_skips_model() {
        let model = RecordingModel::new();
        let transcript = Transcript::inline("nothing about felines here");

        let err = engine(model.clone())
            .ask("what color is the cat", &transcript)
            .await
            .unwrap_err();

        assert!(matches!(err, VidqaError::NoRelevantContent));
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_chunking_is_reported() {
        let model = RecordingModel::new();
        let engine = RagEngine::new(model).with_chunking(ChunkingConfig::new(10, 10));

        let err = engine
            .ask("question", &Transcript::inline("question text"))
            .await
            .unwrap_err();
        assert!(matches!(err, VidqaError::InvalidChunking { .. }));
    }

    #[test]
    fn test_rank_covers_all_chunks() {
        let engine = engine(RecordingModel::new());
        let transcript = Transcript::inline("a".repeat(40));
        let ranked = engine.rank("a", &transcript).unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_format_for_display() {
        let response = RagResponse {
            answer: "Yes.".to_string(),
            sources: vec![ScoredChunk {
                index: 2,
                text: "text".to_string(),
                score: 0.5,
            }],
        };
        assert_eq!(response.context_tokens(), 1);
        assert_eq!(
            response.format_for_display(),
            "Yes.\n\n--- Sources ---\n\nchunk #3 (score: 0.50)"
        );
    }
}
