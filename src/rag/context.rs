//! Context selection for RAG prompts.

use super::scoring::{LexicalScorer, RelevanceScorer};
use crate::error::{Result, VidqaError};
use crate::tokens::estimate_tokens;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Separator placed between selected chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n[...CONTEXT BREAK...]\n\n";

/// Default token budget for the prompt context.
pub const DEFAULT_MAX_CONTEXT_TOKENS: usize = 1500;

/// Default relevance threshold. A chunk must score strictly above it.
pub const DEFAULT_MIN_SCORE: f32 = 0.1;

/// Retrieval parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum approximate tokens of selected context.
    pub max_context_tokens: usize,
    /// Chunks scoring at or below this are never selected.
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl RetrievalConfig {
    /// Check that the threshold is a usable score.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(VidqaError::Config(format!(
                "min_score must be between 0.0 and 1.0, got {}",
                self.min_score
            )));
        }
        Ok(())
    }
}

/// A chunk paired with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    /// Position of the chunk in the transcript's chunk sequence.
    pub index: usize,
    /// Chunk text.
    pub text: String,
    /// Relevance score in `[0, 1]`.
    pub score: f32,
}

impl ScoredChunk {
    /// Approximate token cost of this chunk.
    pub fn tokens(&self) -> usize {
        estimate_tokens(&self.text)
    }
}

/// Ranks chunks against a question and packs the best into a token budget.
#[derive(Clone)]
pub struct ContextBuilder {
    scorer: Arc<dyn RelevanceScorer>,
    config: RetrievalConfig,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    /// Create a context builder with lexical scoring and default limits.
    pub fn new() -> Self {
        Self {
            scorer: Arc::new(LexicalScorer::new()),
            config: RetrievalConfig::default(),
        }
    }

    /// Use a different scoring strategy.
    pub fn with_scorer(mut self, scorer: Arc<dyn RelevanceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace all retrieval parameters.
    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the token budget.
    pub fn with_max_context_tokens(mut self, max_context_tokens: usize) -> Self {
        self.config.max_context_tokens = max_context_tokens;
        self
    }

    /// Set the minimum relevance threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.config.min_score = min_score;
        self
    }

    /// Current retrieval parameters.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Score every chunk and sort by score, highest first.
    ///
    /// The sort is stable: chunks with equal scores keep their input order.
    /// Chunks a scorer returns no score for count as 0.
    pub fn rank(&self, question: &str, chunks: &[String]) -> Vec<ScoredChunk> {
        let scores = self.scorer.score_all(question, chunks);
        if scores.len() != chunks.len() {
            debug!(
                scores = scores.len(),
                chunks = chunks.len(),
                "Scorer returned a score count that does not match the chunks"
            );
        }

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .zip(scores.into_iter().chain(std::iter::repeat(0.0)))
            .enumerate()
            .map(|(index, (text, score))| ScoredChunk {
                index,
                text: text.clone(),
                score: clamp_score(score),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Select chunks for the prompt context.
    ///
    /// Walks the ranking and accepts chunks while they score above the
    /// threshold and fit the remaining budget. The first chunk that fails
    /// either test ends the walk. The result is in score order, not
    /// transcript order.
    pub fn select(&self, question: &str, chunks: &[String]) -> Vec<ScoredChunk> {
        let mut selected = Vec::new();
        let mut used_tokens = 0;

        for chunk in self.rank(question, chunks) {
            let tokens = chunk.tokens();
            if chunk.score <= self.config.min_score
                || used_tokens + tokens > self.config.max_context_tokens
            {
                break;
            }
            used_tokens += tokens;
            selected.push(chunk);
        }

        debug!(
            candidates = chunks.len(),
            selected = selected.len(),
            tokens = used_tokens,
            "Selected context chunks"
        );

        selected
    }
}

/// Select the chunks most relevant to `question` within the token budget,
/// using lexical scoring.
pub fn select_relevant_chunks(
    question: &str,
    chunks: &[String],
    config: &RetrievalConfig,
) -> Vec<String> {
    ContextBuilder::new()
        .with_config(*config)
        .select(question, chunks)
        .into_iter()
        .map(|chunk| chunk.text)
        .collect()
}

/// Join selected chunk texts into a single context string.
pub fn join_context<S: AsRef<str>>(chunks: &[S], separator: &str) -> String {
    chunks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(separator)
}

fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
