//! RAG (Retrieval-Augmented Generation) over a video transcript.
//!
//! Chunks are scored against the question by word overlap, the best are packed
//! into a token budget, and the result is handed to the answer model.

pub mod context;
mod response;
pub mod scoring;

pub use context::{
    join_context, select_relevant_chunks, ContextBuilder, RetrievalConfig, ScoredChunk,
    CONTEXT_SEPARATOR,
};
pub use response::{RagEngine, RagResponse};
pub use scoring::{word_tokens, LexicalScorer, RelevanceScorer};
