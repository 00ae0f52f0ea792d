//! vidqa - Ask questions about videos
//!
//! Answers questions about a video using only what is said in it. The
//! transcript is split into overlapping chunks, the chunks sharing the most
//! words with the question are packed into a token budget, and a language
//! model answers from that context.
//!
//! # Architecture
//!
//! - `tokens` - Token estimation
//! - `chunking` - Overlapping fixed-size chunking
//! - `rag` - Relevance scoring, context selection and answering
//! - `transcript` - Transcript sources (YouTube captions, local files, inline text)
//! - `llm` - Answer model abstraction
//! - `config` - Configuration and prompt templates
//! - `orchestrator` - Pipeline coordination and timeouts
//!
//! # Example
//!
//! ```rust
//! use vidqa::chunking::{chunk_text, ChunkingConfig};
//! use vidqa::rag::{select_relevant_chunks, RetrievalConfig};
//!
//! let chunks = chunk_text("the cat is black. dogs bark.", &ChunkingConfig::new(18, 0)).unwrap();
//! let context = select_relevant_chunks("what color is the cat", &chunks, &RetrievalConfig::default());
//! assert_eq!(context, vec!["the cat is black. ".to_string()]);
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod tokens;
pub mod transcript;

pub use error::{Result, VidqaError};
