//! Error types for vidqa.

use thiserror::Error;

/// Library-level error type for vidqa operations.
#[derive(Error, Debug)]
pub enum VidqaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid chunking parameters: overlap ({overlap}) must be smaller than chunk size ({chunk_size})")]
    InvalidChunking { chunk_size: usize, overlap: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript source error: {0}")]
    TranscriptSource(String),

    #[error("{0}")]
    TranscriptUnavailable(String),

    #[error("No relevant content found in video")]
    NoRelevantContent,

    #[error("Missing OpenAI API key. Set it with 'vidqa config set-key <key>' or export OPENAI_API_KEY")]
    MissingApiKey,

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("{operation} timed out after {seconds} seconds")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl VidqaError {
    /// Whether the error came from the provider rejecting the request for billing reasons.
    pub fn is_quota(&self) -> bool {
        matches!(self, VidqaError::OpenAI(msg) if msg.to_lowercase().contains("quota"))
    }
}

/// Result type alias for vidqa operations.
pub type Result<T> = std::result::Result<T, VidqaError>;
