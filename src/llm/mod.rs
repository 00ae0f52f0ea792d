//! Language-model calls that turn a prompt into an answer.

pub mod openai;

pub use openai::OpenAIAnswerModel;

use crate::error::{Result, VidqaError};
use async_trait::async_trait;

/// Trait for models that answer a question from a rendered prompt.
#[async_trait]
pub trait AnswerModel: Send + Sync {
    /// Generate an answer for the given system and user prompts.
    async fn answer(&self, system: &str, user: &str) -> Result<String>;

    /// Name of the underlying model, for logging.
    fn model_name(&self) -> &str;
}

/// Stand-in used when no API key is configured; every call fails with
/// [`VidqaError::MissingApiKey`].
pub struct UnconfiguredModel;

#[async_trait]
impl AnswerModel for UnconfiguredModel {
    async fn answer(&self, _system: &str, _user: &str) -> Result<String> {
        Err(VidqaError::MissingApiKey)
    }

    fn model_name(&self) -> &str {
        "unconfigured"
    }
}
