//! OpenAI chat completion implementation.

use super::AnswerModel;
use crate::error::{Result, VidqaError};
use crate::openai::create_client_with_timeout;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default cap on answer length.
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// OpenAI-backed answer model.
pub struct OpenAIAnswerModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAIAnswerModel {
    /// Create a model client with default generation settings.
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        Self::with_config(api_key, timeout, DEFAULT_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
    }

    /// Create a model client with custom generation settings.
    pub fn with_config(
        api_key: &str,
        timeout: Duration,
        model: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(api_key, timeout)?,
            model: model.to_string(),
            max_tokens,
            temperature,
        })
    }

    /// Maximum completion tokens requested per answer.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[async_trait]
impl AnswerModel for OpenAIAnswerModel {
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn answer(&self, system: &str, user: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(|e| VidqaError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user.to_string())
                .build()
                .map_err(|e| VidqaError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| VidqaError::OpenAI(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| VidqaError::OpenAI(format!("AI Response Failed: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| VidqaError::OpenAI("Empty response from model".to_string()))?
            .to_string();

        debug!("Received answer ({} chars)", answer.len());
        Ok(answer)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_creation() {
        let model = OpenAIAnswerModel::new("sk-test", Duration::from_secs(5)).unwrap();
        assert_eq!(model.model_name(), DEFAULT_MODEL);
        assert_eq!(model.max_tokens(), DEFAULT_MAX_TOKENS);

        let model =
            OpenAIAnswerModel::with_config("sk-test", Duration::from_secs(5), "gpt-4o-mini", 500, 0.2)
                .unwrap();
        assert_eq!(model.model_name(), "gpt-4o-mini");
        assert_eq!(model.max_tokens(), 500);
    }
}
