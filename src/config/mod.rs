//! Configuration module for vidqa.
//!
//! Handles loading and managing application settings, the stored API key, and
//! prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    GeneralSettings, OpenAISettings, PromptSettings, RetrievalSettings, ServerSettings, Settings,
    TranscriptSettings, API_KEY_ENV,
};
