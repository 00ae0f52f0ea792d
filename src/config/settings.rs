//! Configuration settings for vidqa.

use crate::chunking::{ChunkingConfig, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::error::{Result, VidqaError};
use crate::llm::openai::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::rag::context::{RetrievalConfig, CONTEXT_SEPARATOR, DEFAULT_MAX_CONTEXT_TOKENS};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no key is stored in the config file.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub openai: OpenAISettings,
    pub retrieval: RetrievalSettings,
    pub transcript: TranscriptSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary files (downloaded captions).
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/vidqa".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Answer model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Stored API key. Falls back to `OPENAI_API_KEY` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Chat model used to answer questions.
    pub model: String,
    /// Maximum tokens in a generated answer.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Seconds to wait for an answer before giving up.
    pub timeout_secs: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Chunking and context selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Chunk size in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks.
    pub overlap: usize,
    /// Token budget for the context sent to the model.
    pub max_context_tokens: usize,
    /// Chunks must score strictly above this to be used (0.0-1.0).
    pub min_score: f64,
    /// Text placed between chunks in the context.
    pub separator: String,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            max_context_tokens: DEFAULT_MAX_CONTEXT_TOKENS,
            min_score: 0.1,
            separator: CONTEXT_SEPARATOR.to_string(),
        }
    }
}

/// Transcript acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Subtitle languages requested from yt-dlp (its `--sub-langs` syntax).
    pub languages: String,
    /// Seconds to wait for a transcript before giving up.
    pub timeout_secs: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: "en.*,en".to_string(),
            timeout_secs: 30,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    ///
    /// The file may hold an API key, so on Unix it is readable by the owner only.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;

        // `mode` only applies to newly created files; tighten an existing one
        // before the key is written.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidqa")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Chunking parameters from the retrieval section.
    pub fn chunking_config(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.retrieval.chunk_size, self.retrieval.overlap)
    }

    /// Context selection parameters from the retrieval section.
    pub fn retrieval_config(&self) -> RetrievalConfig {
        RetrievalConfig {
            max_context_tokens: self.retrieval.max_context_tokens,
            min_score: self.retrieval.min_score as f32,
        }
    }

    /// Timeout for fetching a transcript.
    pub fn transcript_timeout(&self) -> Duration {
        Duration::from_secs(self.transcript.timeout_secs)
    }

    /// Timeout for the answer model call.
    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.openai.timeout_secs)
    }

    /// Check that the settings describe a usable pipeline.
    pub fn validate(&self) -> Result<()> {
        self.chunking_config().validate()?;
        self.retrieval_config().validate()?;

        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(VidqaError::Config(format!(
                "openai.temperature must be between 0.0 and 2.0, got {}",
                self.openai.temperature
            )));
        }
        if self.openai.max_tokens == 0 {
            return Err(VidqaError::Config(
                "openai.max_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the API key: the stored key first, then `OPENAI_API_KEY`.
    pub fn api_key(&self) -> Result<String> {
        self.openai
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .map(|key| key.trim().to_string())
                    .filter(|key| !key.is_empty())
            })
            .ok_or(VidqaError::MissingApiKey)
    }

    /// Set a value by dotted key (e.g. `retrieval.min_score`).
    ///
    /// The value is parsed as a TOML literal when possible and as a plain
    /// string otherwise.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut root = toml::Value::try_from(&*self)?;

        let (path, field) = match key.rsplit_once('.') {
            Some((path, field)) => (Some(path), field),
            None => (None, key),
        };

        let mut table = root
            .as_table_mut()
            .ok_or_else(|| VidqaError::Config("settings are not a table".to_string()))?;
        for section in path.into_iter().flat_map(|p| p.split('.')) {
            table = table
                .get_mut(section)
                .and_then(toml::Value::as_table_mut)
                .ok_or_else(|| VidqaError::Config(format!("Unknown config key: {}", key)))?;
        }
        table.insert(field.to_string(), parse_toml_literal(value));

        let updated: Settings = root.try_into()?;

        // serde(default) ignores unknown fields, so check the key survived.
        let check = toml::Value::try_from(&updated)?;
        let known = key
            .split('.')
            .try_fold(&check, |node, part| node.get(part))
            .is_some();
        if !known {
            return Err(VidqaError::Config(format!("Unknown config key: {}", key)));
        }

        *self = updated;
        Ok(())
    }
}

fn parse_toml_literal(value: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {}", value))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(value.to_string()))
}
