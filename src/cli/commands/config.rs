//! Config command implementation.

use crate::cli::{mask_key, ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command against the file at `config_path`.
pub fn run_config(action: &ConfigAction, mut settings: Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if let Some(key) = settings.openai.api_key.as_mut() {
                *key = mask_key(key);
            }
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Set { key, value } => {
            settings.set_value(key, value)?;
            settings.validate()?;
            settings.save_to(config_path)?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::SetKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            if !key.starts_with("sk-") {
                Output::warning("Key does not look like an OpenAI key (expected sk-...).");
            }
            settings.openai.api_key = Some(key.to_string());
            settings.save_to(config_path)?;
            Output::success(&format!(
                "Stored API key {} in {}",
                mask_key(key),
                config_path.display()
            ));
        }

        ConfigAction::Edit => {
            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save_to(config_path)?;
                Output::info(&format!("Created default config at {}", config_path.display()));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(config_path)
                .status();

            match status {
                Ok(s) if s.success() => match Settings::load_from(Some(config_path)) {
                    Ok(edited) => match edited.validate() {
                        Ok(()) => Output::success("Config saved."),
                        Err(e) => Output::warning(&format!("Config saved but invalid: {}", e)),
                    },
                    Err(e) => Output::error(&format!("Config file no longer parses: {}", e)),
                },
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let action = ConfigAction::Set {
            key: "retrieval.min_score".to_string(),
            value: "0.25".to_string(),
        };
        run_config(&action, Settings::default(), &path).unwrap();

        let saved = Settings::load_from(Some(path.as_path())).unwrap();
        assert!((saved.retrieval.min_score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let action = ConfigAction::Set {
            key: "retrieval.overlap".to_string(),
            value: "500".to_string(),
        };
        assert!(run_config(&action, Settings::default(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_set_key_stores_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let action = ConfigAction::SetKey {
            key: " sk-test-key-123456 ".to_string(),
        };
        run_config(&action, Settings::default(), &path).unwrap();

        let saved = Settings::load_from(Some(path.as_path())).unwrap();
        assert_eq!(saved.openai.api_key.as_deref(), Some("sk-test-key-123456"));
    }
}
