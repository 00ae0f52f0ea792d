//! Doctor command - verify system requirements and configuration.

use crate::cli::{mask_key, Output};
use crate::config::{Settings, API_KEY_ENV};
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("vidqa Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let sections = [
        ("External Tools", vec![check_ytdlp()]),
        ("API Configuration", vec![check_api_key(settings)]),
        (
            "Configuration",
            vec![check_config_file(config_path), check_settings(settings)],
        ),
    ];

    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
        }
        println!();
    }

    let checks = sections.iter().flat_map(|(_, checks)| checks);
    let errors = checks
        .clone()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    let warnings = checks.filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using vidqa.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! vidqa is ready to use.");
    }

    Ok(())
}

/// yt-dlp is only needed for YouTube inputs, so a missing binary is a warning.
fn check_ytdlp() -> CheckResult {
    match Command::new("yt-dlp").arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok("yt-dlp", &version)
        }
        Ok(_) => CheckResult::error("yt-dlp", "installed but not working", install_hint_ytdlp()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::warning(
            "yt-dlp",
            "not found (needed for YouTube inputs)",
            install_hint_ytdlp(),
        ),
        Err(e) => CheckResult::error("yt-dlp", &format!("error: {}", e), install_hint_ytdlp()),
    }
}

/// Check that an OpenAI API key can be resolved.
fn check_api_key(settings: &Settings) -> CheckResult {
    let from_file = settings
        .openai
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());

    match settings.api_key() {
        Ok(key) => {
            let origin = if from_file { "config file" } else { API_KEY_ENV };
            let message = format!("configured via {} ({})", origin, mask_key(&key));
            if key.starts_with("sk-") {
                CheckResult::ok("API key", &message)
            } else {
                CheckResult::warning(
                    "API key",
                    &message,
                    "Expected format: sk-... (OpenAI API key)",
                )
            }
        }
        Err(_) => CheckResult::error(
            "API key",
            "not set",
            "Set with: vidqa config set-key sk-... (or export OPENAI_API_KEY)",
        ),
    }
}

/// Check if the config file exists.
fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vidqa config edit",
        )
    }
}

/// Check that the settings describe a usable pipeline.
fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Settings",
            &format!(
                "chunks of {} chars ({} overlap), {} token budget, min score {}",
                settings.retrieval.chunk_size,
                settings.retrieval.overlap,
                settings.retrieval.max_context_tokens,
                settings.retrieval.min_score
            ),
        ),
        Err(e) => CheckResult::error("Settings", &e.to_string(), "Fix with: vidqa config set <key> <value>"),
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_stored_key_is_masked() {
        let mut settings = Settings::default();
        settings.openai.api_key = Some("sk-abcdefghijklmnop1234".to_string());
        let result = check_api_key(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("config file"));
        assert!(!result.message.contains("efghijklmnop"));
    }

    #[test]
    fn test_invalid_settings_reported() {
        let mut settings = Settings::default();
        settings.retrieval.overlap = 600;
        assert_eq!(check_settings(&settings).status, CheckStatus::Error);
        assert_eq!(check_settings(&Settings::default()).status, CheckStatus::Ok);
    }

    #[test]
    fn test_missing_config_file_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_config_file(&dir.path().join("config.toml"));
        assert_eq!(result.status, CheckStatus::Warning);
    }
}
