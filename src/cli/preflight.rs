//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, VidqaError};
use crate::transcript::{detect_source, SourceType};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Fetching a transcript for the given input.
    Fetch(&'a str),
    /// Answering requires a transcript and an API key.
    Ask(&'a str),
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation<'_>, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Fetch(input) => check_source(input, settings),
        Operation::Ask(input) => {
            settings.api_key()?;
            check_source(input, settings)
        }
    }
}

/// YouTube inputs need yt-dlp; local files and stdin need nothing.
fn check_source(input: &str, settings: &Settings) -> Result<()> {
    match detect_source(input, settings).map(|s| s.source_type()) {
        Some(SourceType::YouTube) => check_tool("yt-dlp"),
        Some(_) => Ok(()),
        None => Err(VidqaError::InvalidInput(format!(
            "Not a YouTube URL/ID or readable file: {}",
            input
        ))),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(VidqaError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidqaError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(VidqaError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
