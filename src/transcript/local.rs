//! Local transcript files and stdin.

use super::captions::{parse_captions, CaptionFormat};
use super::{SourceType, Transcript, TranscriptSource, TranscriptStatus};
use crate::error::{Result, VidqaError};
use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Input that reads the transcript from stdin.
pub const STDIN_INPUT: &str = "-";

/// Transcript stored in a local `.txt`, `.vtt` or `.srt` file, or piped on stdin.
pub struct LocalSource;

impl LocalSource {
    pub fn new() -> Self {
        Self
    }

    async fn read_stdin() -> Result<String> {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    }

    async fn read_file(path: &Path) -> Result<String> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            VidqaError::TranscriptSource(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(CaptionFormat::from_extension);

        Ok(match format {
            Some(_) => parse_captions(&content),
            None => content,
        })
    }
}

impl Default for LocalSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for LocalSource {
    fn source_type(&self) -> SourceType {
        SourceType::Local
    }

    fn can_handle(&self, input: &str) -> bool {
        input == STDIN_INPUT || Path::new(input).is_file()
    }

    fn extract_id(&self, input: &str) -> Option<String> {
        self.can_handle(input).then(|| input.to_string())
    }

    async fn fetch(&self, id: &str) -> Result<TranscriptStatus> {
        let text = if id == STDIN_INPUT {
            Self::read_stdin().await?
        } else {
            Self::read_file(Path::new(id)).await?
        };

        debug!("Read {} characters from {}", text.chars().count(), id);

        Ok(TranscriptStatus::from_transcript(Transcript::new(
            id,
            SourceType::Local,
            text,
        )))
    }
}
