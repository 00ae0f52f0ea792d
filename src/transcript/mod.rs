//! Transcript acquisition.
//!
//! Provides a trait-based interface for the places a transcript can come from
//! (YouTube captions, local files, text posted inline). A source either
//! returns the transcript text or reports that none is available.

pub mod captions;
mod local;
mod youtube;

pub use local::LocalSource;
pub use youtube::YoutubeSource;

use crate::config::Settings;
use crate::error::{Result, VidqaError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message used when a source has no transcript for the video.
pub const NO_TRANSCRIPT: &str = "No transcript available";

/// Type of transcript source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    YouTube,
    Local,
    Inline,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::YouTube => write!(f, "youtube"),
            SourceType::Local => write!(f, "local"),
            SourceType::Inline => write!(f, "inline"),
        }
    }
}

/// The full transcript text of one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Video ID, file path, or "inline".
    pub id: String,
    /// Where the transcript came from.
    pub source_type: SourceType,
    /// Transcript text.
    pub text: String,
}

impl Transcript {
    /// Create a transcript.
    pub fn new(id: impl Into<String>, source_type: SourceType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_type,
            text: text.into(),
        }
    }

    /// Wrap text supplied directly by the caller.
    pub fn inline(text: impl Into<String>) -> Self {
        Self::new("inline", SourceType::Inline, text)
    }

    /// Length of the transcript in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the transcript has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Outcome of asking a source for a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptStatus {
    /// The transcript was found.
    Available(Transcript),
    /// The video exists but has no usable transcript.
    Unavailable(String),
}

impl TranscriptStatus {
    /// Report a blank transcript as unavailable.
    pub fn from_transcript(transcript: Transcript) -> Self {
        if transcript.is_blank() {
            TranscriptStatus::Unavailable(NO_TRANSCRIPT.to_string())
        } else {
            TranscriptStatus::Available(transcript)
        }
    }

    /// Convert into a result, turning unavailability into an error.
    pub fn into_result(self) -> Result<Transcript> {
        match self {
            TranscriptStatus::Available(transcript) => Ok(transcript),
            TranscriptStatus::Unavailable(reason) => Err(VidqaError::TranscriptUnavailable(reason)),
        }
    }
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Get the source type.
    fn source_type(&self) -> SourceType;

    /// Check if this source can handle the given input.
    fn can_handle(&self, input: &str) -> bool;

    /// Extract ID from input (URL, path, etc.).
    fn extract_id(&self, input: &str) -> Option<String>;

    /// Fetch the transcript for an ID returned by `extract_id`.
    async fn fetch(&self, id: &str) -> Result<TranscriptStatus>;
}

/// Detect the appropriate transcript source for the given input.
///
/// Existing local paths (and `-` for stdin) win over YouTube IDs, since a bare
/// file name can look like an 11-character video ID.
pub fn detect_source(input: &str, settings: &Settings) -> Option<Box<dyn TranscriptSource>> {
    let local = LocalSource::new();
    if local.can_handle(input) {
        return Some(Box::new(local));
    }

    let youtube = YoutubeSource::with_config(&settings.transcript.languages, settings.temp_dir());
    if youtube.can_handle(input) {
        return Some(Box::new(youtube));
    }

    None
}

/// Parse input and return the appropriate source and ID.
pub fn parse_input(input: &str, settings: &Settings) -> Option<(Box<dyn TranscriptSource>, String)> {
    let source = detect_source(input, settings)?;
    let id = source.extract_id(input)?;
    Some((source, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_transcript_is_unavailable() {
        let status = TranscriptStatus::from_transcript(Transcript::inline("  \n "));
        assert_eq!(status, TranscriptStatus::Unavailable(NO_TRANSCRIPT.to_string()));

        let err = status.into_result().unwrap_err();
        assert!(matches!(err, VidqaError::TranscriptUnavailable(_)));
        assert_eq!(err.to_string(), NO_TRANSCRIPT);
    }

    #[test]
    fn test_available_transcript() {
        let status = TranscriptStatus::from_transcript(Transcript::inline("words"));
        let transcript = status.into_result().unwrap();
        assert_eq!(transcript.source_type, SourceType::Inline);
        assert_eq!(transcript.char_len(), 5);
    }

    #[test]
    fn test_detect_source() {
        let settings = Settings::default();

        let source = detect_source("https://youtu.be/dQw4w9WgXcQ", &settings).unwrap();
        assert_eq!(source.source_type(), SourceType::YouTube);

        let source = detect_source("-", &settings).unwrap();
        assert_eq!(source.source_type(), SourceType::Local);

        assert!(detect_source("/definitely/not/here.txt", &settings).is_none());
    }

    #[test]
    fn test_existing_file_wins_over_video_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abcdefghijk");
        std::fs::write(&path, "text").unwrap();

        let settings = Settings::default();
        let (source, id) = parse_input(path.to_str().unwrap(), &settings).unwrap();
        assert_eq!(source.source_type(), SourceType::Local);
        assert_eq!(id, path.to_str().unwrap());
    }
}
