//! YouTube captions via yt-dlp.

use super::captions::parse_captions;
use super::{SourceType, Transcript, TranscriptSource, TranscriptStatus, NO_TRANSCRIPT};
use crate::error::{Result, VidqaError};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// YouTube transcript source.
///
/// Downloads manual or automatic captions with yt-dlp (no media is fetched)
/// and flattens them to plain text.
pub struct YoutubeSource {
    video_id_regex: Regex,
    languages: String,
    temp_dir: PathBuf,
}

impl YoutubeSource {
    pub fn new() -> Self {
        Self::with_config("en.*,en", std::env::temp_dir().join("vidqa"))
    }

    /// Create a source requesting the given subtitle languages.
    pub fn with_config(languages: &str, temp_dir: PathBuf) -> Self {
        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:[^&\s]*&)*v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Self {
            video_id_regex,
            languages: languages.to_string(),
            temp_dir,
        }
    }

    /// Extract video ID from a YouTube URL or bare ID.
    fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Download caption files for a video into `dir`.
    async fn download_captions(&self, video_id: &str, dir: &Path) -> Result<()> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let template = dir.join("%(id)s.%(ext)s");

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-format",
                "vtt",
                "--sub-langs",
                self.languages.as_str(),
                "--no-playlist",
                "--no-warnings",
                "-o",
            ])
            .arg(&template)
            .arg(&url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VidqaError::ToolNotFound("yt-dlp".to_string())
                } else {
                    VidqaError::TranscriptSource(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VidqaError::ToolFailed(format!(
                "yt-dlp could not fetch captions for {}: {}",
                video_id,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the caption file to use, preferring the shortest language tag
/// (`en` over `en-US` over `en-orig`) and then name order.
fn pick_caption_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "vtt"))
        .collect();

    files.sort_by(|a, b| {
        let a_name = a.file_name().map(|n| n.len()).unwrap_or(0);
        let b_name = b.file_name().map(|n| n.len()).unwrap_or(0);
        a_name.cmp(&b_name).then_with(|| a.cmp(b))
    });

    Ok(files.into_iter().next())
}

#[async_trait]
impl TranscriptSource for YoutubeSource {
    fn source_type(&self) -> SourceType {
        SourceType::YouTube
    }

    fn can_handle(&self, input: &str) -> bool {
        self.extract_video_id(input).is_some()
    }

    fn extract_id(&self, input: &str) -> Option<String> {
        self.extract_video_id(input)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> Result<TranscriptStatus> {
        let video_id = self.extract_video_id(id).ok_or_else(|| {
            VidqaError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", id))
        })?;

        std::fs::create_dir_all(&self.temp_dir)?;
        let work_dir = tempfile::Builder::new()
            .prefix("captions-")
            .tempdir_in(&self.temp_dir)?;

        info!("Fetching captions for {}", video_id);
        self.download_captions(&video_id, work_dir.path()).await?;

        let Some(path) = pick_caption_file(work_dir.path())? else {
            debug!("yt-dlp produced no caption files for {}", video_id);
            return Ok(TranscriptStatus::Unavailable(NO_TRANSCRIPT.to_string()));
        };

        debug!("Using caption file {}", path.display());
        let content = tokio::fs::read_to_string(&path).await?;
        let text = parse_captions(&content);

        Ok(TranscriptStatus::from_transcript(Transcript::new(
            video_id,
            SourceType::YouTube,
            text,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let source = YoutubeSource::new();

        assert_eq!(
            source.extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://m.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            source.extract_video_id("dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );

        assert_eq!(source.extract_video_id("not-a-video-id"), None);
        assert_eq!(source.extract_video_id(""), None);
    }

    #[test]
    fn test_can_handle() {
        let source = YoutubeSource::new();

        assert!(source.can_handle("dQw4w9WgXcQ"));
        assert!(source.can_handle("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!source.can_handle("/path/to/transcript.txt"));
    }

    #[test]
    fn test_pick_caption_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(pick_caption_file(dir.path()).unwrap(), None);

        for name in ["abc.en-orig.vtt", "abc.en.vtt", "abc.en-US.vtt", "abc.info.json"] {
            std::fs::write(dir.path().join(name), "WEBVTT\n").unwrap();
        }
        let picked = pick_caption_file(dir.path()).unwrap().unwrap();
        assert_eq!(picked.file_name().unwrap(), "abc.en.vtt");
    }
}
