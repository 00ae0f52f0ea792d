//! Caption file parsing (WebVTT and SRT) into plain transcript text.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Caption file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    Srt,
    Vtt,
}

impl CaptionFormat {
    /// Detect the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "srt" => Some(CaptionFormat::Srt),
            "vtt" | "webvtt" => Some(CaptionFormat::Vtt),
            _ => None,
        }
    }
}

/// Extract the spoken text from a WebVTT or SRT document.
///
/// Cue numbers, timing lines, header/NOTE/STYLE blocks and inline markup are
/// dropped. A line identical to the previously kept line is skipped, which
/// collapses YouTube's rolling auto-captions. Lines are joined with a space.
pub fn parse_captions(content: &str) -> String {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();

    for block in content.split("\n\n") {
        let block_lines: Vec<&str> = block.lines().collect();

        // Blocks without a timing line are headers or metadata.
        let Some(timing) = block_lines.iter().position(|l| l.contains("-->")) else {
            continue;
        };

        for raw in &block_lines[timing + 1..] {
            let line = clean_line(raw);
            if line.is_empty() || lines.last() == Some(&line) {
                continue;
            }
            lines.push(line);
        }
    }

    lines.join(" ")
}

fn clean_line(raw: &str) -> String {
    let stripped = TAG_RE.replace_all(raw, "");
    let decoded = stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_srt() {
        let srt = "1\n00:00:00,000 --> 00:00:02,500\nHello there.\n\n2\n00:00:02,500 --> 00:00:05,000\nGeneral Kenobi!\n";
        assert_eq!(parse_captions(srt), "Hello there. General Kenobi!");
    }

    #[test]
    fn test_parse_vtt_with_header_and_note() {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n\nNOTE this is ignored\n\n00:00.000 --> 00:02.000 align:start\nFirst line\nsecond line\n\n00:02.000 --> 00:04.000\nThird\n";
        assert_eq!(parse_captions(vtt), "First line second line Third");
    }

    #[test]
    fn test_rolling_auto_captions_collapse() {
        let vtt = "WEBVTT\n\n\
00:00:00.000 --> 00:00:02.000\n\
hello<00:00:00.500><c> there</c>\n\n\
00:00:02.000 --> 00:00:02.010\n\
hello there\n\n\
00:00:02.010 --> 00:00:04.000\n\
hello there\n\
how<00:00:02.500><c> are</c><c> you</c>\n\n\
00:00:04.000 --> 00:00:04.010\n\
how are you\n";
        assert_eq!(parse_captions(vtt), "hello there how are you");
    }

    #[test]
    fn test_entities_and_tags() {
        let srt = "1\r\n00:00:00,000 --> 00:00:01,000\r\n<i>Tom &amp; Jerry</i> &gt; cats\r\n";
        assert_eq!(parse_captions(srt), "Tom & Jerry > cats");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse_captions(""), "");
        assert_eq!(parse_captions("WEBVTT\n\n"), "");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(CaptionFormat::from_extension("SRT"), Some(CaptionFormat::Srt));
        assert_eq!(CaptionFormat::from_extension("vtt"), Some(CaptionFormat::Vtt));
        assert_eq!(CaptionFormat::from_extension("txt"), None);
    }
}
