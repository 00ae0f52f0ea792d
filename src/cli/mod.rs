//! CLI module for vidqa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{content_preview, mask_key, Output};

use clap::{Parser, Subcommand};

/// vidqa - Ask questions about videos
///
/// Fetches a video's transcript, picks the passages most relevant to your
/// question and asks a language model to answer from them.
#[derive(Parser, Debug)]
#[command(name = "vidqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about a video
    Ask {
        /// YouTube URL/ID, transcript file (.txt, .vtt, .srt), or '-' for stdin
        input: String,

        /// The question to ask
        question: String,

        /// Chat model to use for the answer
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show the transcript passages that would be sent as context
    Context {
        /// YouTube URL/ID, transcript file, or '-' for stdin
        input: String,

        /// The question to rank passages against
        question: String,

        /// Token budget for the selected context
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Minimum relevance score (0.0-1.0); passages must score above it
        #[arg(long)]
        min_score: Option<f32>,

        /// Show every passage with its score instead of the selection
        #[arg(short, long)]
        all: bool,
    },

    /// Split a transcript into chunks and print them
    Chunks {
        /// YouTube URL/ID, transcript file, or '-' for stdin
        input: String,

        /// Chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Characters shared by consecutive chunks
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Start HTTP API server for browser extensions and other clients
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Open configuration file in editor
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "retrieval.min_score")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Store the OpenAI API key in the configuration file
    SetKey {
        /// The API key (sk-...)
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["vidqa", "-vv", "ask", "dQw4w9WgXcQ", "what is this about?"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask { input, question, model } => {
                assert_eq!(input, "dQw4w9WgXcQ");
                assert_eq!(question, "what is this about?");
                assert_eq!(model, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_context_flags() {
        let cli = Cli::parse_from([
            "vidqa", "context", "talk.txt", "cats?", "--max-tokens", "200", "--min-score", "0.3", "--all",
        ]);
        match cli.command {
            Commands::Context { max_tokens, min_score, all, .. } => {
                assert_eq!(max_tokens, Some(200));
                assert_eq!(min_score, Some(0.3));
                assert!(all);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_set_key() {
        let cli = Cli::parse_from(["vidqa", "-c", "/tmp/v.toml", "config", "set-key", "sk-test"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/v.toml"));
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::SetKey { ref key } } if key == "sk-test"
        ));
    }
}
