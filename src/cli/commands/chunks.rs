//! Chunks command implementation.

use super::ask::report_error;
use crate::chunking::chunk_spans;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::tokens::estimate_tokens;
use anyhow::Result;
use console::style;

/// Run the chunks command.
pub async fn run_chunks(
    input: &str,
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Fetch(input), &settings) {
        report_error(&e);
        return Err(e.into());
    }

    if let Some(chunk_size) = chunk_size {
        settings.retrieval.chunk_size = chunk_size;
    }
    if let Some(overlap) = overlap {
        settings.retrieval.overlap = overlap;
    }

    let orchestrator = Orchestrator::new(settings)?;
    let config = orchestrator.settings().chunking_config();

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = orchestrator.fetch_transcript(input).await;
    spinner.finish_and_clear();
    let transcript = transcript.inspect_err(report_error)?;

    let spans = chunk_spans(&transcript.text, &config)?;

    Output::header(&format!("Transcript {}", transcript.id));
    Output::kv("Characters", &transcript.char_len().to_string());
    Output::kv("Tokens", &format!("~{}", estimate_tokens(&transcript.text)));
    Output::kv(
        "Chunks",
        &format!(
            "{} (size {}, overlap {})",
            spans.len(),
            config.chunk_size,
            config.overlap
        ),
    );

    for (i, span) in spans.iter().enumerate() {
        println!(
            "\n{} {} [{}..{}]",
            style(">>").cyan(),
            style(format!("chunk #{}", i + 1)).bold(),
            span.start,
            span.end
        );
        println!("{}", span.text);
    }

    Ok(())
}
