//! Context command implementation.

use super::ask::report_error;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{validate_question, Orchestrator};
use anyhow::Result;

/// Run the context command.
///
/// Prints the passages that `ask` would send to the model, or every passage
/// ranked by score with `--all`.
pub async fn run_context(
    input: &str,
    question: &str,
    max_tokens: Option<usize>,
    min_score: Option<f32>,
    all: bool,
    mut settings: Settings,
) -> Result<()> {
    validate_question(question).inspect_err(report_error)?;

    if let Err(e) = preflight::check(Operation::Fetch(input), &settings) {
        report_error(&e);
        return Err(e.into());
    }

    if let Some(max_tokens) = max_tokens {
        settings.retrieval.max_context_tokens = max_tokens;
    }
    if let Some(min_score) = min_score {
        settings.retrieval.min_score = f64::from(min_score);
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = orchestrator.fetch_transcript(input).await;
    spinner.finish_and_clear();
    let transcript = transcript.inspect_err(report_error)?;

    let chunks = if all {
        orchestrator.rank(&transcript, question)
    } else {
        orchestrator.retrieve(&transcript, question)
    }
    .inspect_err(report_error)?;

    if chunks.is_empty() {
        Output::warning("No relevant content found in video");
        return Ok(());
    }

    let tokens: usize = chunks.iter().map(|c| c.tokens()).sum();
    Output::success(&format!(
        "{} {} (~{} tokens)",
        chunks.len(),
        if all { "passages ranked" } else { "passages selected" },
        tokens
    ));

    for chunk in &chunks {
        Output::scored_chunk(chunk, 200);
    }

    Ok(())
}
