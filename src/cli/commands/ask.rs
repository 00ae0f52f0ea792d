//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::VidqaError;
use crate::orchestrator::{validate_question, Orchestrator};
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    input: &str,
    question: &str,
    model: Option<String>,
    mut settings: Settings,
) -> Result<()> {
    let question = match validate_question(question) {
        Ok(question) => question,
        Err(e) => {
            report_error(&e);
            return Err(e.into());
        }
    };

    if let Err(e) = preflight::check(Operation::Ask(input), &settings) {
        report_error(&e);
        Output::info("Run 'vidqa doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.openai.model = model;
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = match orchestrator.fetch_transcript(input).await {
        Ok(transcript) => transcript,
        Err(e) => {
            spinner.finish_and_clear();
            report_error(&e);
            return Err(e.into());
        }
    };

    spinner.set_message("Generating answer...");
    match orchestrator.answer_transcript(&transcript, question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::scored_chunk(source, 100);
                }
                println!();
                Output::kv("Context", &format!("~{} tokens", response.context_tokens()));
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            report_error(&e);
            return Err(e.into());
        }
    }

    Ok(())
}

/// Print an error with a hint for the cases the user can fix.
pub(crate) fn report_error(error: &VidqaError) {
    Output::error(&error.to_string());
    if let Some(hint) = error_hint(error) {
        Output::info(hint);
    }
}

fn error_hint(error: &VidqaError) -> Option<&'static str> {
    match error {
        VidqaError::MissingApiKey => {
            Some("Store a key with: vidqa config set-key sk-... (or export OPENAI_API_KEY)")
        }
        VidqaError::ToolNotFound(_) => Some("Install yt-dlp: pip install yt-dlp"),
        e if e.is_quota() => Some("Please check your OpenAI account billing details."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_question_rejected_before_fetch() {
        // Neither the input nor the API key is checked when the question is blank.
        let err = run_ask("/no/such/video.txt", "   ", None, Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VidqaError>(),
            Some(VidqaError::InvalidInput(msg)) if msg == "Please enter a question"
        ));
    }

    #[test]
    fn test_error_hints() {
        assert!(error_hint(&VidqaError::MissingApiKey)
            .unwrap()
            .contains("config set-key"));
        assert_eq!(
            error_hint(&VidqaError::OpenAI("You exceeded your current quota".to_string())),
            Some("Please check your OpenAI account billing details.")
        );
        assert_eq!(error_hint(&VidqaError::NoRelevantContent), None);
    }
}
