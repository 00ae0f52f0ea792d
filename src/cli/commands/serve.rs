//! HTTP API server for integration with other systems.
//!
//! Lets a browser extension (or anything else that can POST JSON) ask
//! questions about a video. The caller either sends the transcript text it
//! already scraped or names a YouTube video for the server to fetch. Local
//! files and stdin are never reachable over HTTP.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::VidqaError;
use crate::orchestrator::Orchestrator;
use crate::rag::ScoredChunk;
use crate::transcript::Transcript;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let app = router(Arc::new(AppState { orchestrator }));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("vidqa API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask", "POST /ask");
    Output::kv("Context", "POST /context");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/context", post(context))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct QuestionRequest {
    question: String,
    /// Transcript text supplied by the caller.
    #[serde(default)]
    transcript: Option<String>,
    /// YouTube URL or video ID, used when no transcript is sent.
    #[serde(default)]
    input: Option<String>,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    sources: Vec<ScoredChunk>,
    context_tokens: usize,
}

#[derive(Serialize)]
struct ContextResponse {
    chunks: Vec<ScoredChunk>,
    context_tokens: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// A library error rendered as a JSON error body.
struct ApiError(VidqaError);

impl From<VidqaError> for ApiError {
    fn from(error: VidqaError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("Request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn status_for(error: &VidqaError) -> StatusCode {
    match error {
        VidqaError::InvalidInput(_) | VidqaError::InvalidChunking { .. } => StatusCode::BAD_REQUEST,
        VidqaError::TranscriptUnavailable(_) => StatusCode::NOT_FOUND,
        VidqaError::NoRelevantContent => StatusCode::UNPROCESSABLE_ENTITY,
        VidqaError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl QuestionRequest {
    async fn transcript(&self, orchestrator: &Orchestrator) -> Result<Transcript, VidqaError> {
        match (&self.transcript, &self.input) {
            (Some(text), _) => Ok(Transcript::inline(text.as_str())),
            (None, Some(input)) => orchestrator.fetch_youtube_transcript(input).await,
            (None, None) => Err(VidqaError::InvalidInput(
                "Provide either 'transcript' or 'input'".to_string(),
            )),
        }
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let transcript = req.transcript(&state.orchestrator).await?;
    let response = state
        .orchestrator
        .answer_transcript(&transcript, &req.question)
        .await?;

    Ok(Json(AskResponse {
        context_tokens: response.context_tokens(),
        answer: response.answer,
        sources: response.sources,
    }))
}

async fn context(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<ContextResponse>, ApiError> {
    let transcript = req.transcript(&state.orchestrator).await?;
    if transcript.is_blank() {
        return Err(VidqaError::TranscriptUnavailable(
            crate::transcript::NO_TRANSCRIPT.to_string(),
        )
        .into());
    }

    let chunks = state.orchestrator.retrieve(&transcript, &req.question)?;
    Ok(Json(ContextResponse {
        context_tokens: chunks.iter().map(ScoredChunk::tokens).sum(),
        chunks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::AnswerModel;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct EchoModel;

    #[async_trait]
    impl AnswerModel for EchoModel {
        async fn answer(&self, _system: &str, user: &str) -> crate::error::Result<String> {
            Ok(format!("echo: {}", user.len()))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn app() -> Router {
        let orchestrator =
            Orchestrator::with_model(Settings::default(), Arc::new(EchoModel)).unwrap();
        router(Arc::new(AppState { orchestrator }))
    }

    async fn post(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ask_with_inline_transcript() {
        let (status, body) = post(
            app(),
            "/ask",
            serde_json::json!({ "question": "what color is the cat", "transcript": "the cat is black" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["answer"].as_str().unwrap().starts_with("echo: "));
        assert_eq!(body["sources"][0]["text"], "the cat is black");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (status, _) = post(app(), "/ask", serde_json::json!({ "question": " ", "transcript": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(app(), "/ask", serde_json::json!({ "question": "cats?", "transcript": "" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = post(
            app(),
            "/ask",
            serde_json::json!({ "question": "quantum physics?", "transcript": "cooking pasta" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "No relevant content found in video");

        let (status, _) = post(app(), "/context", serde_json::json!({ "question": "cats?" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_local_inputs_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "password hunter2 token abc").unwrap();
        let path = file.path().to_str().unwrap();

        for uri in ["/context", "/ask"] {
            for input in [path, "-"] {
                let (status, body) = post(
                    app(),
                    uri,
                    serde_json::json!({ "question": "password token", "input": input }),
                )
                .await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, input);
                assert!(!body.to_string().contains("hunter2"));
            }
        }
    }

    #[tokio::test]
    async fn test_context_endpoint() {
        let (status, body) = post(
            app(),
            "/context",
            serde_json::json!({ "question": "what color is the cat", "transcript": "the cat is black" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chunks"].as_array().unwrap().len(), 1);
        assert_eq!(body["context_tokens"], 4);
    }

    #[test]
    fn test_status_for_timeout() {
        let err = VidqaError::Timeout {
            operation: "Answer generation",
            seconds: 15,
        };
        assert_eq!(status_for(&err), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_for(&VidqaError::OpenAI("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
