//! HTTP shell for the report pipeline.
//!
//! A thin axum router over the same load → replace → save sequence the CLI
//! drives. The server owns a template presentation and a default config on
//! disk; callers POST replacement maps and get the generated deck back as
//! a download (a copy also stays in the output directory). All policy
//! lives in the core — this module only translates errors into HTTP
//! statuses at the boundary.
//!
//! Routes:
//! - `GET /health` — liveness
//! - `GET /api/config` — default config plus the target slide's current text
//! - `POST /api/generate` — run a replacement pass and return the report

use crate::config::{self, ConfigError};
use crate::editor::{EditorError, ReportEditor};
use crate::pptx::{Package, PptxError};
use axum::extract::State;
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Media type of a PresentationML document.
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Result type for HTTP handlers.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Server configuration, supplied by the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address, e.g. `127.0.0.1:8000`
    pub bind: String,

    /// The template presentation reports are generated from
    pub template_path: PathBuf,

    /// The default config JSON served by `GET /api/config`
    pub config_path: PathBuf,

    /// Directory generated reports are saved into
    pub output_dir: PathBuf,
}

/// Errors surfaced at the HTTP boundary.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("presentation error: {0}")]
    Pptx(#[from] PptxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            // Caller-input errors
            ServerError::Editor(EditorError::SlideOutOfRange { .. }) => StatusCode::BAD_REQUEST,
            // Missing template on disk
            ServerError::Editor(EditorError::DocumentLoad(PptxError::PackageNotFound(_)))
            | ServerError::Pptx(PptxError::PackageNotFound(_)) => StatusCode::NOT_FOUND,
            // Everything else is server-side state, the on-disk default
            // config included; only /api/config reads it, so a broken
            // config is never the caller's fault.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, status = %status, "request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Replacement request body for `POST /api/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Target slide, 1-indexed. Defaults to 2, the report body slide of
    /// the standard template.
    #[serde(default = "default_slide_number")]
    pub slide_number: u32,

    /// Placeholder to replacement value, applied in document key order
    pub replacements: serde_json::Map<String, serde_json::Value>,
}

fn default_slide_number() -> u32 {
    2
}

/// Build the router for the report API.
pub fn router(config: ServerConfig) -> Router {
    let state = Arc::new(config);
    Router::new()
        .route("/health", get(health_check))
        .route("/api/config", get(get_default_config))
        .route("/api/generate", post(generate_report))
        .with_state(state)
}

/// Start the HTTP server and block until shutdown.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let app = router(config);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(addr = %bind, "report server listening");
    axum::serve(listener, app).await
}

/// Liveness endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "deckstamp-server",
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

/// Return the default on-disk config plus the target slide's current text.
async fn get_default_config(
    State(state): State<Arc<ServerConfig>>,
) -> ServerResult<impl IntoResponse> {
    let config = config::load_config(&state.config_path)?;

    let pkg = Package::open(&state.template_path)?;
    let slide_text = if config.slide_number as usize <= pkg.slide_count() {
        pkg.slide(config.slide_number as usize - 1)?.text()?
    } else {
        String::new()
    };

    Ok(Json(json!({
        "config": {
            "slide_number": config.slide_number,
            "replacements": config.replacements,
        },
        "slide_text": slide_text,
    })))
}

/// Run one load → replace → save invocation against the template and
/// return the saved report as a file download.
async fn generate_report(
    State(state): State<Arc<ServerConfig>>,
    Json(request): Json<GenerateRequest>,
) -> ServerResult<Response> {
    let pairs: Vec<(String, String)> = request
        .replacements
        .iter()
        .map(|(k, v)| (k.clone(), config::value_text(v).into_owned()))
        .collect();

    let mut editor = ReportEditor::new(&state.template_path);
    editor.load()?;
    let report = editor.replace_in_slide(request.slide_number, &pairs)?;
    let output_path = editor.save(&state.output_dir)?;

    let filename = output_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report.pptx")
        .to_string();
    let bytes = std::fs::read(&output_path)?;

    tracing::info!(path = %output_path.display(), "serving generated report");
    let headers = [
        (header::CONTENT_TYPE, PPTX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
        (
            HeaderName::from_static("x-replacements-made"),
            report.replacements_made.to_string(),
        ),
    ];
    Ok((headers, bytes).into_response())
}
