//! JSON HTTP API over a [`Library`]

use crate::config::AppConfig;
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use recall_protocol::{FolderNode, ReviewedDocument};
use recall_store::{DocumentContent, ErrorKind, Library, ScanStats, StoreError};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    library: Arc<Library>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(library: Arc<Library>, config: AppConfig) -> Self {
        Self {
            library,
            config: Arc::new(config),
        }
    }
}

pub enum ApiError {
    Store(StoreError),
    Task(tokio::task::JoinError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label, message) = match self {
            Self::Store(err) => {
                let (status, label) = match err.kind() {
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
                    ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation"),
                    ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
                    ErrorKind::Filesystem => (StatusCode::INTERNAL_SERVER_ERROR, "filesystem"),
                    ErrorKind::Persistence => (StatusCode::INTERNAL_SERVER_ERROR, "persistence"),
                };
                (status, label, err.to_string())
            }
            Self::Task(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                format!("Worker task failed: {err}"),
            ),
        };
        if status.is_server_error() {
            log::error!("Request failed: {message}");
        }
        (status, Json(json!({ "error": label, "message": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Run a library call that touches the filesystem or waits on the state
/// lock off the async workers.
async fn blocking<T, F>(state: &AppState, call: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Library) -> recall_store::Result<T> + Send + 'static,
{
    let library = Arc::clone(&state.library);
    let value = tokio::task::spawn_blocking(move || call(&library)).await??;
    Ok(Json(value))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanResult {
    success: bool,
    count: usize,
    stats: ScanStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewResult {
    success: bool,
    document: ReviewedDocument,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/config", get(read_config))
        .route("/api/folders", get(folder_tree))
        .route("/api/folders/*path", get(folder_documents))
        .route("/api/folder-documents", get(root_documents))
        .route("/api/documents", get(list_documents))
        .route("/api/documents/due-today", get(due_documents))
        .route("/api/documents/:id", get(document_content))
        .route("/api/documents/:id/mark-reviewed", post(mark_reviewed))
        .route("/api/scan", post(scan))
        .with_state(state)
}

/// Scan once, prune orphaned review records, then serve until shutdown.
pub async fn serve(config: AppConfig, port: u16) -> Result<()> {
    let library = Arc::new(
        Library::open(config.library_config())
            .with_context(|| format!("Failed to open library state {}", config.db_file.display()))?,
    );

    let startup = Arc::clone(&library);
    match tokio::task::spawn_blocking(move || startup.scan_and_prune()).await? {
        Ok(report) => log::info!("Indexed {} Markdown files", report.documents.len()),
        Err(err) => log::warn!("Initial scan failed: {err}"),
    }

    log::info!("Markdown directory: {}", config.markdown_dir.display());
    log::info!("State file: {}", config.db_file.display());

    let app = router(AppState::new(library, config));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    log::info!("Listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn read_config(State(state): State<AppState>) -> Json<AppConfig> {
    Json(state.config.as_ref().clone())
}

async fn folder_tree(State(state): State<AppState>) -> Json<FolderNode> {
    Json(state.library.folder_tree())
}

async fn folder_documents(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Vec<ReviewedDocument>> {
    Ok(Json(
        state.library.list_documents_in_folder(&path, Utc::now())?,
    ))
}

async fn root_documents(State(state): State<AppState>) -> ApiResult<Vec<ReviewedDocument>> {
    Ok(Json(state.library.list_documents_in_folder("", Utc::now())?))
}

async fn list_documents(State(state): State<AppState>) -> Json<Vec<ReviewedDocument>> {
    Json(state.library.list_documents(Utc::now()))
}

async fn due_documents(State(state): State<AppState>) -> Json<Vec<ReviewedDocument>> {
    Json(state.library.list_due_documents(Utc::now()))
}

async fn document_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DocumentContent> {
    blocking(&state, move |library| {
        library.document_with_content(&id, Utc::now())
    })
    .await
}

async fn mark_reviewed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ReviewResult> {
    let Json(document) =
        blocking(&state, move |library| library.mark_reviewed(&id, Utc::now())).await?;
    Ok(Json(ReviewResult {
        success: true,
        document,
    }))
}

async fn scan(State(state): State<AppState>) -> ApiResult<ScanResult> {
    let Json(report) = blocking(&state, Library::scan).await?;
    Ok(Json(ScanResult {
        success: true,
        count: report.documents.len(),
        stats: report.stats,
    }))
}
