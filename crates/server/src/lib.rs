//! # csvedit-server
//!
//! Serves the single-page CSV editor and the JSON API behind it. One
//! [`Session`] lives in [`AppState`]; every request that changes it holds the
//! write lock until it is done, so edits apply one at a time in arrival order.

pub mod config;
pub mod error;
pub mod view;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use csvedit_sheet::{DroppedFile, RowId, Session, SheetError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};

/// Upload size limit used when none is configured
pub const DEFAULT_UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<Session>>,
    upload_limit: usize,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        AppState {
            session: Arc::new(RwLock::new(session)),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }

    #[must_use]
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = limit;
        self
    }

    pub fn session(&self) -> &Arc<RwLock<Session>> {
        &self.session
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Session::new())
    }
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// The loaded table as sent to clients.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TableSnapshot {
    pub file_name: String,
    pub header: Vec<String>,
    pub rows: Vec<RowSnapshot>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RowSnapshot {
    pub id: RowId,
    pub cells: Vec<String>,
}

impl TableSnapshot {
    fn of(session: &Session) -> Result<Self, ApiError> {
        let table = session.table().ok_or(SheetError::NoTableLoaded)?;
        Ok(TableSnapshot {
            file_name: session.source_name().unwrap_or_default().to_string(),
            header: table.header().to_vec(),
            rows: table
                .rows()
                .map(|row| RowSnapshot {
                    id: row.id(),
                    cells: row.cells().to_vec(),
                })
                .collect(),
        })
    }
}

/// Body of `PUT /api/cells`.
#[derive(Serialize, Deserialize, Debug)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    pub value: String,
    /// Id of the row the client rendered at `row`; checked when present
    #[serde(default)]
    pub row_id: Option<RowId>,
}

/// Response of `POST /api/rows`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AddedRow {
    pub index: usize,
    pub id: RowId,
}

#[derive(Deserialize, Debug)]
pub struct RowQuery {
    pub id: Option<u64>,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.read().await;
    Html(view::render_page(&session))
}

async fn table(State(state): State<AppState>) -> Result<Json<TableSnapshot>, ApiError> {
    let session = state.session.read().await;
    Ok(Json(TableSnapshot::of(&session)?))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TableSnapshot>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        files.push(DroppedFile::new(name, bytes.to_vec()));
    }

    let mut session = state.session.write().await;
    session.load_files(files)?;
    Ok(Json(TableSnapshot::of(&session)?))
}

async fn edit_cell(
    State(state): State<AppState>,
    Json(edit): Json<CellEdit>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.write().await;
    match edit.row_id {
        Some(id) => session.edit_cell_checked(edit.row, id, edit.col, edit.value)?,
        None => session.edit_cell(edit.row, edit.col, edit.value)?,
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn add_row(State(state): State<AppState>) -> Result<Json<AddedRow>, ApiError> {
    let (index, id) = state.session.write().await.add_row()?;
    tracing::debug!(index, %id, "row added");
    Ok(Json(AddedRow { index, id }))
}

async fn delete_row(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(query): Query<RowQuery>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.write().await;
    let removed = match query.id {
        Some(id) => session.delete_row_checked(index, RowId(id))?,
        None => session.delete_row(index)?,
    };
    tracing::debug!(index, id = %removed.id(), "row deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let export = state.session.read().await.export()?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        ),
    ];
    Ok((headers, export.content))
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.upload_limit;
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/table", get(table))
        .route("/api/upload", post(upload))
        .route("/api/cells", put(edit_cell))
        .route("/api/rows", post(add_row))
        .route("/api/rows/:index", delete(delete_row))
        .route("/api/export", get(export))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
