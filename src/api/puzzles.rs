use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use pixnum_engine::ColorProgress;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::{Session, SessionManager};

/// Painted and total cell counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ProgressView {
    pub total: usize,
    pub painted: usize,
    /// `painted / total`, 0 when there are no cells
    pub fraction: f64,
}

impl From<ColorProgress> for ProgressView {
    fn from(p: ColorProgress) -> Self {
        Self {
            total: p.total,
            painted: p.painted,
            fraction: p.fraction(),
        }
    }
}

/// A configured puzzle
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleSummary {
    pub id: String,
    pub title: String,
    /// Whether a session is currently open
    pub open: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleListResponse {
    pub puzzles: Vec<PuzzleSummary>,
}

/// State of an open puzzle
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub puzzle_id: String,
    pub title: String,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Selected palette index
    pub selected: u8,
    pub selected_progress: ProgressView,
    pub overall: ProgressView,
    /// Every paintable cell is painted
    pub complete: bool,
    /// Last progress write in this session (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        let state = session.state();
        Self {
            puzzle_id: session.puzzle_id().to_string(),
            title: session.title().to_string(),
            width: state.width(),
            height: state.height(),
            selected: session.selected(),
            selected_progress: state.progress_for(session.selected()).into(),
            overall: state.overall_progress().into(),
            complete: state.is_complete(),
            saved_at: session.writer().saved_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Target and painted cells, row-major
#[derive(Debug, Serialize, ToSchema)]
pub struct GridResponse {
    pub width: usize,
    pub height: usize,
    /// Palette index per cell, 0 for cells outside the artwork
    pub target: Vec<u8>,
    /// Painted index per cell, 0 for unpainted
    pub painted: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CloseResponse {
    /// `false` if the puzzle was not open
    pub closed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: u16,
    pub message: String,
}

/// List configured puzzles
#[utoipa::path(
    get,
    path = "/api/puzzles",
    responses(
        (status = 200, description = "Configured puzzles", body = PuzzleListResponse),
    ),
    tag = "Puzzles"
)]
pub async fn handle_list_puzzles(
    State(sessions): State<Arc<SessionManager>>,
) -> Json<PuzzleListResponse> {
    let open = sessions.open_ids().await;
    let puzzles = sessions
        .config()
        .puzzles
        .iter()
        .map(|(id, puzzle)| PuzzleSummary {
            id: id.clone(),
            title: puzzle.title_or(id).to_string(),
            open: open.contains(id),
        })
        .collect();
    Json(PuzzleListResponse { puzzles })
}

/// Open a puzzle
///
/// Quantizes the puzzle image and restores saved progress. Opening an
/// already open puzzle returns its current state.
#[utoipa::path(
    post,
    path = "/api/puzzles/{id}/open",
    responses(
        (status = 200, description = "Puzzle opened", body = SessionResponse),
        (status = 404, description = "Unknown puzzle"),
        (status = 422, description = "Puzzle image could not be loaded"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Puzzles"
)]
pub async fn handle_open(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = sessions.open(&id).await?;
    let session = session.lock().await;
    Ok(Json(SessionResponse::from(&*session)))
}

/// Get the state of an open puzzle
#[utoipa::path(
    get,
    path = "/api/puzzles/{id}",
    responses(
        (status = 200, description = "Puzzle state", body = SessionResponse),
        (status = 404, description = "Unknown puzzle"),
        (status = 409, description = "Puzzle is not open"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Puzzles"
)]
pub async fn handle_state(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = sessions.get(&id).await?;
    let session = session.lock().await;
    Ok(Json(SessionResponse::from(&*session)))
}

/// Get the target and painted grids of an open puzzle
#[utoipa::path(
    get,
    path = "/api/puzzles/{id}/grid",
    responses(
        (status = 200, description = "Grids", body = GridResponse),
        (status = 409, description = "Puzzle is not open"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Puzzles"
)]
pub async fn handle_grid(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
) -> Result<Json<GridResponse>, ApiError> {
    let session = sessions.get(&id).await?;
    let session = session.lock().await;
    let state = session.state();
    Ok(Json(GridResponse {
        width: state.width(),
        height: state.height(),
        target: state.target().cells().to_vec(),
        painted: state.painted().to_vec(),
    }))
}

/// Reset a puzzle
///
/// Clears the painted grid of an open session and the stored progress.
#[utoipa::path(
    post,
    path = "/api/puzzles/{id}/reset",
    responses(
        (status = 200, description = "Progress cleared", body = StatusResponse),
        (status = 404, description = "Unknown puzzle"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Puzzles"
)]
pub async fn handle_reset_puzzle(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    sessions.reset(&id).await?;
    Ok(Json(StatusResponse {
        status: 200,
        message: format!("Progress of {id} cleared"),
    }))
}

/// Close a puzzle
///
/// Writes the progress immediately and ends the session.
#[utoipa::path(
    post,
    path = "/api/puzzles/{id}/close",
    responses(
        (status = 200, description = "Session closed", body = CloseResponse),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Puzzles"
)]
pub async fn handle_close(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
) -> Result<Json<CloseResponse>, ApiError> {
    let closed = sessions.close(&id).await?;
    Ok(Json(CloseResponse { closed }))
}
