use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::puzzles::ProgressView;
use crate::error::ApiError;
use crate::services::{PaintOutcome, SessionManager};

/// Paint one cell
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaintRequest {
    /// Column in grid space, may be outside the grid
    pub x: i64,
    /// Row in grid space, may be outside the grid
    pub y: i64,
    /// Palette index to paint with; defaults to the current selection
    #[serde(default)]
    pub selected: Option<u8>,
}

/// Paint a square of cells
#[derive(Debug, Deserialize, ToSchema)]
pub struct BrushRequest {
    pub x: i64,
    pub y: i64,
    /// Half the side length; 0 paints a single cell
    pub radius: i64,
    #[serde(default)]
    pub selected: Option<u8>,
}

/// Result of a paint or brush request
#[derive(Debug, Serialize, ToSchema)]
pub struct PaintResponse {
    /// Whether the request painted (or re-painted) a cell
    pub painted: bool,
    /// Cells that changed from unpainted to painted
    pub newly_painted: usize,
    /// Selection after the request
    pub selected: u8,
    /// Set when the painted color was completed and the selection moved on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_to: Option<u8>,
    /// Progress of the color that was painted with
    pub color_progress: ProgressView,
    pub overall: ProgressView,
    pub complete: bool,
}

impl From<PaintOutcome> for PaintResponse {
    fn from(outcome: PaintOutcome) -> Self {
        Self {
            painted: outcome.painted,
            newly_painted: outcome.newly_painted,
            selected: outcome.selected,
            advanced_to: outcome.advanced_to,
            color_progress: outcome.color_progress.into(),
            overall: outcome.overall.into(),
            complete: outcome.complete,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectionRequest {
    pub index: u8,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectionResponse {
    pub selected: u8,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceResponse {
    /// Newly selected index, absent when every color is painted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u8>,
    pub done: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ColorProgressResponse {
    pub index: u8,
    #[serde(flatten)]
    pub progress: ProgressView,
    pub complete: bool,
}

/// Paint a cell
///
/// Only paints when the selected color is the cell's target color.
/// Out-of-bounds coordinates and wrong colors report `painted: false`.
#[utoipa::path(
    post,
    path = "/api/puzzles/{id}/paint",
    request_body = PaintRequest,
    responses(
        (status = 200, description = "Paint applied", body = PaintResponse),
        (status = 400, description = "Selected index not in palette"),
        (status = 409, description = "Puzzle is not open"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Painting"
)]
pub async fn handle_paint(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
    Json(request): Json<PaintRequest>,
) -> Result<Json<PaintResponse>, ApiError> {
    let outcome = sessions
        .paint(&id, request.x, request.y, request.selected)
        .await?;
    Ok(Json(outcome.into()))
}

/// Paint a square brush
#[utoipa::path(
    post,
    path = "/api/puzzles/{id}/brush",
    request_body = BrushRequest,
    responses(
        (status = 200, description = "Brush applied", body = PaintResponse),
        (status = 400, description = "Selected index not in palette"),
        (status = 409, description = "Puzzle is not open"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Painting"
)]
pub async fn handle_brush(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
    Json(request): Json<BrushRequest>,
) -> Result<Json<PaintResponse>, ApiError> {
    let outcome = sessions
        .brush(&id, request.x, request.y, request.radius, request.selected)
        .await?;
    Ok(Json(outcome.into()))
}

/// Select a palette color
#[utoipa::path(
    put,
    path = "/api/puzzles/{id}/selection",
    request_body = SelectionRequest,
    responses(
        (status = 200, description = "Color selected", body = SelectionResponse),
        (status = 400, description = "Index not in palette"),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Painting"
)]
pub async fn handle_select(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let selected = sessions.select(&id, request.index).await?;
    Ok(Json(SelectionResponse { selected }))
}

/// Select the next color with cells left to paint
#[utoipa::path(
    post,
    path = "/api/puzzles/{id}/advance",
    responses(
        (status = 200, description = "Advance result", body = AdvanceResponse),
    ),
    params(("id" = String, Path, description = "Puzzle id")),
    tag = "Painting"
)]
pub async fn handle_advance(
    State(sessions): State<Arc<SessionManager>>,
    Path(id): Path<String>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let next = sessions.advance(&id).await?;
    Ok(Json(AdvanceResponse {
        next,
        done: next.is_none(),
    }))
}

/// Progress of one palette color
#[utoipa::path(
    get,
    path = "/api/puzzles/{id}/progress/{index}",
    responses(
        (status = 200, description = "Color progress", body = ColorProgressResponse),
        (status = 400, description = "Index not in palette"),
    ),
    params(
        ("id" = String, Path, description = "Puzzle id"),
        ("index" = u8, Path, description = "Palette index"),
    ),
    tag = "Painting"
)]
pub async fn handle_color_progress(
    State(sessions): State<Arc<SessionManager>>,
    Path((id, index)): Path<(String, u8)>,
) -> Result<Json<ColorProgressResponse>, ApiError> {
    let progress = sessions.progress_for(&id, index).await?;
    Ok(Json(ColorProgressResponse {
        index,
        progress: progress.into(),
        complete: progress.is_complete(),
    }))
}
