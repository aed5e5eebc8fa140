use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::services::SessionManager;

#[derive(Debug, Serialize, ToSchema)]
pub struct ResetAllResponse {
    pub status: u16,
    /// Number of puzzles whose stored progress was cleared
    pub reset: usize,
}

/// Reset all progress
///
/// Deletes stored progress of every configured puzzle and clears the
/// painted grids of open sessions.
#[utoipa::path(
    post,
    path = "/api/progress/reset",
    responses(
        (status = 200, description = "All progress cleared", body = ResetAllResponse),
    ),
    tag = "Progress"
)]
pub async fn handle_reset_all(
    State(sessions): State<Arc<SessionManager>>,
) -> Result<Json<ResetAllResponse>, ApiError> {
    let reset = sessions.reset_all().await?;
    tracing::info!(puzzles = reset, "All progress reset");
    Ok(Json(ResetAllResponse { status: 200, reset }))
}
