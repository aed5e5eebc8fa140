use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixnum_engine::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown puzzle: {0}")]
    UnknownPuzzle(String),

    #[error("Puzzle is not open: {0}")]
    PuzzleNotOpen(String),

    #[error("Puzzle could not be loaded: {0}")]
    LoadFailed(String),

    #[error("Palette index {0} is not in the active palette")]
    InvalidIndex(u8),

    #[error("Progress store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownPuzzle(_) => StatusCode::NOT_FOUND,
            ApiError::PuzzleNotOpen(_) => StatusCode::CONFLICT,
            ApiError::LoadFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidIndex(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
