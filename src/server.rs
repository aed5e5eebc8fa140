//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use pixnum_engine::{KeyValueStore, Palette};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::services::SessionManager;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub palette: Arc<Palette>,
    pub sessions: Arc<SessionManager>,
}

impl FromRef<AppState> for Arc<SessionManager> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<Palette> {
    fn from_ref(state: &AppState) -> Self {
        state.palette.clone()
    }
}

/// Create application state from an asset loader and a progress store.
pub fn create_app_state(
    asset_loader: Arc<AssetLoader>,
    store: Arc<dyn KeyValueStore>,
) -> anyhow::Result<AppState> {
    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    Ok(create_app_state_with_config(asset_loader, config, store))
}

/// Create application state with an already loaded config.
pub fn create_app_state_with_config(
    asset_loader: Arc<AssetLoader>,
    config: Arc<AppConfig>,
    store: Arc<dyn KeyValueStore>,
) -> AppState {
    let palette = Arc::new(config.palette_or_default());
    tracing::debug!(colors = palette.len(), "Palette ready");
    let sessions = Arc::new(SessionManager::new(
        config.clone(),
        asset_loader,
        palette.clone(),
        store,
    ));

    AppState {
        config,
        palette,
        sessions,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/palette", get(api::handle_palette))
        .route("/api/puzzles", get(api::handle_list_puzzles))
        .route("/api/puzzles/:id", get(api::handle_state))
        .route("/api/puzzles/:id/open", post(api::handle_open))
        .route("/api/puzzles/:id/grid", get(api::handle_grid))
        .route("/api/puzzles/:id/paint", post(api::handle_paint))
        .route("/api/puzzles/:id/brush", post(api::handle_brush))
        .route("/api/puzzles/:id/selection", put(api::handle_select))
        .route("/api/puzzles/:id/advance", post(api::handle_advance))
        .route(
            "/api/puzzles/:id/progress/:index",
            get(api::handle_color_progress),
        )
        .route("/api/puzzles/:id/reset", post(api::handle_reset_puzzle))
        .route("/api/puzzles/:id/close", post(api::handle_close))
        .route("/api/progress/reset", post(api::handle_reset_all))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
