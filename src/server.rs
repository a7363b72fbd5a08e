//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::{Html, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{PageRenderer, RestoreService, ResultStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub restore_service: Arc<RestoreService>,
    pub result_store: Arc<ResultStore>,
    pub pages: Arc<PageRenderer>,
}

/// Create application state from configuration.
///
/// Creates the upload and result directories and validates the tuning
/// overrides before anything is served.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let options = config
        .restore_options()
        .map_err(|e| anyhow::anyhow!("Invalid tuning configuration: {e}"))?;
    let restore_service = Arc::new(RestoreService::new(options)?);

    let result_store = Arc::new(ResultStore::new(
        &config.static_dir,
        &config.upload_dir,
        &config.result_dir,
    ));
    result_store.ensure_dirs()?;

    let pages = Arc::new(
        PageRenderer::new().map_err(|e| anyhow::anyhow!("Failed to load page template: {e}"))?,
    );

    Ok(AppState {
        config: Arc::new(config),
        restore_service,
        result_store,
        pages,
    })
}

/// Build the router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Static files
/// (uploads and results) are served from the configured static root.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Upload page
        .route("/", get(handle_index))
        .route("/enhance", post(handle_enhance_form))
        // API endpoints
        .route("/api/enhance", post(handle_enhance_api))
        .route("/api/modes", get(api::handle_modes))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .nest_service("/static", static_files)
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    api::handle_index(State(state.pages)).await
}

async fn handle_enhance_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    api::handle_enhance_form(
        State(state.restore_service),
        State(state.result_store),
        State(state.pages),
        multipart,
    )
    .await
}

async fn handle_enhance_api(
    State(state): State<AppState>,
    query: Query<api::EnhanceQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    api::handle_enhance_api(State(state.restore_service), query, multipart).await
}
