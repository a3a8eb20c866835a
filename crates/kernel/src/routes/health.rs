//! Health check endpoint.
//!
//! Navigation is loaded before the server binds, so a running server is
//! healthy; the body reports what was loaded.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    items: usize,
    routes: usize,
    warnings: usize,
}

/// Health check handler.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let nav = state.navigation();
    Json(HealthResponse {
        status: "healthy",
        items: nav.tree().len(),
        routes: nav.paths().len(),
        warnings: nav.report().issues.len(),
    })
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
