//! Path registry lookups for page components.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::paths::{PathMatch, PathSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct BuildQuery {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchQuery {
    path: String,
}

#[derive(Debug, Serialize)]
struct BuiltPath {
    name: String,
    path: String,
}

/// List every registered path.
async fn list_paths(State(state): State<AppState>) -> Json<Vec<PathSummary>> {
    Json(state.navigation().paths().summaries())
}

/// Look up a path by name, filling the builder parameter from `?id=`.
async fn get_path(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<BuildQuery>,
) -> AppResult<Json<BuiltPath>> {
    let path = state
        .navigation()
        .paths()
        .href(&name, query.id.as_deref())?;
    Ok(Json(BuiltPath { name, path }))
}

/// Find the entry a concrete path belongs to.
async fn match_path(
    State(state): State<AppState>,
    Query(query): Query<MatchQuery>,
) -> AppResult<Json<PathMatch>> {
    state
        .navigation()
        .paths()
        .match_path(&query.path)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no route matches {}", query.path)))
}

/// Create the path registry router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/paths", get(list_paths))
        .route("/api/paths/match", get(match_path))
        .route("/api/paths/{name}", get(get_path))
}
