//! Resolved navigation for the UI shell.
//!
//! The shell passes the current path and the role flags it got from the
//! session layer; the response is the visible tree annotated with
//! active/selected state.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::menu::Resolution;
use crate::state::AppState;
use crate::user::UserContext;

/// Query parameters for navigation resolution.
#[derive(Debug, Deserialize)]
struct NavigationQuery {
    /// Current request path.
    path: String,
    /// Comma-separated role flags that are set.
    #[serde(default)]
    flags: Option<String>,
    #[serde(default)]
    authenticated: bool,
}

impl NavigationQuery {
    fn user(&self) -> UserContext {
        let flags = self
            .flags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty());
        UserContext::from_flags(self.authenticated, flags)
    }
}

/// Resolve navigation for the given path and user flags.
async fn resolve_navigation(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> AppResult<Json<Resolution>> {
    if !query.path.starts_with('/') {
        return Err(AppError::BadRequest(format!(
            "path must start with '/': {}",
            query.path
        )));
    }

    let user = query.user();
    Ok(Json(state.navigation().resolve(&user, &query.path)))
}

/// Create the navigation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/navigation", get(resolve_navigation))
}
