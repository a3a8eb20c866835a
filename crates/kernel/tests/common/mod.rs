#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wraps the REAL router and state; requests are driven through
//! `tower::ServiceExt::oneshot`, so no socket is bound.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use stock_shell::menu::{LoadMode, NavConfig};
use stock_shell::{AppState, Config, routes};

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// App serving the built-in navigation.
    pub fn new() -> Self {
        Self::with_navigation(NavConfig::builtin().expect("built-in navigation loads"))
    }

    /// App serving a YAML navigation document.
    pub fn from_yaml(yaml: &str) -> Self {
        Self::with_navigation(
            NavConfig::from_yaml_str(yaml, LoadMode::Strict).expect("fixture navigation loads"),
        )
    }

    pub fn with_navigation(navigation: NavConfig) -> Self {
        let state = AppState::with_navigation(navigation);
        let router = routes::app(state.clone(), &Config::default());
        Self { router, state }
    }

    /// Send a GET request, returning status and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Send a GET request and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {body}"));
        (status, json)
    }
}
