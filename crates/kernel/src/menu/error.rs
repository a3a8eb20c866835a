//! Navigation configuration errors.

use thiserror::Error;

use super::validate::ValidationReport;
use crate::paths::PathError;

/// Errors raised while loading navigation configuration.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0} (expected .yml, .yaml or .json)")]
    UnsupportedFormat(String),

    #[error("item {key}: {source}")]
    Route {
        key: String,
        #[source]
        source: PathError,
    },

    #[error("item {0} sets both href and route")]
    HrefAndRoute(String),

    #[error("route table: {0}")]
    Paths(#[from] PathError),

    #[error("navigation config has {} error(s)", .0.errors().count())]
    Invalid(ValidationReport),
}
