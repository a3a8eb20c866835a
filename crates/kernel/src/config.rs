//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::menu::{LoadMode, NavConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Navigation config document. When None, the built-in navigation is used.
    pub nav_config: Option<PathBuf>,

    /// Keep a navigation config that fails validation (default: false).
    pub nav_lenient: bool,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            nav_config: None,
            nav_lenient: false,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let nav_config = env::var("NAV_CONFIG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let nav_lenient = env::var("NAV_LENIENT")
            .map(|v| parse_bool(&v))
            .unwrap_or(Ok(false))
            .context("NAV_LENIENT must be true or false")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            nav_config,
            nav_lenient,
            cors_allowed_origins,
        })
    }

    pub fn load_mode(&self) -> LoadMode {
        if self.nav_lenient {
            LoadMode::Lenient
        } else {
            LoadMode::Strict
        }
    }

    /// Load the navigation this configuration points at.
    pub fn load_navigation(&self) -> Result<NavConfig> {
        match &self.nav_config {
            Some(path) => NavConfig::load(path, self.load_mode())
                .with_context(|| format!("failed to load navigation from {}", path.display())),
            None => NavConfig::builtin().context("built-in navigation is invalid"),
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("not a boolean: {other}"),
    }
}
