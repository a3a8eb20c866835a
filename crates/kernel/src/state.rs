//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::menu::NavConfig;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Navigation tree, paths and icons. Never mutated after startup.
    navigation: NavConfig,
}

impl AppState {
    /// Build state from configuration, loading navigation.
    pub fn new(config: &Config) -> Result<Self> {
        let navigation = config.load_navigation()?;
        info!(
            items = navigation.tree().len(),
            routes = navigation.paths().len(),
            "navigation ready"
        );
        Ok(Self::with_navigation(navigation))
    }

    /// Build state around an already loaded navigation config.
    pub fn with_navigation(navigation: NavConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { navigation }),
        }
    }

    /// Get the navigation config.
    pub fn navigation(&self) -> &NavConfig {
        &self.inner.navigation
    }
}
