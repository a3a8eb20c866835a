//! stock-shell library
//!
//! Role-gated navigation, the named path registry and the HTTP surface that
//! serves them to the stock-app UI shell. The `stock-shell` binary wraps this
//! library with `serve`, `check` and `resolve` commands.

pub mod config;
pub mod error;
pub mod icons;
pub mod menu;
pub mod paths;
pub mod routes;
pub mod state;
pub mod user;

pub use config::Config;
pub use state::AppState;
