//! Navigation menu for the stock-app shell.
//!
//! The menu is a static, role-gated tree loaded once at startup and provides:
//! - Visibility per user context (`show` rules)
//! - Active/selected state per request path (matchers)
//! - A validation pass for configuration mistakes

mod error;
mod item;
mod loader;
mod resolve;
mod validate;

pub use error::NavError;
pub use item::{MatchKind, Matcher, NavItem, NavKind, NavTree, Predicate, ShowRule};
pub use loader::{LoadMode, NavConfig};
pub use resolve::{RenderKind, RenderNode, Resolution, is_match, resolve, resolve_report};
pub use validate::{ConfigIssue, Severity, ValidationReport, validate};
