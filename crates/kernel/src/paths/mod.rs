//! Named paths shared by pages and navigation.
//!
//! Provides:
//! - Literal paths and single-parameter path builders by name
//! - Reverse matching from a concrete path to its entry

mod registry;

pub use registry::{PathEntry, PathError, PathMatch, PathRegistry, PathSummary};
