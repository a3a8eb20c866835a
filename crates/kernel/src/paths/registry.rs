//! Path registry - the single source of truth for URL strings.
//!
//! Pages and navigation items refer to paths by symbolic name. An entry is
//! either a literal path (`/dashboard/products`) or a builder with exactly one
//! `:param` segment (`/dashboard/products/:id`) that turns an identifier into
//! a concrete path.
//!
//! The name `match` is reserved: `/api/paths/match` is the reverse lookup.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors raised while registering or using path entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    #[error("route {name} needs a `{param}` parameter")]
    NeedsParam { name: String, param: String },

    #[error("route {0} takes no parameter")]
    NotABuilder(String),

    #[error("invalid value {value:?} for route parameter `{param}`")]
    InvalidParam { param: String, value: String },

    #[error("invalid pattern for route {name}: {reason}")]
    BadPattern { name: String, reason: String },
}

/// Route names that collide with fixed endpoints under `/api/paths`.
const RESERVED_NAMES: &[&str] = &["match"];

/// A registered path: literal, or a single-parameter builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
    Literal(String),
    Builder { pattern: String, param: String },
}

impl PathEntry {
    /// Parse a pattern string into an entry.
    fn parse(name: &str, pattern: &str) -> Result<Self, PathError> {
        let bad = |reason: &str| PathError::BadPattern {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(bad("route name is empty"));
        }
        if RESERVED_NAMES.contains(&name) {
            return Err(bad("route name is reserved"));
        }
        if !pattern.starts_with('/') {
            return Err(bad("pattern must start with '/'"));
        }

        let params: Vec<&str> = pattern
            .split('/')
            .filter_map(|seg| seg.strip_prefix(':'))
            .collect();

        match params.as_slice() {
            [] => Ok(Self::Literal(pattern.to_string())),
            [param] if !param.is_empty() => Ok(Self::Builder {
                pattern: pattern.to_string(),
                param: (*param).to_string(),
            }),
            [_] => Err(bad("parameter segment has no name")),
            _ => Err(bad("builders take exactly one parameter")),
        }
    }

    /// The registered pattern (the literal path for literal entries).
    pub fn pattern(&self) -> &str {
        match self {
            Self::Literal(path) => path,
            Self::Builder { pattern, .. } => pattern,
        }
    }

    /// Parameter name for builder entries.
    pub fn param(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Builder { param, .. } => Some(param),
        }
    }
}

/// Listing row for a registered path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSummary {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// Result of matching a concrete path against registered entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathMatch {
    /// Name of the matched entry.
    pub name: String,
    /// Pattern of the matched entry.
    pub pattern: String,
    /// Path parameters extracted (e.g., {"id": "42"})
    pub params: BTreeMap<String, String>,
}

/// Registry of named paths.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    /// All entries, indexed by name
    entries: BTreeMap<String, PathEntry>,
    /// Entry names ordered for matching (most specific first)
    routes: Vec<String>,
}

impl PathRegistry {
    /// Create an empty path registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from `name -> pattern` pairs.
    pub fn from_patterns<I, K, V>(patterns: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut registry = Self::new();
        for (name, pattern) in patterns {
            registry.insert(name.into(), pattern.as_ref())?;
        }
        registry.build_routes();
        Ok(registry)
    }

    /// Register a path entry, replacing any entry with the same name.
    pub fn register(&mut self, name: impl Into<String>, pattern: &str) -> Result<(), PathError> {
        self.insert(name.into(), pattern)?;
        self.build_routes();
        Ok(())
    }

    fn insert(&mut self, name: String, pattern: &str) -> Result<(), PathError> {
        let entry = PathEntry::parse(&name, pattern)?;
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Order entry names for path matching.
    fn build_routes(&mut self) {
        self.routes = self.entries.keys().cloned().collect();

        // Literal before parameterized, deeper before shallower, then by name
        let entries = &self.entries;
        self.routes.sort_by_key(|name| {
            let pattern = entries.get(name).map(PathEntry::pattern).unwrap_or_default();
            let param_count = pattern.split('/').filter(|seg| seg.starts_with(':')).count();
            let segment_count = pattern.matches('/').count();
            (param_count, -(segment_count as i32), name.clone())
        });

        debug!(routes = self.routes.len(), "built path table");
    }

    /// Get an entry by name.
    pub fn get(&self, name: &str) -> Option<&PathEntry> {
        self.entries.get(name)
    }

    /// Look up a literal path by name.
    pub fn path(&self, name: &str) -> Result<&str, PathError> {
        match self.lookup(name)? {
            PathEntry::Literal(path) => Ok(path),
            PathEntry::Builder { param, .. } => Err(PathError::NeedsParam {
                name: name.to_string(),
                param: param.clone(),
            }),
        }
    }

    /// Build a concrete path from a builder entry and an identifier.
    pub fn build(&self, name: &str, id: &str) -> Result<String, PathError> {
        match self.lookup(name)? {
            PathEntry::Literal(_) => Err(PathError::NotABuilder(name.to_string())),
            PathEntry::Builder { pattern, param } => {
                if id.is_empty() || id.contains(['/', '?', '#']) {
                    return Err(PathError::InvalidParam {
                        param: param.clone(),
                        value: id.to_string(),
                    });
                }
                let placeholder = format!(":{param}");
                Ok(pattern
                    .split('/')
                    .map(|seg| if seg == placeholder { id } else { seg })
                    .collect::<Vec<_>>()
                    .join("/"))
            }
        }
    }

    /// Resolve a name to a path, building it when an identifier is given.
    pub fn href(&self, name: &str, id: Option<&str>) -> Result<String, PathError> {
        match id {
            Some(id) => self.build(name, id),
            None => self.path(name).map(str::to_string),
        }
    }

    fn lookup(&self, name: &str) -> Result<&PathEntry, PathError> {
        self.entries
            .get(name)
            .ok_or_else(|| PathError::UnknownRoute(name.to_string()))
    }

    /// Match a concrete path against registered entries.
    pub fn match_path(&self, path: &str) -> Option<PathMatch> {
        for name in &self.routes {
            if let Some(entry) = self.entries.get(name)
                && let Some(params) = match_pattern(entry.pattern(), path)
            {
                return Some(PathMatch {
                    name: name.clone(),
                    pattern: entry.pattern().to_string(),
                    params: params.into_iter().collect(),
                });
            }
        }
        None
    }

    /// All entries in name order.
    pub fn summaries(&self) -> Vec<PathSummary> {
        self.entries
            .iter()
            .map(|(name, entry)| PathSummary {
                name: name.clone(),
                path: entry.pattern().to_string(),
                param: entry.param().map(str::to_string),
            })
            .collect()
    }

    /// Get entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/dashboard/products/:id"
/// Path: "/dashboard/products/42"
/// Result: Some({"id": "42"})
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.insert(param_name.to_string(), actual.to_string());
        } else if pat != actual {
            return None;
        }
    }

    Some(params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn registry() -> PathRegistry {
        PathRegistry::from_patterns([
            ("dashboard", "/dashboard"),
            ("products", "/dashboard/products"),
            ("product", "/dashboard/products/:id"),
            ("product_new", "/dashboard/products/new"),
        ])
        .unwrap()
    }

    #[test]
    fn match_pattern_exact() {
        let params = match_pattern("/dashboard/products", "/dashboard/products");
        assert!(params.unwrap().is_empty());
    }

    #[test]
    fn match_pattern_with_param() {
        let params = match_pattern("/dashboard/products/:id", "/dashboard/products/42").unwrap();
        assert_eq!(params.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn match_pattern_no_match() {
        assert!(match_pattern("/dashboard/products", "/dashboard/users").is_none());
        assert!(match_pattern("/dashboard/products/:id", "/dashboard/products/4/2").is_none());
        assert!(match_pattern("/dashboard/products/:id", "/dashboard/products/").is_none());
    }

    #[test]
    fn literal_lookup() {
        let registry = registry();
        assert_eq!(registry.path("products").unwrap(), "/dashboard/products");
        assert_eq!(
            registry.path("missing"),
            Err(PathError::UnknownRoute("missing".to_string()))
        );
    }

    #[test]
    fn builder_requires_param() {
        let registry = registry();
        assert!(matches!(
            registry.path("product"),
            Err(PathError::NeedsParam { .. })
        ));
        assert_eq!(
            registry.build("product", "42").unwrap(),
            "/dashboard/products/42"
        );
        assert_eq!(
            registry.build("dashboard", "42"),
            Err(PathError::NotABuilder("dashboard".to_string()))
        );
    }

    #[test]
    fn builder_rejects_unsafe_ids() {
        let registry = registry();
        for id in ["", "a/b", "a?b", "a#b"] {
            assert!(matches!(
                registry.build("product", id),
                Err(PathError::InvalidParam { .. })
            ));
        }
    }

    #[test]
    fn bad_patterns_are_rejected() {
        let mut registry = PathRegistry::new();
        assert!(registry.register("relative", "dashboard").is_err());
        assert!(registry.register("two", "/a/:x/:y").is_err());
        assert!(registry.register("nameless", "/a/:").is_err());
        assert!(registry.register("", "/a").is_err());
        assert!(matches!(
            registry.register("match", "/m"),
            Err(PathError::BadPattern { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn literal_wins_over_param() {
        let registry = registry();
        let m = registry.match_path("/dashboard/products/new").unwrap();
        assert_eq!(m.name, "product_new");

        let m = registry.match_path("/dashboard/products/42").unwrap();
        assert_eq!(m.name, "product");
        assert_eq!(m.params.get("id"), Some(&"42".to_string()));

        assert!(registry.match_path("/nowhere").is_none());
    }

    #[test]
    fn colon_inside_literal_segment_is_not_a_param() {
        let registry =
            PathRegistry::from_patterns([("any", "/x/:id"), ("colon", "/x/b:c")]).unwrap();
        assert!(matches!(registry.get("colon"), Some(PathEntry::Literal(_))));

        let m = registry.match_path("/x/b:c").unwrap();
        assert_eq!(m.name, "colon");
        assert!(m.params.is_empty());
        assert_eq!(registry.match_path("/x/7").unwrap().name, "any");
    }

    #[test]
    fn summaries_are_name_ordered() {
        let names: Vec<String> = registry().summaries().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["dashboard", "product", "product_new", "products"]);
    }
}
