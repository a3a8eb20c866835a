//! Navigation config documents.
//!
//! A document bundles the path table, extra icons and the item tree:
//!
//! ```yaml
//! routes:
//!   dashboard.products: /dashboard/products
//!   dashboard.product: /dashboard/products/:id
//! icons:
//!   rocket: RocketIcon
//! items:
//!   - key: products
//!     title: Products
//!     route: dashboard.products
//!     matcher: { kind: startsWith }
//! ```
//!
//! Items and matchers may name a `route` instead of spelling out `href`;
//! the loader replaces it with the registered path so URL strings live in one
//! place. The resulting [`NavConfig`] is immutable.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::NavError;
use super::item::{MatchKind, Matcher, NavItem, NavKind, NavTree, ShowRule};
use super::resolve::{Resolution, resolve_report};
use super::validate::{ValidationReport, validate};
use crate::icons::IconRegistry;
use crate::paths::PathRegistry;
use crate::user::UserContext;

/// The stock-app navigation shipped with the binary.
const BUILTIN_NAVIGATION: &str = include_str!("../../config/navigation.yml");

/// What to do when validation finds error-severity issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Refuse the config.
    #[default]
    Strict,
    /// Keep the config; the evaluator degrades malformed nodes at render time.
    Lenient,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NavDocument {
    #[serde(default)]
    routes: BTreeMap<String, String>,
    #[serde(default)]
    icons: BTreeMap<String, String>,
    #[serde(default)]
    items: Vec<ItemDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemDoc {
    key: String,
    title: Option<String>,
    href: Option<String>,
    route: Option<String>,
    icon: Option<String>,
    items: Option<Vec<ItemDoc>>,
    #[serde(rename = "type")]
    kind: Option<NavKind>,
    show: Option<ShowRule>,
    matcher: Option<MatcherDoc>,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    external: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatcherDoc {
    kind: MatchKind,
    href: Option<String>,
    route: Option<String>,
}

/// Immutable navigation configuration: tree, paths and icons.
#[derive(Debug, Clone)]
pub struct NavConfig {
    tree: NavTree,
    paths: PathRegistry,
    icons: IconRegistry,
    report: ValidationReport,
}

impl NavConfig {
    /// Assemble a config from parts built in code and validate it.
    pub fn new(
        tree: NavTree,
        paths: PathRegistry,
        icons: IconRegistry,
        mode: LoadMode,
    ) -> Result<Self, NavError> {
        let report = validate(&tree, Some(&icons));
        let report = match mode {
            LoadMode::Strict => report.into_result()?,
            LoadMode::Lenient => report,
        };

        for issue in &report.issues {
            warn!(%issue, severity = ?issue.severity(), "navigation config issue");
        }

        info!(
            items = tree.len(),
            routes = paths.len(),
            icons = icons.len(),
            issues = report.issues.len(),
            "navigation loaded"
        );

        Ok(Self {
            tree,
            paths,
            icons,
            report,
        })
    }

    /// The stock-app defaults.
    pub fn builtin() -> Result<Self, NavError> {
        Self::from_yaml_str(BUILTIN_NAVIGATION, LoadMode::Strict)
    }

    /// Load a document from disk. The format follows the file extension.
    pub fn load(path: &Path, mode: LoadMode) -> Result<Self, NavError> {
        debug!(path = %path.display(), "loading navigation config");

        let content = std::fs::read_to_string(path).map_err(|source| NavError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yml" | "yaml") => Self::from_yaml_str(&content, mode),
            Some("json") => Self::from_json_str(&content, mode),
            _ => Err(NavError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_yaml_str(content: &str, mode: LoadMode) -> Result<Self, NavError> {
        let doc: NavDocument = serde_yml::from_str(content)?;
        Self::from_document(doc, mode)
    }

    pub fn from_json_str(content: &str, mode: LoadMode) -> Result<Self, NavError> {
        let doc: NavDocument = serde_json::from_str(content)?;
        Self::from_document(doc, mode)
    }

    fn from_document(doc: NavDocument, mode: LoadMode) -> Result<Self, NavError> {
        let paths = PathRegistry::from_patterns(doc.routes)?;

        let mut icons = IconRegistry::builtin();
        icons.extend(doc.icons.into_iter().collect());

        let items = doc
            .items
            .into_iter()
            .map(|item| item.into_item(&paths))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(NavTree::new(items), paths, icons, mode)
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    /// Validation result from load time (warnings, plus errors in lenient mode).
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Resolve the navigation for one request, mapping icons through this
    /// config's registry.
    pub fn resolve(&self, user: &UserContext, current_path: &str) -> Resolution {
        resolve_report(&self.tree, user, current_path, Some(&self.icons))
    }
}

impl ItemDoc {
    fn into_item(self, paths: &PathRegistry) -> Result<NavItem, NavError> {
        let href = route_or_href(&self.key, self.href, self.route, paths)?;

        let matcher = match self.matcher {
            Some(m) => Some(Matcher {
                kind: m.kind,
                href: route_or_href(&self.key, m.href, m.route, paths)?,
            }),
            None => None,
        };

        let items = match self.items {
            Some(children) => Some(
                children
                    .into_iter()
                    .map(|child| child.into_item(paths))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(NavItem {
            key: self.key,
            title: self.title,
            href,
            icon: self.icon,
            items,
            kind: self.kind,
            show: self.show,
            matcher,
            disabled: self.disabled,
            external: self.external,
        })
    }
}

fn route_or_href(
    key: &str,
    href: Option<String>,
    route: Option<String>,
    paths: &PathRegistry,
) -> Result<Option<String>, NavError> {
    match (href, route) {
        (Some(_), Some(_)) => Err(NavError::HrefAndRoute(key.to_string())),
        (Some(href), None) => Ok(Some(href)),
        (None, Some(route)) => paths
            .path(&route)
            .map(|p| Some(p.to_string()))
            .map_err(|source| NavError::Route {
                key: key.to_string(),
                source,
            }),
        (None, None) => Ok(None),
    }
}
