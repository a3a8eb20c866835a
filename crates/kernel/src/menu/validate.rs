//! Configuration validation pass.
//!
//! Validation walks the whole tree and collects every problem instead of
//! stopping at the first one, so `stock-shell check` can report a config in a
//! single run. The loader runs it at startup; the evaluator reuses the per-node
//! checks to report what it had to degrade while rendering.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use super::error::NavError;
use super::item::{MatchKind, NavItem, NavTree};
use crate::icons::IconRegistry;

/// How bad an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConfigIssue {
    #[error("item at {position} has an empty key")]
    EmptyKey { position: String },

    #[error("duplicate key {key} among siblings")]
    DuplicateSiblingKey { key: String },

    #[error("key {key} is used {count} times in the tree")]
    DuplicateKey { key: String, count: usize },

    #[error("divider {key} carries {}", .fields.join(", "))]
    DividerWithFields {
        key: String,
        fields: Vec<&'static str>,
    },

    #[error("divider {key} has a title")]
    DividerWithTitle { key: String },

    #[error("item {key} has neither href nor items")]
    EmptyLeaf { key: String },

    #[error("item {key} uses unrecognized matcher kind {kind:?}")]
    UnknownMatcherKind { key: String, kind: String },

    #[error("item {key} has a matcher but no href to match against")]
    MatcherWithoutHref { key: String },

    #[error("item {key} has internal href {href:?} that does not start with '/'")]
    RelativeHref { key: String, href: String },

    #[error("item {key} has matcher href {href:?} that does not start with '/'")]
    RelativeMatcherHref { key: String, href: String },

    #[error("item {key} references unknown icon {icon:?}")]
    UnknownIcon { key: String, icon: String },
}

impl ConfigIssue {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateKey { .. } | Self::DividerWithTitle { .. } | Self::UnknownIcon { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// Everything found by [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ConfigIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Fail if any error-severity issue was found. Warnings pass through.
    pub fn into_result(self) -> Result<Self, NavError> {
        if self.has_errors() {
            Err(NavError::Invalid(self))
        } else {
            Ok(self)
        }
    }
}

/// Validate a navigation tree. Icon names are only checked when a registry
/// is supplied.
pub fn validate(tree: &NavTree, icons: Option<&IconRegistry>) -> ValidationReport {
    let mut issues = Vec::new();
    check_siblings(tree.items(), "", icons, &mut issues);

    // Tree-wide uniqueness is a recommendation; sibling clashes are already errors.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for (_, item) in tree.walk() {
        if item.key.is_empty() {
            continue;
        }
        let count = counts.entry(item.key.as_str()).or_insert(0);
        if *count == 0 {
            order.push(item.key.as_str());
        }
        *count += 1;
    }
    for key in order {
        let count = counts.get(key).copied().unwrap_or(0);
        if count > 1 {
            issues.push(ConfigIssue::DuplicateKey {
                key: key.to_string(),
                count,
            });
        }
    }

    ValidationReport { issues }
}

fn check_siblings(
    items: &[NavItem],
    parent: &str,
    icons: Option<&IconRegistry>,
    issues: &mut Vec<ConfigIssue>,
) {
    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let position = if parent.is_empty() {
            index.to_string()
        } else {
            format!("{parent}/{index}")
        };

        if item.key.is_empty() {
            issues.push(ConfigIssue::EmptyKey {
                position: position.clone(),
            });
        } else if !seen.insert(item.key.as_str()) {
            issues.push(ConfigIssue::DuplicateSiblingKey {
                key: item.key.clone(),
            });
        }

        if let Some(href) = &item.href
            && !item.external
            && !href.starts_with('/')
        {
            issues.push(ConfigIssue::RelativeHref {
                key: item.key.clone(),
                href: href.clone(),
            });
        }

        issues.extend(node_issues(item, icons));
        check_siblings(item.children(), &position, icons, issues);
    }
}

/// Problems visible on a single node, independent of its position.
pub(crate) fn node_issues(item: &NavItem, icons: Option<&IconRegistry>) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let key = || item.key.clone();

    if item.is_divider() {
        let mut fields = Vec::new();
        if item.href.is_some() {
            fields.push("href");
        }
        if item.icon.is_some() {
            fields.push("icon");
        }
        if item.items.is_some() {
            fields.push("items");
        }
        if item.matcher.is_some() {
            fields.push("matcher");
        }
        if !fields.is_empty() {
            issues.push(ConfigIssue::DividerWithFields { key: key(), fields });
        }
        if item.title.is_some() {
            issues.push(ConfigIssue::DividerWithTitle { key: key() });
        }
        return issues;
    }

    if item.href.is_none() && item.items.is_none() {
        issues.push(ConfigIssue::EmptyLeaf { key: key() });
    }

    if let Some(matcher) = &item.matcher {
        if let MatchKind::Unrecognized(kind) = &matcher.kind {
            issues.push(ConfigIssue::UnknownMatcherKind {
                key: key(),
                kind: kind.clone(),
            });
        } else if matcher.href.is_none() && item.href.is_none() {
            issues.push(ConfigIssue::MatcherWithoutHref { key: key() });
        }

        if let Some(href) = &matcher.href
            && !item.external
            && !href.starts_with('/')
        {
            issues.push(ConfigIssue::RelativeMatcherHref {
                key: key(),
                href: href.clone(),
            });
        }
    }

    if let (Some(icon), Some(registry)) = (&item.icon, icons)
        && !registry.contains(icon)
    {
        issues.push(ConfigIssue::UnknownIcon {
            key: key(),
            icon: icon.clone(),
        });
    }

    issues
}
