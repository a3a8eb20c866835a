//! Navigation tree evaluator.
//!
//! Projects the static tree onto one request: hidden subtrees are dropped,
//! every remaining node is annotated with its active state and the original
//! order is kept. The projection is pure; malformed nodes are rendered in a
//! degraded form and reported back as [`ConfigIssue`]s instead of failing.

use serde::Serialize;
use tracing::warn;

use super::item::{MatchKind, NavItem, NavTree};
use super::validate::{ConfigIssue, node_issues};
use crate::icons::IconRegistry;
use crate::user::UserContext;

/// Rendered node shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Link,
    Group,
    Divider,
}

/// A visible navigation node annotated for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    pub key: String,
    pub kind: RenderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Matches the current path itself or through a descendant.
    pub active: bool,
    /// The most specific match: matches and no descendant is active.
    pub selected: bool,
    pub disabled: bool,
    pub external: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<RenderNode>,
}

impl RenderNode {
    /// Depth-first search for a rendered node by key.
    pub fn find<'a>(nodes: &'a [RenderNode], key: &str) -> Option<&'a RenderNode> {
        nodes.iter().find_map(|node| {
            if node.key == key {
                Some(node)
            } else {
                Self::find(&node.items, key)
            }
        })
    }
}

/// Output of [`resolve_report`]: the render tree plus every configuration
/// problem encountered on a visible node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub items: Vec<RenderNode>,
    pub issues: Vec<ConfigIssue>,
}

/// Resolve the tree for a user and path. Icon names pass through unchanged.
pub fn resolve(tree: &NavTree, user: &UserContext, current_path: &str) -> Vec<RenderNode> {
    resolve_report(tree, user, current_path, None).items
}

/// Resolve the tree and report configuration problems.
///
/// With an icon registry, icon names are mapped to their renderable
/// identifiers and names that do not resolve render with no icon.
pub fn resolve_report(
    tree: &NavTree,
    user: &UserContext,
    current_path: &str,
    icons: Option<&IconRegistry>,
) -> Resolution {
    let mut walker = Walker {
        user,
        current_path,
        icons,
        issues: Vec::new(),
    };
    let items = walker.nodes(tree.items());

    for issue in &walker.issues {
        warn!(%issue, path = %current_path, "navigation config issue");
    }

    Resolution {
        items,
        issues: walker.issues,
    }
}

struct Walker<'a> {
    user: &'a UserContext,
    current_path: &'a str,
    icons: Option<&'a IconRegistry>,
    issues: Vec<ConfigIssue>,
}

impl Walker<'_> {
    fn nodes(&mut self, items: &[NavItem]) -> Vec<RenderNode> {
        items.iter().filter_map(|item| self.node(item)).collect()
    }

    fn node(&mut self, item: &NavItem) -> Option<RenderNode> {
        if !item.is_visible_to(self.user) {
            return None;
        }

        self.issues.extend(node_issues(item, self.icons));

        if item.is_divider() {
            return Some(RenderNode {
                key: item.key.clone(),
                kind: RenderKind::Divider,
                title: None,
                href: None,
                icon: None,
                active: false,
                selected: false,
                disabled: false,
                external: false,
                items: Vec::new(),
            });
        }

        let items = self.nodes(item.children());
        let matched = !item.external && is_match(item, self.current_path);
        let descendant_active = items.iter().any(|child| child.active);

        let icon = match (&item.icon, self.icons) {
            (Some(name), Some(registry)) => registry.get(name).map(str::to_string),
            (Some(name), None) => Some(name.clone()),
            (None, _) => None,
        };

        Some(RenderNode {
            key: item.key.clone(),
            kind: if item.is_group() {
                RenderKind::Group
            } else {
                RenderKind::Link
            },
            title: item.title.clone(),
            href: item.href.clone(),
            icon,
            active: matched || descendant_active,
            selected: matched && !descendant_active,
            disabled: item.disabled,
            external: item.external,
            items,
        })
    }
}

/// Whether `item` itself matches `current_path`, ignoring descendants.
///
/// Without a matcher the item's `href` must equal the path exactly. A matcher
/// without its own `href` compares against the item's. Matcher targets that
/// are not absolute paths never match.
pub fn is_match(item: &NavItem, current_path: &str) -> bool {
    let Some(matcher) = &item.matcher else {
        return item.href.as_deref() == Some(current_path);
    };
    let Some(target) = matcher.href.as_deref().or(item.href.as_deref()) else {
        return false;
    };
    if !target.starts_with('/') {
        return false;
    }
    match &matcher.kind {
        MatchKind::StartsWith => starts_with_segment(current_path, target),
        MatchKind::Equals => current_path == target,
        MatchKind::Unrecognized(_) => false,
    }
}

/// Prefix match on whole path segments: `/a/b` covers `/a/b` and `/a/b/c`
/// but not `/a/bc`.
fn starts_with_segment(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::item::{Matcher, ShowRule};
    use crate::user::well_known;

    fn find<'a>(nodes: &'a [RenderNode], key: &str) -> &'a RenderNode {
        RenderNode::find(nodes, key).unwrap()
    }

    #[test]
    fn segment_prefix() {
        assert!(starts_with_segment("/dashboard/products", "/dashboard/products"));
        assert!(starts_with_segment("/dashboard/products/42", "/dashboard/products"));
        assert!(!starts_with_segment("/dashboard/productsx", "/dashboard/products"));
        assert!(!starts_with_segment("/dashboard", "/dashboard/products"));
        assert!(starts_with_segment("/anything", "/"));
        assert!(starts_with_segment("/docs/a", "/docs/"));
    }

    #[test]
    fn exact_match_without_matcher() {
        let item = NavItem::link("home", "Home", "/dashboard");
        assert!(is_match(&item, "/dashboard"));
        assert!(!is_match(&item, "/dashboard/"));
        assert!(!is_match(&item, "/dashboard/products"));
    }

    #[test]
    fn matcher_falls_back_to_item_href() {
        let item = NavItem::link("products", "Products", "/dashboard/products").with_matcher(
            Matcher {
                kind: MatchKind::StartsWith,
                href: None,
            },
        );
        assert!(is_match(&item, "/dashboard/products/42"));
    }

    #[test]
    fn equals_matcher_uses_own_href() {
        let item = NavItem::link("new", "New", "/dashboard/products/new?draft=1")
            .with_matcher(Matcher::equals("/dashboard/products/new"));
        assert!(is_match(&item, "/dashboard/products/new"));
    }

    #[test]
    fn relative_matcher_target_never_matches() {
        let tree = NavTree::new(vec![
            NavItem::link("empty", "Empty", "/e").with_matcher(Matcher::starts_with("")),
            NavItem::link("bare", "Bare", "/dashboard")
                .with_matcher(Matcher::starts_with("dashboard")),
        ]);

        let res = resolve_report(&tree, &UserContext::anonymous(), "/anything/else", None);
        assert!(res.items.iter().all(|n| !n.active));
        let res = resolve_report(&tree, &UserContext::anonymous(), "/dashboard", None);
        assert!(res.items.iter().all(|n| !n.active));
        assert!(
            res.issues
                .iter()
                .all(|i| matches!(i, ConfigIssue::RelativeMatcherHref { .. }))
        );
        assert_eq!(res.issues.len(), 2);
    }

    #[test]
    fn hidden_parent_hides_subtree() {
        let tree = NavTree::new(vec![
            NavItem::group(
                "admin",
                "Admin",
                vec![NavItem::link("users", "Users", "/dashboard/users")],
            )
            .with_show(ShowRule::requires(well_known::SUPERADMIN)),
            NavItem::link("home", "Home", "/dashboard"),
        ]);

        let nodes = resolve(&tree, &UserContext::authenticated(), "/dashboard/users");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, "home");
        assert!(RenderNode::find(&nodes, "users").is_none());

        let admin = UserContext::authenticated().with_flag(well_known::SUPERADMIN, true);
        let nodes = resolve(&tree, &admin, "/dashboard/users");
        assert!(find(&nodes, "admin").active);
        assert!(!find(&nodes, "admin").selected);
        assert!(find(&nodes, "users").selected);
    }

    #[test]
    fn deepest_match_is_selected() {
        let tree = NavTree::new(vec![NavItem::group(
            "settings",
            "Settings",
            vec![
                NavItem::link("profile", "Profile", "/dashboard/settings/profile")
                    .with_matcher(Matcher::starts_with("/dashboard/settings/profile")),
            ],
        )
        .with_href("/dashboard/settings")
        .with_matcher(Matcher::starts_with("/dashboard/settings"))]);

        let nodes = resolve(&tree, &UserContext::anonymous(), "/dashboard/settings/profile/edit");
        let settings = find(&nodes, "settings");
        assert!(settings.active);
        assert!(!settings.selected);
        assert!(find(&nodes, "profile").selected);

        let nodes = resolve(&tree, &UserContext::anonymous(), "/dashboard/settings");
        assert!(find(&nodes, "settings").selected);
        assert!(!find(&nodes, "profile").active);
    }

    #[test]
    fn dividers_pass_through_inactive() {
        let tree = NavTree::new(vec![
            NavItem::divider("d1"),
            NavItem::divider("d2"),
            NavItem::link("home", "Home", "/"),
            NavItem::divider("d3"),
            NavItem::divider("staff-only").with_show(ShowRule::requires(well_known::SUPPORT)),
        ]);
        let nodes = resolve(&tree, &UserContext::anonymous(), "/");
        let keys: Vec<&str> = nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, ["d1", "d2", "home", "d3"]);
        assert!(nodes.iter().filter(|n| n.kind == RenderKind::Divider).all(|n| !n.active));
    }

    #[test]
    fn malformed_nodes_degrade_and_report() {
        let mut divider = NavItem::divider("div").with_href("/x");
        divider.title = Some("oops".to_string());
        let tree = NavTree::new(vec![
            NavItem::link("regex", "Regex", "/r").with_matcher(Matcher {
                kind: MatchKind::Unrecognized("regex".to_string()),
                href: Some("/r".to_string()),
            }),
            NavItem {
                key: "orphan".to_string(),
                title: Some("Orphan".to_string()),
                ..NavItem::default()
            },
            divider,
        ]);

        let res = resolve_report(&tree, &UserContext::anonymous(), "/r", None);
        assert_eq!(res.items.len(), 3);
        assert!(!find(&res.items, "regex").active);
        let orphan = find(&res.items, "orphan");
        assert_eq!(orphan.kind, RenderKind::Link);
        assert!(orphan.href.is_none());
        assert!(!orphan.active);
        let div = find(&res.items, "div");
        assert_eq!(div.kind, RenderKind::Divider);
        assert!(div.href.is_none() && div.title.is_none());

        assert_eq!(res.issues.len(), 4);
        assert!(matches!(res.issues[0], ConfigIssue::UnknownMatcherKind { .. }));
        assert!(matches!(res.issues[1], ConfigIssue::EmptyLeaf { .. }));
    }

    #[test]
    fn hidden_nodes_are_not_reported() {
        let tree = NavTree::new(vec![
            NavItem {
                key: "orphan".to_string(),
                ..NavItem::default()
            }
            .with_show(ShowRule::Authenticated),
        ]);
        let res = resolve_report(&tree, &UserContext::anonymous(), "/", None);
        assert!(res.items.is_empty());
        assert!(res.issues.is_empty());
    }

    #[test]
    fn icons_resolve_or_drop() {
        let tree = NavTree::new(vec![
            NavItem::link("home", "Home", "/").with_icon("chart-pie"),
            NavItem::link("rocket", "Rocket", "/rocket").with_icon("rocket"),
        ]);
        let icons = IconRegistry::builtin();

        let res = resolve_report(&tree, &UserContext::anonymous(), "/", Some(&icons));
        assert_eq!(find(&res.items, "home").icon.as_deref(), Some("ChartPieIcon"));
        assert_eq!(find(&res.items, "rocket").icon, None);
        assert!(matches!(res.issues[0], ConfigIssue::UnknownIcon { .. }));

        let raw = resolve(&tree, &UserContext::anonymous(), "/");
        assert_eq!(find(&raw, "rocket").icon.as_deref(), Some("rocket"));
    }

    #[test]
    fn external_never_active_disabled_still_evaluated() {
        let tree = NavTree::new(vec![
            NavItem::link("ext", "Status", "/status").external(),
            NavItem::link("soon", "Reports", "/reports").disabled(),
        ]);
        let nodes = resolve(&tree, &UserContext::anonymous(), "/status");
        assert!(!find(&nodes, "ext").active);
        assert!(find(&nodes, "ext").external);

        let nodes = resolve(&tree, &UserContext::anonymous(), "/reports");
        let soon = find(&nodes, "soon");
        assert!(soon.disabled);
        assert!(soon.active);
    }
}
