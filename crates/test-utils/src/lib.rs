//! stock-shell test utilities.
//!
//! Fixtures for navigation config documents, request URI builders and
//! assertion helpers over rendered navigation JSON.

use serde_json::Value as JsonValue;

/// Role flags used across fixtures.
pub mod flags {
    pub const SUPERADMIN: &str = "is_superadmin";
    pub const SUPPORT: &str = "is_support";
}

/// Navigation config documents.
pub mod nav_docs {
    use serde_json::json;

    /// The two-item tree used to describe active-state propagation: a plain
    /// home link and a settings group whose only child prefix-matches
    /// `/dashboard/settings`.
    pub fn settings_example() -> serde_json::Value {
        json!({
            "items": [
                {"key": "home", "title": "Home", "href": "/dashboard"},
                {
                    "key": "settings",
                    "title": "Settings",
                    "items": [
                        {
                            "key": "settings-profile",
                            "title": "Profile",
                            "href": "/dashboard/settings/profile",
                            "matcher": {"kind": "startsWith", "href": "/dashboard/settings"}
                        }
                    ]
                }
            ]
        })
    }

    /// A dashboard with routes, role-gated groups, dividers and an external link.
    pub fn dashboard_yaml() -> &'static str {
        r#"
routes:
  overview: /dashboard
  products: /dashboard/products
  product: /dashboard/products/:id
  users: /dashboard/users
  support: /dashboard/support

icons:
  docs: BookOpenIcon

items:
  - key: overview
    title: Overview
    route: overview
    icon: chart-pie
  - key: products
    title: Products
    route: products
    icon: package
    matcher:
      kind: startsWith
  - key: divider-1
    type: divider
  - key: admin
    title: Admin
    show:
      requires: is_superadmin
    items:
      - key: users
        title: Users
        route: users
        matcher:
          kind: startsWith
  - key: support
    title: Support
    route: support
    show:
      any:
        - requires: is_superadmin
        - requires: is_support
  - key: divider-2
    type: divider
  - key: docs
    title: Docs
    href: https://docs.stock-app.invalid
    icon: docs
    external: true
"#
    }

    /// A document with one of each error-severity problem.
    pub fn broken() -> serde_json::Value {
        json!({
            "items": [
                {"key": "dup", "title": "A", "href": "/a"},
                {"key": "dup", "title": "B", "href": "/b"},
                {"key": "div", "type": "divider", "href": "/x"},
                {"key": "orphan", "title": "Orphan"},
                {"key": "fuzzy", "title": "Fuzzy", "href": "/f", "matcher": {"kind": "fuzzy"}},
                {"key": "rel", "title": "Relative", "href": "relative"}
            ]
        })
    }
}

/// Build a `/api/navigation` request URI.
pub fn navigation_uri(path: &str, flags: &[&str], authenticated: bool) -> String {
    let mut uri = format!("/api/navigation?path={}", urlencoding::encode(path));
    if !flags.is_empty() {
        uri.push_str("&flags=");
        uri.push_str(&urlencoding::encode(&flags.join(",")));
    }
    if authenticated {
        uri.push_str("&authenticated=true");
    }
    uri
}

/// Find a rendered node by key in a JSON render tree (`[{key, items, ..}]`).
pub fn find_node<'a>(nodes: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    nodes.as_array()?.iter().find_map(|node| {
        if node.get("key").and_then(JsonValue::as_str) == Some(key) {
            Some(node)
        } else {
            node.get("items").and_then(|items| find_node(items, key))
        }
    })
}

/// Keys of every node in a JSON render tree, depth-first.
pub fn keys(nodes: &JsonValue) -> Vec<String> {
    collect(nodes, &|_| true)
}

/// Keys of every node marked active, depth-first.
pub fn active_keys(nodes: &JsonValue) -> Vec<String> {
    collect(nodes, &|node| node.get("active") == Some(&JsonValue::Bool(true)))
}

fn collect(nodes: &JsonValue, pred: &dyn Fn(&JsonValue) -> bool) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes.as_array().into_iter().flatten() {
        if pred(node)
            && let Some(key) = node.get("key").and_then(JsonValue::as_str)
        {
            out.push(key.to_string());
        }
        if let Some(items) = node.get("items") {
            out.extend(collect(items, pred));
        }
    }
    out
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}
