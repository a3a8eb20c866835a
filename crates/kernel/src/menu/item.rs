//! Navigation tree model.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::user::UserContext;

/// Node discriminator. Only dividers are tagged; everything else is a link
/// or a group depending on whether it has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKind {
    Divider,
}

/// Pure visibility function for trees built in code.
#[derive(Clone, Copy)]
pub struct Predicate(pub fn(&UserContext) -> bool);

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(<fn>)")
    }
}

/// Visibility rule evaluated against the user context.
///
/// Declarative rules serialize as `authenticated`, `{requires: flag}`,
/// `{any: [...]}`, `{all: [...]}` and `{not: rule}`. [`ShowRule::Predicate`]
/// only exists for trees built in code and cannot be serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowRule {
    Authenticated,
    Requires(String),
    Any(Vec<ShowRule>),
    All(Vec<ShowRule>),
    Not(Box<ShowRule>),
    #[serde(skip_serializing)]
    Predicate(Predicate),
}

const RULE_NAMES: &[&str] = &["authenticated", "requires", "any", "all", "not"];

// serde_yml reads derived enums only from `!tag` syntax; rules are plain maps.
impl<'de> Deserialize<'de> for ShowRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ShowRuleVisitor)
    }
}

struct ShowRuleVisitor;

impl<'de> Visitor<'de> for ShowRuleVisitor {
    type Value = ShowRule;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`authenticated` or a map with exactly one of requires, any, all, not")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ShowRule, E> {
        match value {
            "authenticated" => Ok(ShowRule::Authenticated),
            other => Err(E::unknown_variant(other, RULE_NAMES)),
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ShowRule, A::Error> {
        let Some(name) = map.next_key::<String>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        let rule = match name.as_str() {
            "requires" => ShowRule::Requires(map.next_value()?),
            "any" => ShowRule::Any(map.next_value()?),
            "all" => ShowRule::All(map.next_value()?),
            "not" => ShowRule::Not(map.next_value()?),
            other => return Err(de::Error::unknown_variant(other, RULE_NAMES)),
        };
        if map.next_key::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        Ok(rule)
    }
}

impl ShowRule {
    /// Rule requiring a single role flag.
    pub fn requires(flag: impl Into<String>) -> Self {
        Self::Requires(flag.into())
    }

    /// Rule backed by a plain function.
    pub fn predicate(f: fn(&UserContext) -> bool) -> Self {
        Self::Predicate(Predicate(f))
    }

    /// Evaluate the rule. `any` of nothing is false, `all` of nothing is true.
    pub fn evaluate(&self, user: &UserContext) -> bool {
        match self {
            Self::Authenticated => user.authenticated,
            Self::Requires(flag) => user.flag(flag),
            Self::Any(rules) => rules.iter().any(|r| r.evaluate(user)),
            Self::All(rules) => rules.iter().all(|r| r.evaluate(user)),
            Self::Not(rule) => !rule.evaluate(user),
            Self::Predicate(Predicate(f)) => f(user),
        }
    }
}

/// How a matcher compares the current path.
///
/// Unknown kinds are kept rather than rejected so a bad config still renders;
/// they never match and are reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchKind {
    StartsWith,
    Equals,
    Unrecognized(String),
}

impl From<String> for MatchKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "starts_with" | "startsWith" => Self::StartsWith,
            "equals" => Self::Equals,
            _ => Self::Unrecognized(kind),
        }
    }
}

impl From<MatchKind> for String {
    fn from(kind: MatchKind) -> Self {
        match kind {
            MatchKind::StartsWith => "starts_with".to_string(),
            MatchKind::Equals => "equals".to_string(),
            MatchKind::Unrecognized(other) => other,
        }
    }
}

/// Active-state rule for a navigation item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    pub kind: MatchKind,
    /// Path to compare against. Falls back to the item's own `href`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Matcher {
    pub fn starts_with(href: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::StartsWith,
            href: Some(href.into()),
        }
    }

    pub fn equals(href: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::Equals,
            href: Some(href.into()),
        }
    }
}

/// A node in the navigation tree.
#[derive(Debug, Clone, Default)]
pub struct NavItem {
    /// Stable identifier, unique among siblings.
    pub key: String,
    pub title: Option<String>,
    pub href: Option<String>,
    /// Name in the icon registry.
    pub icon: Option<String>,
    /// Children. Present (even empty) makes the node a group.
    pub items: Option<Vec<NavItem>>,
    pub kind: Option<NavKind>,
    pub show: Option<ShowRule>,
    pub matcher: Option<Matcher>,
    pub disabled: bool,
    /// The href leaves the application.
    pub external: bool,
}

impl NavItem {
    /// A plain link.
    pub fn link(key: impl Into<String>, title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: Some(title.into()),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// A group header holding children.
    pub fn group(key: impl Into<String>, title: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            key: key.into(),
            title: Some(title.into()),
            items: Some(items),
            ..Self::default()
        }
    }

    /// A separator.
    pub fn divider(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: Some(NavKind::Divider),
            ..Self::default()
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_show(mut self, rule: ShowRule) -> Self {
        self.show = Some(rule);
        self
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    pub fn is_divider(&self) -> bool {
        self.kind == Some(NavKind::Divider)
    }

    pub fn is_group(&self) -> bool {
        self.items.is_some()
    }

    /// Children, or an empty slice for leaves.
    pub fn children(&self) -> &[NavItem] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Whether the item is visible to `user`. No rule means always visible.
    pub fn is_visible_to(&self, user: &UserContext) -> bool {
        self.show.as_ref().is_none_or(|rule| rule.evaluate(user))
    }
}

/// An immutable navigation tree, built once and passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct NavTree {
    items: Vec<NavItem>,
}

impl NavTree {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { items }
    }

    /// Top-level items in configured order.
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Depth-first, pre-order walk with depth (roots are depth 0).
    pub fn walk(&self) -> impl Iterator<Item = (usize, &NavItem)> {
        let mut stack: Vec<(usize, &NavItem)> = self.items.iter().rev().map(|i| (0, i)).collect();
        std::iter::from_fn(move || {
            let (depth, item) = stack.pop()?;
            stack.extend(item.children().iter().rev().map(|c| (depth + 1, c)));
            Some((depth, item))
        })
    }

    /// Find the first item with `key`, searching depth-first.
    pub fn find(&self, key: &str) -> Option<&NavItem> {
        self.walk().map(|(_, item)| item).find(|item| item.key == key)
    }

    /// Total node count.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<NavItem>> for NavTree {
    fn from(items: Vec<NavItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::user::well_known;

    #[test]
    fn show_rules_compose() {
        let admin = UserContext::authenticated().with_flag(well_known::SUPERADMIN, true);
        let support = UserContext::authenticated().with_flag(well_known::SUPPORT, true);
        let anon = UserContext::anonymous();

        let staff = ShowRule::Any(vec![
            ShowRule::requires(well_known::SUPERADMIN),
            ShowRule::requires(well_known::SUPPORT),
        ]);
        assert!(staff.evaluate(&admin));
        assert!(staff.evaluate(&support));
        assert!(!staff.evaluate(&anon));

        let signed_in_non_admin = ShowRule::All(vec![
            ShowRule::Authenticated,
            ShowRule::Not(Box::new(ShowRule::requires(well_known::SUPERADMIN))),
        ]);
        assert!(!signed_in_non_admin.evaluate(&admin));
        assert!(signed_in_non_admin.evaluate(&support));
        assert!(!signed_in_non_admin.evaluate(&anon));

        assert!(!ShowRule::Any(vec![]).evaluate(&admin));
        assert!(ShowRule::All(vec![]).evaluate(&anon));
    }

    #[test]
    fn predicate_rule() {
        fn support_only(user: &UserContext) -> bool {
            user.is_support() && !user.is_superadmin()
        }
        let rule = ShowRule::predicate(support_only);
        assert!(rule.evaluate(&UserContext::anonymous().with_flag(well_known::SUPPORT, true)));
        assert!(!rule.evaluate(&UserContext::anonymous()));
    }

    #[test]
    fn show_rule_from_json() {
        let rule: ShowRule = serde_json::from_str(
            r#"{"all": ["authenticated", {"not": {"requires": "is_superadmin"}}]}"#,
        )
        .unwrap();
        let support = UserContext::authenticated().with_flag(well_known::SUPPORT, true);
        let admin = UserContext::authenticated().with_flag(well_known::SUPERADMIN, true);
        assert!(rule.evaluate(&support));
        assert!(!rule.evaluate(&admin));
        assert!(!rule.evaluate(&UserContext::anonymous()));

        assert!(serde_json::from_str::<ShowRule>(r#""anonymous""#).is_err());
        assert!(serde_json::from_str::<ShowRule>(r#"{"role": "x"}"#).is_err());
        assert!(serde_json::from_str::<ShowRule>(r#"{}"#).is_err());
        assert!(
            serde_json::from_str::<ShowRule>(r#"{"requires": "a", "any": []}"#).is_err()
        );
    }

    #[test]
    fn match_kind_from_string() {
        assert_eq!(MatchKind::from("startsWith".to_string()), MatchKind::StartsWith);
        assert_eq!(MatchKind::from("starts_with".to_string()), MatchKind::StartsWith);
        assert_eq!(MatchKind::from("equals".to_string()), MatchKind::Equals);
        assert_eq!(
            MatchKind::from("regex".to_string()),
            MatchKind::Unrecognized("regex".to_string())
        );
    }

    #[test]
    fn walk_is_preorder() {
        let tree = NavTree::new(vec![
            NavItem::link("a", "A", "/a"),
            NavItem::group(
                "b",
                "B",
                vec![
                    NavItem::link("b1", "B1", "/b/1"),
                    NavItem::group("b2", "B2", vec![NavItem::link("b2x", "X", "/b/2/x")]),
                ],
            ),
            NavItem::divider("d"),
        ]);

        let order: Vec<(usize, &str)> = tree.walk().map(|(d, i)| (d, i.key.as_str())).collect();
        assert_eq!(
            order,
            [(0, "a"), (0, "b"), (1, "b1"), (1, "b2"), (2, "b2x"), (0, "d")]
        );
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.find("b2x").and_then(|i| i.href.as_deref()), Some("/b/2/x"));
    }
}
