//! Icon registry: icon names used in navigation config mapped to the
//! component identifiers the UI shell renders.

use std::collections::BTreeMap;

/// Built-in icons, matching the frontend's `navIcons` table.
const BUILTIN_ICONS: &[(&str, &str)] = &[
    ("chart-pie", "ChartPieIcon"),
    ("gear-six", "GearSixIcon"),
    ("lifebuoy", "LifebuoyIcon"),
    ("package", "PackageIcon"),
    ("plugs-connected", "PlugsConnectedIcon"),
    ("user", "UserIcon"),
    ("users", "UsersIcon"),
    ("x-square", "XSquareIcon"),
];

/// Name -> renderable icon identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconRegistry {
    icons: BTreeMap<String, String>,
}

impl IconRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the stock-app icon set.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, component) in BUILTIN_ICONS {
            registry.register(*name, *component);
        }
        registry
    }

    /// Register an icon, replacing any previous mapping for `name`.
    pub fn register(&mut self, name: impl Into<String>, component: impl Into<String>) {
        self.icons.insert(name.into(), component.into());
    }

    /// Merge another registry over this one.
    pub fn extend(&mut self, other: IconRegistry) {
        self.icons.extend(other.icons);
    }

    /// Resolve an icon name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IconRegistry {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            icons: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_resolves_known_names() {
        let icons = IconRegistry::builtin();
        assert_eq!(icons.get("chart-pie"), Some("ChartPieIcon"));
        assert_eq!(icons.get("rocket"), None);
    }

    #[test]
    fn extend_overrides() {
        let mut icons = IconRegistry::builtin();
        icons.extend([("user", "AvatarIcon"), ("rocket", "RocketIcon")].into_iter().collect());
        assert_eq!(icons.get("user"), Some("AvatarIcon"));
        assert_eq!(icons.get("rocket"), Some("RocketIcon"));
        assert_eq!(icons.len(), BUILTIN_ICONS.len() + 1);
    }
}
