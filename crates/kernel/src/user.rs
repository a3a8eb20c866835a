//! User context supplied by the session layer.
//!
//! The shell never authenticates anyone: the caller hands over the role flags
//! it already knows about and navigation visibility is evaluated against them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known role flag names used by the stock-app frontend.
pub mod well_known {
    /// Elevated privilege: user and organisation administration.
    pub const SUPERADMIN: &str = "is_superadmin";

    /// Support staff: access to the support desk.
    pub const SUPPORT: &str = "is_support";
}

/// Role flags for the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Whether the user is signed in.
    #[serde(default)]
    pub authenticated: bool,
    /// Named boolean role flags. Missing flags read as `false`.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl UserContext {
    /// Create context for anonymous user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create context for a signed-in user with no role flags.
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            flags: BTreeMap::new(),
        }
    }

    /// Set a role flag.
    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Build a context from a list of flag names that are set.
    pub fn from_flags<I, S>(authenticated: bool, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authenticated,
            flags: names.into_iter().map(|n| (n.into(), true)).collect(),
        }
    }

    /// Read a role flag.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Check if user is a superadmin.
    pub fn is_superadmin(&self) -> bool {
        self.flag(well_known::SUPERADMIN)
    }

    /// Check if user is support staff.
    pub fn is_support(&self) -> bool {
        self.flag(well_known::SUPPORT)
    }
}
