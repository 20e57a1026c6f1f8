//! Special user registry.

use std::collections::HashMap;

use crate::config::SpecialUserConfig;

/// A user displayed with a role badge and custom colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialUser {
    /// Exact username.
    pub username: String,
    /// Role label.
    pub kind: String,
    /// Username color.
    pub username_color: String,
    /// Badge color.
    pub badge_color: String,
}

impl SpecialUser {
    /// Create a new special user entry.
    pub fn new(
        username: impl Into<String>,
        kind: impl Into<String>,
        username_color: impl Into<String>,
        badge_color: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            kind: kind.into(),
            username_color: username_color.into(),
            badge_color: badge_color.into(),
        }
    }
}

impl From<&SpecialUserConfig> for SpecialUser {
    fn from(config: &SpecialUserConfig) -> Self {
        Self::new(
            &config.username,
            &config.kind,
            &config.username_color,
            &config.badge_color,
        )
    }
}

/// Immutable lookup table of special users, keyed by username.
#[derive(Debug, Clone, Default)]
pub struct SpecialUserRegistry {
    users: HashMap<String, SpecialUser>,
}

impl SpecialUserRegistry {
    /// Build a registry from a list of users.
    ///
    /// When a username appears twice the later entry wins.
    pub fn new(users: impl IntoIterator<Item = SpecialUser>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// Build a registry from configuration entries.
    pub fn from_config(entries: &[SpecialUserConfig]) -> Self {
        Self::new(entries.iter().map(SpecialUser::from))
    }

    /// Look up a user by exact username.
    pub fn get(&self, username: &str) -> Option<&SpecialUser> {
        self.users.get(username)
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;

    #[test]
    fn test_registry_from_default_config() {
        let registry = SpecialUserRegistry::from_config(&ChatConfig::default().special_users);
        assert_eq!(registry.len(), 2);

        let helper = registry.get("kmisterk").unwrap();
        assert_eq!(helper.kind, "Helper");
        assert_eq!(helper.username_color, "#00b0f4");
        assert_eq!(helper.badge_color, "#691785");
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry =
            SpecialUserRegistry::new([SpecialUser::new("Alice", "Mod", "#fff", "#000")]);
        assert!(registry.get("Alice").is_some());
        assert!(registry.get("alice").is_none());
        assert!(registry.get("Alice ").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = SpecialUserRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get("anyone").is_none());
    }
}
