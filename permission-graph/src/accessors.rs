//! Named accessors for permission strings.
//!
//! A lookup table from snake_case names to canonical permission strings,
//! generated once from the catalog:
//!
//! ```text
//! users_read            -> users:read
//! users_all             -> users:*
//! users_profile_update  -> users.profile:update
//! all_delete            -> *:delete
//! role_admin            -> role:admin
//! ```
//!
//! Lookup failure is an [`AccessorError`], unrelated to the construction
//! errors in [`GraphError`](crate::GraphError).

use std::collections::BTreeMap;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::permissions::{ActionSpec, Permission, PermissionRef, Scope};

/// Accessor lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// No permission is registered under this accessor name
    #[error("Unknown permission accessor: {0}")]
    Unknown(String),
}

/// Accessor name to permission string table.
#[derive(Debug, Clone, Default)]
pub struct AccessorTable {
    entries: BTreeMap<String, String>,
}

impl AccessorTable {
    /// Generate the table for every catalog member.
    ///
    /// When two permissions map to the same name (a module called
    /// `users_profile` next to `users.profile`), the one sorting first in
    /// the catalog keeps the name.
    pub(crate) fn generate(catalog: &Catalog) -> Self {
        let mut entries = BTreeMap::new();
        for permission in catalog.iter() {
            if let Some(name) = accessor_name(permission) {
                entries
                    .entry(name)
                    .or_insert_with(|| permission.to_string());
            }
        }
        Self { entries }
    }

    /// Look up the permission string for an accessor name.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_graph::{GraphConfig, PermissionGraph};
    ///
    /// let graph = PermissionGraph::build(&GraphConfig::new().module("users", ["profile"])).unwrap();
    /// let accessors = graph.accessors();
    ///
    /// assert_eq!(accessors.get("users_profile_read"), Ok("users.profile:read"));
    /// assert_eq!(accessors.get("all_delete"), Ok("*:delete"));
    /// assert!(accessors.get("users_fly").is_err());
    /// ```
    pub fn get(&self, name: &str) -> Result<&str, AccessorError> {
        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AccessorError::Unknown(name.to_string()))
    }

    /// Check if an accessor name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over `(name, permission)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of accessors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn accessor_name(permission: &str) -> Option<String> {
    if let PermissionRef::Role(id) = PermissionRef::parse(permission) {
        return Some(normalize(&format!("role_{}", id)));
    }

    let Permission { scope, action } = Permission::parse(permission)?;
    let scope = match scope {
        Scope::Global => "all".to_string(),
        Scope::Module { module } => module,
        Scope::Resource { module, resource } => format!("{}_{}", module, resource),
    };
    let action = match action {
        ActionSpec::Named(action) => action,
        ActionSpec::Wildcard => "all".to_string(),
    };

    Some(normalize(&format!("{}_{}", scope, action)))
}

fn normalize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphConfig, RoleDefinition};

    fn table(config: &GraphConfig) -> AccessorTable {
        AccessorTable::generate(&Catalog::generate(config, &config.action_hierarchy()))
    }

    #[test]
    fn test_accessor_names() {
        let config = GraphConfig::new()
            .module("users", ["profile"])
            .role(RoleDefinition::new("super-admin", "Super Admin"));
        let accessors = table(&config);

        assert_eq!(accessors.get("users_read"), Ok("users:read"));
        assert_eq!(accessors.get("users_all"), Ok("users:*"));
        assert_eq!(accessors.get("users_profile_all"), Ok("users.profile:*"));
        assert_eq!(accessors.get("all_create"), Ok("*:create"));
        assert_eq!(accessors.get("role_super_admin"), Ok("role:super-admin"));
    }

    #[test]
    fn test_one_accessor_per_catalog_member() {
        let config = GraphConfig::new().module("users", ["profile", "settings"]);
        let catalog = Catalog::generate(&config, &config.action_hierarchy());
        let accessors = AccessorTable::generate(&catalog);

        assert_eq!(accessors.len(), catalog.len());
        for (_, permission) in accessors.iter() {
            assert!(catalog.contains(permission));
        }
    }

    #[test]
    fn test_unknown_accessor() {
        let accessors = table(&GraphConfig::new().module("users", Vec::<String>::new()));
        assert_eq!(
            accessors.get("users_fly"),
            Err(AccessorError::Unknown("users_fly".to_string()))
        );
    }

    #[test]
    fn test_colliding_names_keep_first() {
        let config = GraphConfig::new()
            .module("users", ["profile"])
            .module("users_profile", Vec::<String>::new());
        let accessors = table(&config);

        // "users.profile:read" sorts before "users_profile:read".
        assert_eq!(accessors.get("users_profile_read"), Ok("users.profile:read"));
    }
}
