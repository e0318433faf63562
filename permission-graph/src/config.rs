//! Graph configuration.
//!
//! A [`GraphConfig`] is the single immutable input to graph construction:
//! the module/resource layout, optional roles, and an optional action
//! hierarchy overriding the CRUD default. It deserializes from JSON with
//! `serde_json`; reading files or command-line flags is left to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::actions::ActionHierarchy;
use crate::error::{GraphError, GraphResult};
use crate::permissions::{ROLE_PREFIX, WILDCARD};

/// Configuration for a permission graph.
///
/// # Example
///
/// ```
/// use permission_graph::config::{GraphConfig, RoleDefinition};
///
/// let config = GraphConfig::new()
///     .module("users", ["profile", "settings"])
///     .module("posts", ["content", "comments"])
///     .role(RoleDefinition::new("editor", "Editor").grant("posts:update"));
///
/// assert_eq!(config.resource_count(), 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Module name to ordered resource names.
    #[serde(default)]
    pub modules: BTreeMap<String, Vec<String>>,

    /// Role id to role definition.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, RoleDefinition>,

    /// Custom action hierarchy. `None` means the CRUD default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<ActionHierarchy>,
}

impl GraphConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON string.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_graph::config::GraphConfig;
    ///
    /// let config = GraphConfig::from_json_str(r#"{
    ///     "modules": { "users": ["profile"] },
    ///     "roles": {
    ///         "viewer": { "id": "viewer", "name": "Viewer", "permissions": ["users:read"] }
    ///     }
    /// }"#).unwrap();
    ///
    /// assert_eq!(config.modules["users"], vec!["profile"]);
    /// assert_eq!(config.roles["viewer"].permissions, vec!["users:read"]);
    /// ```
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a configuration from an already decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> GraphResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Add a module with its resources.
    pub fn module<I, S>(mut self, name: impl Into<String>, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules
            .insert(name.into(), resources.into_iter().map(Into::into).collect());
        self
    }

    /// Add a role, keyed by its id.
    pub fn role(mut self, role: RoleDefinition) -> Self {
        self.roles.insert(role.id.clone(), role);
        self
    }

    /// Override the action hierarchy.
    pub fn hierarchy(mut self, hierarchy: ActionHierarchy) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    /// Get the effective action hierarchy.
    pub fn action_hierarchy(&self) -> ActionHierarchy {
        self.hierarchy.clone().unwrap_or_default()
    }

    /// Total number of resources across all modules.
    pub fn resource_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    /// Check the configuration shape.
    ///
    /// This covers names, reserved words and the hierarchy's action
    /// labels. Role grants are checked against the generated catalog later,
    /// during [`PermissionGraph::build`](crate::PermissionGraph::build).
    pub fn validate(&self) -> GraphResult<()> {
        if let Some(hierarchy) = &self.hierarchy {
            hierarchy.validate()?;
        }

        for (module, resources) in &self.modules {
            check_name("module", module)?;
            if module == ROLE_PREFIX {
                return Err(GraphError::ReservedName {
                    name: module.clone(),
                });
            }
            for resource in resources {
                check_name("resource", resource)?;
            }
        }

        for (key, role) in &self.roles {
            if key.is_empty() || key.contains(':') {
                return Err(GraphError::InvalidName {
                    kind: "role",
                    name: key.clone(),
                });
            }
            if !role.id.is_empty() && role.id != *key {
                return Err(GraphError::RoleIdMismatch {
                    key: key.clone(),
                    id: role.id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Reject names that would break the permission string syntax.
pub(crate) fn check_name(kind: &'static str, name: &str) -> GraphResult<()> {
    let malformed = name.is_empty()
        || name == WILDCARD
        || name.contains(|c: char| matches!(c, ':' | '.' | '*'));
    if malformed {
        return Err(GraphError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// A role: a named bundle of permissions, optionally inheriting others.
///
/// Roles live in the same string space as permissions (`role:<id>`), so
/// holding a role is itself a permission that implies everything it grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Role id. Empty means "same as the key it is declared under".
    #[serde(default)]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Permission strings granted directly. May include `role:<id>`.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Parent role ids this role inherits from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleDefinition {
    /// Create a role with no grants.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Grant a permission string.
    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Inherit from a parent role.
    pub fn inherits(mut self, parent: impl Into<String>) -> Self {
        self.inherits.push(parent.into());
        self
    }

    /// Set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
