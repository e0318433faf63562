//! Error types for permission graph construction
//!
//! Every variant here is a construction-time failure. Once a
//! [`PermissionGraph`](crate::PermissionGraph) exists, queries never fail:
//! unknown permission strings simply yield `false` or an empty result.

use thiserror::Error;

/// Permission graph construction errors.
///
/// Any of these aborts the build; no partially built graph is ever returned.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A role grants a permission string that is not in the catalog
    #[error("Role '{role}' grants unknown permission '{permission}'")]
    UnknownPermission {
        /// Role declaring the grant.
        role: String,
        /// The offending permission string.
        permission: String,
    },

    /// A role grants a `role:` reference that names no declared role
    #[error("Role '{role}' references unknown role '{reference}'")]
    UnknownRoleReference {
        /// Role declaring the grant.
        role: String,
        /// The offending `role:` reference.
        reference: String,
    },

    /// A role inherits from a parent that is not declared
    #[error("Role '{role}' inherits from unknown role '{parent}'")]
    UnknownParentRole {
        /// Role declaring the inheritance.
        role: String,
        /// The missing parent role id.
        parent: String,
    },

    /// The direct implication graph contains a cycle
    #[error("Circular dependency detected at '{node}': {}", .path.join(" -> "))]
    CircularDependency {
        /// A node on the cycle.
        node: String,
        /// The cycle, starting and ending at `node`.
        path: Vec<String>,
    },

    /// A module, resource, action or role name is malformed
    #[error("Invalid {kind} name: '{name}'")]
    InvalidName {
        /// What the name identifies (module, resource, action, role).
        kind: &'static str,
        /// The rejected name.
        name: String,
    },

    /// A module uses a name reserved by the permission string syntax
    #[error("Module name '{name}' is reserved")]
    ReservedName {
        /// The reserved name.
        name: String,
    },

    /// A role's `id` field disagrees with the key it is declared under
    #[error("Role declared under '{key}' has mismatched id '{id}'")]
    RoleIdMismatch {
        /// Key in the roles mapping.
        key: String,
        /// The `id` field of the definition.
        id: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal invariant violated while building the graph
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for permission graph construction.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Check if this error is an unknown role reference, either in a grant
    /// list or an inheritance list.
    pub fn is_role_reference(&self) -> bool {
        matches!(
            self,
            GraphError::UnknownRoleReference { .. } | GraphError::UnknownParentRole { .. }
        )
    }

    /// Check if this error comes from the configuration shape rather than
    /// from role or graph semantics.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GraphError::InvalidName { .. }
                | GraphError::ReservedName { .. }
                | GraphError::RoleIdMismatch { .. }
                | GraphError::Json(_)
        )
    }

    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphError::UnknownPermission { .. } => "UNKNOWN_PERMISSION",
            GraphError::UnknownRoleReference { .. } => "UNKNOWN_ROLE_REFERENCE",
            GraphError::UnknownParentRole { .. } => "UNKNOWN_PARENT_ROLE",
            GraphError::CircularDependency { .. } => "CIRCULAR_DEPENDENCY",
            GraphError::InvalidName { .. } => "INVALID_NAME",
            GraphError::ReservedName { .. } => "RESERVED_NAME",
            GraphError::RoleIdMismatch { .. } => "ROLE_ID_MISMATCH",
            GraphError::Json(_) => "INVALID_CONFIG",
            GraphError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
