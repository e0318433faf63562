//! # Permissions
//!
//! Permission strings and their parsed form.
//!
//! A permission combines a scope with an action:
//!
//! ```text
//! *:delete                 - delete anything, anywhere
//! users:*                  - every action on the users module
//! users:update             - update the users module
//! users.profile:read       - read the profile resource of users
//! role:admin               - holding the admin role
//! ```
//!
//! Role references share the string space with literal permissions but are
//! parsed into a separate [`PermissionRef`] variant so the two can never be
//! confused while validating or wiring roles.

use std::fmt;

/// Scope prefix reserved for role nodes (`role:<id>`).
pub const ROLE_PREFIX: &str = "role";

/// Wildcard used both as the global scope and as the "every action" action.
pub const WILDCARD: &str = "*";

/// Build the graph node identifier for a role id.
///
/// # Example
///
/// ```
/// use permission_graph::permissions::role_node;
///
/// assert_eq!(role_node("admin"), "role:admin");
/// ```
pub fn role_node(role_id: &str) -> String {
    format!("{}:{}", ROLE_PREFIX, role_id)
}

/// The scope a permission applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Every module (`*`).
    Global,
    /// A whole module.
    Module {
        /// Module name.
        module: String,
    },
    /// A single resource inside a module.
    Resource {
        /// Owning module name.
        module: String,
        /// Resource name.
        resource: String,
    },
}

impl Scope {
    /// Create a module scope.
    pub fn module(module: impl Into<String>) -> Self {
        Scope::Module {
            module: module.into(),
        }
    }

    /// Create a resource scope.
    pub fn resource(module: impl Into<String>, resource: impl Into<String>) -> Self {
        Scope::Resource {
            module: module.into(),
            resource: resource.into(),
        }
    }

    /// Get the textual prefix (`*`, `users` or `users.profile`).
    pub fn prefix(&self) -> String {
        match self {
            Scope::Global => WILDCARD.to_string(),
            Scope::Module { module } => module.clone(),
            Scope::Resource { module, resource } => format!("{}.{}", module, resource),
        }
    }

    /// Permission string for `action` at this scope.
    pub fn permission(&self, action: &str) -> String {
        format!("{}:{}", self.prefix(), action)
    }

    /// Wildcard permission string at this scope (`scope:*`).
    pub fn wildcard(&self) -> String {
        self.permission(WILDCARD)
    }

    fn parse(s: &str) -> Option<Self> {
        if s == WILDCARD {
            return Some(Scope::Global);
        }
        match s.split_once('.') {
            Some((module, resource)) => {
                if module.is_empty() || resource.is_empty() || resource.contains('.') {
                    return None;
                }
                Some(Scope::resource(module, resource))
            }
            None if s.is_empty() => None,
            None => Some(Scope::module(s)),
        }
    }
}

/// The action part of a permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionSpec {
    /// A named action from the hierarchy.
    Named(String),
    /// Every action (`*`).
    Wildcard,
}

impl ActionSpec {
    /// Get the textual form of the action.
    pub fn as_str(&self) -> &str {
        match self {
            ActionSpec::Named(action) => action,
            ActionSpec::Wildcard => WILDCARD,
        }
    }
}

/// A literal permission: scope plus action.
///
/// # Example
///
/// ```
/// use permission_graph::permissions::{ActionSpec, Permission, Scope};
///
/// let perm = Permission::parse("users.profile:read").unwrap();
/// assert_eq!(perm.scope, Scope::resource("users", "profile"));
/// assert_eq!(perm.action, ActionSpec::Named("read".to_string()));
/// assert_eq!(perm.to_string(), "users.profile:read");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    /// Where the permission applies.
    pub scope: Scope,
    /// What it allows.
    pub action: ActionSpec,
}

impl Permission {
    /// Create a permission for a named action.
    pub fn new(scope: Scope, action: impl Into<String>) -> Self {
        Self {
            scope,
            action: ActionSpec::Named(action.into()),
        }
    }

    /// Create a wildcard permission for a scope.
    pub fn wildcard(scope: Scope) -> Self {
        Self {
            scope,
            action: ActionSpec::Wildcard,
        }
    }

    /// Parse a literal permission string.
    ///
    /// Only checks syntax; whether the permission exists is decided by the
    /// catalog. Role references (`role:<id>`) are not literal permissions
    /// and return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let (scope, action) = s.split_once(':')?;
        if scope == ROLE_PREFIX || action.is_empty() || action.contains(':') {
            return None;
        }

        let scope = Scope::parse(scope)?;
        let action = if action == WILDCARD {
            ActionSpec::Wildcard
        } else {
            ActionSpec::Named(action.to_string())
        };

        Some(Self { scope, action })
    }

    /// Check if this permission uses the wildcard action.
    pub fn is_wildcard(&self) -> bool {
        self.action == ActionSpec::Wildcard
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope.prefix(), self.action.as_str())
    }
}

/// A permission string as it appears in a role's grant list.
///
/// Grants are either literal permissions or references to another role.
/// Both are stored as plain node identifiers in the graph, but validation
/// treats them differently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionRef {
    /// A literal permission string such as `users:read`.
    Literal(String),
    /// A reference to another role by id.
    Role(String),
}

impl PermissionRef {
    /// Classify a grant string.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_graph::permissions::PermissionRef;
    ///
    /// assert_eq!(
    ///     PermissionRef::parse("role:viewer"),
    ///     PermissionRef::Role("viewer".to_string())
    /// );
    /// assert_eq!(
    ///     PermissionRef::parse("users:read"),
    ///     PermissionRef::Literal("users:read".to_string())
    /// );
    /// ```
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((ROLE_PREFIX, id)) => PermissionRef::Role(id.to_string()),
            _ => PermissionRef::Literal(s.to_string()),
        }
    }

    /// Get the graph node identifier for this reference.
    pub fn node_id(&self) -> String {
        match self {
            PermissionRef::Literal(permission) => permission.clone(),
            PermissionRef::Role(id) => role_node(id),
        }
    }
}

impl fmt::Display for PermissionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node_id())
    }
}
