//! Role validation.
//!
//! Checks every role's grants and parents against the catalog before any
//! edge is wired, so an invalid configuration never reaches cycle
//! detection or closure.

use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::permissions::{role_node, PermissionRef};

/// Validate all role grants and inheritance lists.
///
/// Roles are visited in id order and grants in declaration order; the
/// first problem found is returned.
///
/// # Errors
///
/// - [`GraphError::UnknownRoleReference`] for a `role:<id>` grant naming no
///   declared role
/// - [`GraphError::UnknownPermission`] for any other grant that is not a
///   catalog member
/// - [`GraphError::UnknownParentRole`] for an undeclared parent
pub(crate) fn validate_roles(config: &GraphConfig, catalog: &Catalog) -> GraphResult<()> {
    for (role_id, role) in &config.roles {
        for grant in &role.permissions {
            match PermissionRef::parse(grant) {
                PermissionRef::Role(ref referenced) => {
                    if !catalog.contains(&role_node(referenced)) {
                        return Err(GraphError::UnknownRoleReference {
                            role: role_id.clone(),
                            reference: grant.clone(),
                        });
                    }
                }
                PermissionRef::Literal(ref permission) => {
                    if !catalog.contains(permission) {
                        return Err(GraphError::UnknownPermission {
                            role: role_id.clone(),
                            permission: permission.clone(),
                        });
                    }
                }
            }
        }

        for parent in &role.inherits {
            if !catalog.contains(&role_node(parent)) {
                return Err(GraphError::UnknownParentRole {
                    role: role_id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    Ok(())
}
