//! Direct edge construction.
//!
//! Wires the one-hop implications between catalog members:
//!
//! - **Action hierarchy** at every scope (`*`, each module, each
//!   `module.resource`): `scope:a -> scope:b` for each `b` that `a`
//!   implies, and `scope:* -> scope:a` for every action.
//! - **Module cascade**: `module:a -> module.resource:a` and
//!   `module:* -> module.resource:*`.
//! - **Global cascade**: `*:a -> module:a`.
//! - **Roles**: `role:id -> grant` for each grant, `role:id -> role:parent`
//!   for each inherited parent.
//!
//! Roles must already be validated; an endpoint missing from the catalog
//! here is an internal error.

use crate::actions::ActionHierarchy;
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::ImplicationGraph;
use crate::permissions::{role_node, PermissionRef, Scope};

/// Builds the direct (pre-closure) implication graph.
pub(crate) struct GraphBuilder<'a> {
    catalog: &'a Catalog,
    hierarchy: &'a ActionHierarchy,
    graph: ImplicationGraph,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder over a catalog.
    pub(crate) fn new(catalog: &'a Catalog, hierarchy: &'a ActionHierarchy) -> Self {
        Self {
            catalog,
            hierarchy,
            graph: ImplicationGraph::new(catalog.len()),
        }
    }

    /// Wire every direct edge for `config` and return the graph.
    pub(crate) fn build(mut self, config: &GraphConfig) -> GraphResult<ImplicationGraph> {
        let hierarchy = self.hierarchy;

        // Global scope has no `*:*` node, so no wildcard edges there.
        self.apply_hierarchy(&Scope::Global, false)?;

        for (module, resources) in &config.modules {
            let module_scope = Scope::module(module);
            self.apply_hierarchy(&module_scope, true)?;

            for action in hierarchy.actions() {
                self.link(&Scope::Global.permission(action), &module_scope.permission(action))?;
            }

            for resource in resources {
                let resource_scope = Scope::resource(module, resource);
                self.apply_hierarchy(&resource_scope, true)?;

                self.link(&module_scope.wildcard(), &resource_scope.wildcard())?;
                for action in hierarchy.actions() {
                    self.link(
                        &module_scope.permission(action),
                        &resource_scope.permission(action),
                    )?;
                }
            }
        }

        for (role_id, role) in &config.roles {
            let node = role_node(role_id);
            for grant in &role.permissions {
                self.link(&node, &PermissionRef::parse(grant).node_id())?;
            }
            for parent in &role.inherits {
                self.link(&node, &role_node(parent))?;
            }
        }

        Ok(self.graph)
    }

    fn apply_hierarchy(&mut self, scope: &Scope, with_wildcard: bool) -> GraphResult<()> {
        let hierarchy = self.hierarchy;
        for action in hierarchy.actions() {
            let from = scope.permission(action);
            for implied in hierarchy.implied(action) {
                self.link(&from, &scope.permission(implied))?;
            }
            if with_wildcard {
                self.link(&scope.wildcard(), &from)?;
            }
        }
        Ok(())
    }

    fn link(&mut self, from: &str, to: &str) -> GraphResult<()> {
        let catalog = self.catalog;
        let resolve = |name: &str| {
            catalog
                .index_of(name)
                .ok_or_else(|| GraphError::Internal(format!("'{}' is not in the catalog", name)))
        };
        let (from, to) = (resolve(from)?, resolve(to)?);
        self.graph.add_edge(from, to);
        Ok(())
    }
}
