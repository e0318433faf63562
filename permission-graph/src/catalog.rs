//! Permission catalog.
//!
//! The catalog is the finite universe of permission strings derivable from
//! a configuration. Every node of the implication graph is a catalog
//! member; role grants are validated against it.
//!
//! Members are kept sorted and addressed by a dense index so the graph can
//! store adjacency as integer sets.

use std::collections::{BTreeSet, HashMap};

use crate::actions::ActionHierarchy;
use crate::config::GraphConfig;
use crate::permissions::{role_node, Scope};

/// The frozen set of valid permission strings.
#[derive(Debug, Clone, Default)]
pub(crate) struct Catalog {
    /// Members, sorted.
    names: Vec<String>,
    /// Member name to index in `names`.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Generate the catalog for a configuration.
    ///
    /// For every action `a`: `*:a`. For every module `m`: `m:*` and `m:a`.
    /// For every resource `r` of `m`: `m.r:*` and `m.r:a`. For every role
    /// `id`: `role:id`.
    pub(crate) fn generate(config: &GraphConfig, hierarchy: &ActionHierarchy) -> Self {
        let mut members = BTreeSet::new();

        for action in hierarchy.actions() {
            members.insert(Scope::Global.permission(action));
        }

        for (module, resources) in &config.modules {
            let scopes = std::iter::once(Scope::module(module))
                .chain(resources.iter().map(|r| Scope::resource(module, r)));

            for scope in scopes {
                members.insert(scope.wildcard());
                for action in hierarchy.actions() {
                    members.insert(scope.permission(action));
                }
            }
        }

        for role_id in config.roles.keys() {
            members.insert(role_node(role_id));
        }

        Self::from_members(members)
    }

    fn from_members(members: BTreeSet<String>) -> Self {
        let names: Vec<String> = members.into_iter().collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Number of permissions in the catalog.
    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if a permission string is a catalog member.
    pub(crate) fn contains(&self, permission: &str) -> bool {
        self.index.contains_key(permission)
    }

    /// Get the index of a permission string.
    pub(crate) fn index_of(&self, permission: &str) -> Option<usize> {
        self.index.get(permission).copied()
    }

    /// Get the permission string at an index.
    pub(crate) fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Iterate over all members, sorted.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
