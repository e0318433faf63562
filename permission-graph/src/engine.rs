//! Permission graph engine.
//!
//! [`PermissionGraph::build`] runs the whole pipeline in one synchronous
//! call:
//!
//! ```text
//! config -> catalog -> role validation -> direct edges -> cycle check -> closure
//! ```
//!
//! Either every stage succeeds and a ready, immutable graph is returned, or
//! the first failure is returned and nothing else is. A ready graph has no
//! mutation API; it is `Send + Sync` and can be shared freely between
//! threads. To change the configuration, build a new graph (see
//! [`SharedPermissionGraph`](crate::SharedPermissionGraph)).
//!
//! The closed graph stores every implied permission explicitly, so a check
//! is one hash lookup per held permission. The cost is memory: densely
//! connected configurations (many modules and resources below a wildcard)
//! approach O(V²) stored edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

use crate::accessors::AccessorTable;
use crate::builder::GraphBuilder;
use crate::catalog::Catalog;
use crate::config::GraphConfig;
use crate::cycle::ensure_acyclic;
use crate::error::GraphResult;
use crate::graph::ImplicationGraph;
use crate::observer::{BuildObserver, TracingObserver};
use crate::permissions::role_node;
use crate::validate::validate_roles;

/// Identity of one built graph instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Unique id of this instance.
    pub instance_id: Uuid,
    /// When construction finished.
    pub built_at: DateTime<Utc>,
}

impl BuildInfo {
    fn now() -> Self {
        Self {
            instance_id: Uuid::now_v7(),
            built_at: Utc::now(),
        }
    }
}

/// Size statistics of a built graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Catalog size.
    pub permissions: usize,
    /// Edges after closure (direct and derived).
    pub edges: usize,
    /// Edges before closure.
    pub direct_edges: usize,
    /// Declared modules.
    pub modules: usize,
    /// Declared resources, summed over modules.
    pub resources: usize,
    /// Known actions.
    pub actions: usize,
    /// Declared roles.
    pub roles: usize,
}

/// Why a detailed check was allowed or denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CheckReason {
    /// A held permission equals the required one.
    Exact,
    /// A held permission implies the required one.
    Implied {
        /// The held permission (role ids qualified) that implies it.
        via: String,
    },
    /// No held permission implies the required one.
    Denied,
    /// The required permission is not in the catalog.
    UnknownPermission,
}

/// Result of [`PermissionGraph::check_detailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check passed.
    pub allowed: bool,
    /// The required permission.
    pub permission: String,
    /// The held permissions, as given.
    pub held: Vec<String>,
    /// Why.
    pub reason: CheckReason,
}

/// A fully built, transitively closed permission graph.
///
/// # Example
///
/// ```
/// use permission_graph::{GraphConfig, PermissionGraph, RoleDefinition};
///
/// let config = GraphConfig::new()
///     .module("users", ["profile", "settings"])
///     .module("posts", ["content", "comments"])
///     .role(RoleDefinition::new("moderator", "Moderator").grant("posts.comments:delete"));
///
/// let graph = PermissionGraph::build(&config).unwrap();
///
/// assert!(graph.has_permission(["users:update"], "users:read"));
/// assert!(graph.has_permission(["users:read"], "users.profile:read"));
/// assert!(graph.has_permission(["*:delete"], "posts:delete"));
/// assert!(!graph.has_permission(["users:create"], "users:update"));
///
/// // Bare role ids are qualified to `role:<id>`.
/// assert!(graph.has_permission(["moderator"], "posts.comments:read"));
/// ```
#[derive(Debug)]
pub struct PermissionGraph {
    catalog: Catalog,
    graph: ImplicationGraph,
    roles: HashSet<String>,
    accessors: AccessorTable,
    stats: GraphStats,
    info: BuildInfo,
}

impl PermissionGraph {
    /// Build a graph, reporting progress through `tracing`.
    pub fn build(config: &GraphConfig) -> GraphResult<Self> {
        Self::build_with_observer(config, &TracingObserver)
    }

    /// Build a graph, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Configuration errors, unknown permissions or role references in role
    /// definitions, and circular dependencies. See
    /// [`GraphError`](crate::GraphError).
    pub fn build_with_observer(
        config: &GraphConfig,
        observer: &dyn BuildObserver,
    ) -> GraphResult<Self> {
        match Self::assemble(config, observer) {
            Ok(graph) => {
                observer.on_ready(&graph.info, &graph.stats);
                Ok(graph)
            }
            Err(e) => {
                observer.on_failed(&e);
                Err(e)
            }
        }
    }

    fn assemble(config: &GraphConfig, observer: &dyn BuildObserver) -> GraphResult<Self> {
        config.validate()?;
        let hierarchy = config.action_hierarchy();

        let catalog = Catalog::generate(config, &hierarchy);
        observer.on_catalog(catalog.len());

        validate_roles(config, &catalog)?;
        observer.on_validated(config.roles.len());

        let mut graph = GraphBuilder::new(&catalog, &hierarchy).build(config)?;
        let direct_edges = graph.edge_count();
        observer.on_direct_edges(direct_edges);

        ensure_acyclic(&graph, &catalog)?;
        observer.on_acyclic();

        let added = graph.close();
        let edges = graph.edge_count();
        observer.on_closed(added, edges);

        let stats = GraphStats {
            permissions: catalog.len(),
            edges,
            direct_edges,
            modules: config.modules.len(),
            resources: config.resource_count(),
            actions: hierarchy.len(),
            roles: config.roles.len(),
        };

        Ok(Self {
            accessors: AccessorTable::generate(&catalog),
            roles: config.roles.keys().cloned().collect(),
            catalog,
            graph,
            stats,
            info: BuildInfo::now(),
        })
    }

    /// Check if the held permissions satisfy `required`.
    ///
    /// True if `required` equals a held permission or is implied by one.
    /// Held entries that are bare role ids are treated as `role:<id>`.
    /// Unknown strings never fail; they just don't match.
    pub fn has_permission<I, S>(&self, held: I, required: &str) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let target = self.catalog.index_of(required);
        held.into_iter()
            .any(|h| self.satisfies(&self.qualify(h.as_ref()), required, target))
    }

    /// Like [`has_permission`](Self::has_permission), with the reason.
    pub fn check_detailed<I, S>(&self, held: I, required: &str) -> CheckResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let held: Vec<String> = held.into_iter().map(|h| h.as_ref().to_string()).collect();
        let target = self.catalog.index_of(required);

        let mut reason = CheckReason::Denied;
        for h in &held {
            let qualified = self.qualify(h);
            if qualified == required {
                reason = CheckReason::Exact;
                break;
            }
            if self.satisfies(&qualified, required, target) {
                reason = CheckReason::Implied {
                    via: qualified.into_owned(),
                };
                break;
            }
        }
        if reason == CheckReason::Denied && target.is_none() {
            reason = CheckReason::UnknownPermission;
        }

        CheckResult {
            allowed: matches!(reason, CheckReason::Exact | CheckReason::Implied { .. }),
            permission: required.to_string(),
            held,
            reason,
        }
    }

    /// Every permission the held set grants, including the held
    /// permissions themselves.
    pub fn effective_permissions<I, S>(&self, held: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut effective = BTreeSet::new();
        for h in held {
            let qualified = self.qualify(h.as_ref());
            if let Some(node) = self.catalog.index_of(&qualified) {
                effective.extend(self.names(self.graph.implied(node)));
            }
            effective.insert(qualified.into_owned());
        }
        effective
    }

    /// Every permission that grants `permission`, including itself.
    ///
    /// Empty if `permission` is not in the catalog.
    pub fn who_grants(&self, permission: &str) -> BTreeSet<String> {
        match self.catalog.index_of(permission) {
            Some(node) => {
                let mut granters: BTreeSet<String> = self.names(self.graph.implying(node)).collect();
                granters.insert(permission.to_string());
                granters
            }
            None => BTreeSet::new(),
        }
    }

    /// Every permission `permission` grants, excluding itself.
    pub fn what_grants(&self, permission: &str) -> BTreeSet<String> {
        match self.catalog.index_of(permission) {
            Some(node) => self.names(self.graph.implied(node)).collect(),
            None => BTreeSet::new(),
        }
    }

    /// Size statistics.
    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    /// Sorted textual dump of the closed graph, one line per permission
    /// that implies anything:
    ///
    /// ```text
    /// users:create -> users.profile:create, users.profile:read, users:read
    /// ```
    pub fn visualize(&self) -> String {
        let mut out = String::new();
        for (node, name) in self.catalog.iter().enumerate() {
            let mut targets: Vec<&str> = self
                .graph
                .implied(node)
                .filter_map(|i| self.catalog.name(i))
                .collect();
            if targets.is_empty() {
                continue;
            }
            targets.sort_unstable();
            out.push_str(&format!("{} -> {}\n", name, targets.join(", ")));
        }
        out
    }

    /// Check if a permission string is in the catalog.
    pub fn contains(&self, permission: &str) -> bool {
        self.catalog.contains(permission)
    }

    /// Every permission string in the catalog, sorted.
    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.catalog.iter()
    }

    /// Declared role ids, sorted.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.roles.iter().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }

    /// Named accessor table.
    pub fn accessors(&self) -> &AccessorTable {
        &self.accessors
    }

    /// Identity of this instance.
    pub fn info(&self) -> &BuildInfo {
        &self.info
    }

    fn qualify<'h>(&self, held: &'h str) -> Cow<'h, str> {
        if !held.contains(':') && self.roles.contains(held) {
            Cow::Owned(role_node(held))
        } else {
            Cow::Borrowed(held)
        }
    }

    fn satisfies(&self, held: &str, required: &str, target: Option<usize>) -> bool {
        if held == required {
            return true;
        }
        match (self.catalog.index_of(held), target) {
            (Some(from), Some(to)) => self.graph.has_edge(from, to),
            _ => false,
        }
    }

    fn names<'a>(&'a self, nodes: impl Iterator<Item = usize> + 'a) -> impl Iterator<Item = String> + 'a {
        nodes.filter_map(move |i| self.catalog.name(i).map(str::to_string))
    }
}
