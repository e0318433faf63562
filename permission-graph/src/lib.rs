//! # Permission Graph
//!
//! Precomputed RBAC permission graph: answers "does this set of held
//! permissions imply that required permission?" with one hash lookup per
//! held permission.
//!
//! ## Overview
//!
//! The permission-graph crate handles:
//! - **Catalog**: every valid permission string derived from the configuration
//! - **Implications**: action hierarchy, module→resource and wildcard cascades, roles
//! - **Validation**: unknown permissions, unknown role references, cycles
//! - **Closure**: the full reachability relation, computed once at build time
//! - **Queries**: checks, enumeration and introspection over the frozen graph
//!
//! ## Permission Strings
//!
//! ```text
//! *:delete                 - delete in every module
//! users:*                  - every action on the users module and its resources
//! users:update             - update users (and every users.<resource>)
//! users.profile:read       - read users.profile only
//! role:admin               - holding the admin role
//! ```
//!
//! ## Action Hierarchy
//!
//! Default: `delete > update > create > read`. A configuration may supply
//! any DAG instead, e.g. inserting `approve` between `update` and `delete`.
//!
//! ## Usage
//!
//! ```rust
//! use permission_graph::{GraphConfig, PermissionGraph, RoleDefinition};
//!
//! let config = GraphConfig::new()
//!     .module("users", ["profile", "settings"])
//!     .module("posts", ["content", "comments"])
//!     .role(RoleDefinition::new("viewer", "Viewer").grant("*:read"))
//!     .role(
//!         RoleDefinition::new("editor", "Editor")
//!             .grant("posts:update")
//!             .inherits("viewer"),
//!     );
//!
//! let graph = PermissionGraph::build(&config).unwrap();
//!
//! assert!(graph.has_permission(["role:editor"], "posts.comments:create"));
//! assert!(graph.has_permission(["editor"], "users.profile:read"));
//! assert!(!graph.has_permission(["viewer"], "posts:update"));
//!
//! let check = graph.check_detailed(["viewer"], "posts:update");
//! assert!(!check.allowed);
//! ```
//!
//! ## Lifecycle
//!
//! A graph is built once, synchronously, and never mutated afterwards.
//! Construction either fully succeeds or returns a [`GraphError`]. To apply
//! a new configuration at runtime, build a new graph and swap it in with
//! [`SharedPermissionGraph`].
//!
//! ## Scaling
//!
//! The closed graph stores every implied permission explicitly. Closure is
//! O(V³) in the catalog size and paid once; memory can approach O(V²) edges
//! for configurations with many modules and resources under wildcards.

pub mod accessors;
pub mod actions;
mod builder;
mod catalog;
pub mod config;
mod cycle;
pub mod engine;
pub mod error;
mod graph;
pub mod handle;
pub mod observer;
pub mod permissions;
mod validate;

// Re-export main types for convenience
pub use accessors::{AccessorError, AccessorTable};
pub use actions::ActionHierarchy;
pub use config::{GraphConfig, RoleDefinition};
pub use engine::{BuildInfo, CheckReason, CheckResult, GraphStats, PermissionGraph};
pub use error::{GraphError, GraphResult};
pub use handle::SharedPermissionGraph;
pub use observer::{BuildObserver, NoopObserver, TracingObserver};
pub use permissions::{Permission, PermissionRef, Scope};
