//! Shared handle for swapping permission graphs at runtime.
//!
//! Ready graphs are immutable. When the configuration changes, a new graph
//! is built off the serving path and swapped in atomically; readers holding
//! the previous `Arc` keep using it until they drop it, and no reader ever
//! sees a partially built graph.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::config::GraphConfig;
use crate::engine::PermissionGraph;
use crate::error::GraphResult;

/// A swappable reference to the current permission graph.
///
/// # Example
///
/// ```
/// use permission_graph::{GraphConfig, SharedPermissionGraph};
///
/// let shared = SharedPermissionGraph::build(&GraphConfig::new().module("users", ["profile"])).unwrap();
/// assert!(!shared.current().contains("posts:read"));
///
/// shared.rebuild(&GraphConfig::new().module("posts", ["content"])).unwrap();
/// assert!(shared.current().contains("posts:read"));
/// ```
#[derive(Debug)]
pub struct SharedPermissionGraph {
    current: RwLock<Arc<PermissionGraph>>,
}

impl SharedPermissionGraph {
    /// Wrap an already built graph.
    pub fn new(graph: PermissionGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    /// Build the initial graph.
    pub fn build(config: &GraphConfig) -> GraphResult<Self> {
        Ok(Self::new(PermissionGraph::build(config)?))
    }

    /// Get the current graph.
    ///
    /// The returned `Arc` stays valid after a swap.
    pub fn current(&self) -> Arc<PermissionGraph> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new graph, returning the previous one.
    pub fn replace(&self, graph: PermissionGraph) -> Arc<PermissionGraph> {
        let next = Arc::new(graph);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            previous = %current.info().instance_id,
            next = %next.info().instance_id,
            "Swapping permission graph"
        );
        std::mem::replace(&mut *current, next)
    }

    /// Build a graph from `config` and swap it in.
    ///
    /// The build happens before the lock is taken. If it fails, the current
    /// graph is left in place and the error is returned.
    pub fn rebuild(&self, config: &GraphConfig) -> GraphResult<Arc<PermissionGraph>> {
        let graph = PermissionGraph::build(config)?;
        Ok(self.replace(graph))
    }
}
