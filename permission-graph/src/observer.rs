//! Build observability.
//!
//! Graph construction never logs on its own. Each pipeline stage reports
//! to a [`BuildObserver`] supplied by the caller; [`TracingObserver`] (the
//! default) turns those reports into `tracing` events.

use tracing::{debug, info, warn};

use crate::engine::{BuildInfo, GraphStats};
use crate::error::GraphError;

/// Receives progress reports while a permission graph is built.
///
/// All methods default to doing nothing.
pub trait BuildObserver: Send + Sync {
    /// The catalog was generated.
    fn on_catalog(&self, _permissions: usize) {}

    /// All roles passed validation.
    fn on_validated(&self, _roles: usize) {}

    /// Direct edges were wired.
    fn on_direct_edges(&self, _edges: usize) {}

    /// The direct graph was verified acyclic.
    fn on_acyclic(&self) {}

    /// Transitive closure finished.
    fn on_closed(&self, _added: usize, _total: usize) {}

    /// The graph is ready to serve queries.
    fn on_ready(&self, _info: &BuildInfo, _stats: &GraphStats) {}

    /// Construction failed; no graph was produced.
    fn on_failed(&self, _error: &GraphError) {}
}

/// Observer that emits `tracing` events for every stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BuildObserver for TracingObserver {
    fn on_catalog(&self, permissions: usize) {
        debug!(permissions, "Permission catalog generated");
    }

    fn on_validated(&self, roles: usize) {
        debug!(roles, "Roles validated");
    }

    fn on_direct_edges(&self, edges: usize) {
        debug!(edges, "Direct implication edges wired");
    }

    fn on_acyclic(&self) {
        debug!("Implication graph is acyclic");
    }

    fn on_closed(&self, added: usize, total: usize) {
        debug!(added, total, "Transitive closure computed");
    }

    fn on_ready(&self, info: &BuildInfo, stats: &GraphStats) {
        info!(
            instance_id = %info.instance_id,
            permissions = stats.permissions,
            edges = stats.edges,
            modules = stats.modules,
            resources = stats.resources,
            actions = stats.actions,
            roles = stats.roles,
            "Permission graph ready"
        );
    }

    fn on_failed(&self, error: &GraphError) {
        warn!(error = %error, code = error.error_code(), "Permission graph build failed");
    }
}

/// Observer that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}
