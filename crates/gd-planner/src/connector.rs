//! How planner clients reach their backends.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use gd_core::PlannerNaming;

use crate::{PlannerError, PlannerResult, TrajectoryPlanner};

/// Resolves a service name to the backend serving it.
///
/// Called by the registry once per planner name; the result is cached in a
/// [`PlannerClient`][crate::PlannerClient].  A name nothing serves is
/// [`PlannerError::Unavailable`], and the registry will ask again next cycle.
pub trait PlannerConnector: Send + Sync {
    fn connect(&self, service_name: &str) -> PlannerResult<Arc<dyn TrajectoryPlanner>>;
}

impl<C: PlannerConnector + ?Sized> PlannerConnector for Arc<C> {
    fn connect(&self, service_name: &str) -> PlannerResult<Arc<dyn TrajectoryPlanner>> {
        (**self).connect(service_name)
    }
}

// ── InProcessConnector ────────────────────────────────────────────────────────

/// A service directory of backends running in this process.
///
/// Backends can be registered at any time, including after the connector has
/// been handed to a delegator (share it through an `Arc`).
#[derive(Default)]
pub struct InProcessConnector {
    services: RwLock<HashMap<String, Arc<dyn TrajectoryPlanner>>>,
}

impl InProcessConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `backend` at `service_name`, replacing any previous backend.
    pub fn register(&self, service_name: impl Into<String>, backend: Arc<dyn TrajectoryPlanner>) {
        let service_name = service_name.into();
        debug!(service = %service_name, "registered planner service");
        self.services.write().insert(service_name, backend);
    }

    /// Serve `backend` under the service name `naming` derives for `planner`.
    pub fn register_planner(&self, naming: &PlannerNaming, planner: &str, backend: Arc<dyn TrajectoryPlanner>) {
        self.register(naming.service_name(planner), backend);
    }

    /// Stop serving `service_name`.  Clients already connected keep their
    /// backend.
    pub fn deregister(&self, service_name: &str) -> bool {
        self.services.write().remove(service_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl PlannerConnector for InProcessConnector {
    fn connect(&self, service_name: &str) -> PlannerResult<Arc<dyn TrajectoryPlanner>> {
        self.services
            .read()
            .get(service_name)
            .cloned()
            .ok_or_else(|| PlannerError::Unavailable { service: service_name.to_string() })
    }
}
