//! `PlannerRegistry`: at most one client per planner name.

use std::time::Duration;

use tracing::info;

use gd_core::PlannerNaming;

use crate::{PlannerClient, PlannerConnector, PlannerResult};

#[cfg(feature = "fx-hash")]
type ClientMap = rustc_hash::FxHashMap<String, PlannerClient>;
#[cfg(not(feature = "fx-hash"))]
type ClientMap = std::collections::HashMap<String, PlannerClient>;

/// Lazily built map from planner name to [`PlannerClient`].
///
/// On a miss the planner name is turned into a service name with the
/// configured [`PlannerNaming`], the connector resolves it, and the new
/// client is cached for the rest of the process.  Hits return the cached
/// client.  A failed connect caches nothing.
///
/// Owned by the delegator and touched only from its cycle, so it needs no
/// locking.
pub struct PlannerRegistry<C> {
    connector: C,
    naming:    PlannerNaming,
    timeout:   Duration,
    clients:   ClientMap,
}

impl<C: PlannerConnector> PlannerRegistry<C> {
    /// `timeout` bounds every call made through the clients this registry
    /// creates.
    pub fn new(connector: C, naming: PlannerNaming, timeout: Duration) -> Self {
        Self {
            connector,
            naming,
            timeout,
            clients: ClientMap::default(),
        }
    }

    /// The client for `planner`, connecting on first use.
    pub fn get_or_connect(&mut self, planner: &str) -> PlannerResult<&PlannerClient> {
        if !self.clients.contains_key(planner) {
            let service_name = self.naming.service_name(planner);
            let backend = self.connector.connect(&service_name)?;
            info!(planner, service = %service_name, "created planner client");
            let client = PlannerClient::new(planner, service_name, backend, self.timeout);
            self.clients.insert(planner.to_string(), client);
        }
        Ok(&self.clients[planner])
    }

    /// The cached client for `planner`, without connecting.
    pub fn get(&self, planner: &str) -> Option<&PlannerClient> {
        self.clients.get(planner)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn naming(&self) -> &PlannerNaming {
        &self.naming
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}
