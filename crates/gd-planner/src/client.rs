//! `PlannerClient`: a named handle to one backend.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use gd_core::{Pose, Stamped, Timestamp, Twist};
use gd_model::{Maneuver, TrajectoryPlan};

use crate::{PlanTrajectoryRequest, PlanTrajectoryResponse, PlannerError, PlannerResult, TrajectoryPlanner};

/// Handle bound to the backend serving one planner name.
///
/// Created by the [`PlannerRegistry`][crate::PlannerRegistry] on first use
/// and kept for the life of the process.
pub struct PlannerClient {
    name:         String,
    service_name: String,
    backend:      Arc<dyn TrajectoryPlanner>,
    timeout:      Duration,
    /// Set while a worker is inside the backend.
    busy:         Arc<AtomicBool>,
}

impl PlannerClient {
    pub fn new(
        name:         impl Into<String>,
        service_name: impl Into<String>,
        backend:      Arc<dyn TrajectoryPlanner>,
        timeout:      Duration,
    ) -> Self {
        Self {
            name: name.into(),
            service_name: service_name.into(),
            backend,
            timeout,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[inline]
    pub fn backend(&self) -> &Arc<dyn TrajectoryPlanner> {
        &self.backend
    }

    /// `true` while an earlier call that timed out is still running.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Issue one PlanTrajectory call, waiting at most the client's timeout.
    ///
    /// The backend runs on a worker thread over a copy of the request.  If it
    /// has not answered when the timeout passes the call fails with
    /// [`PlannerError::Timeout`] and its eventual response is dropped.  Until
    /// that abandoned worker finishes, further calls fail at once with
    /// [`PlannerError::Busy`].
    pub fn call(&self, request: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(PlannerError::Busy { planner: self.name.clone() });
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let owned = OwnedRequest::from(request);
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = mpsc::sync_channel(1);
        let started = Instant::now();

        let spawned = thread::Builder::new()
            .name(format!("planner-{}", self.name))
            .spawn(move || {
                let result = backend.plan_trajectory(&owned.as_request());
                drop(guard);
                // The caller may have stopped waiting.
                let _ = tx.send(result);
            });
        if let Err(err) = spawned {
            warn!(planner = %self.name, %err, "could not start planner worker");
            return Err(PlannerError::Unavailable { service: self.service_name.clone() });
        }

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                let err = PlannerError::Timeout {
                    planner:    self.name.clone(),
                    timeout_ms: millis(self.timeout),
                    elapsed_ms: millis(started.elapsed()),
                };
                warn!(planner = %self.name, %err, "abandoning planner call");
                Err(err)
            }
            Err(RecvTimeoutError::Disconnected) => Err(PlannerError::InvalidResponse {
                planner: self.name.clone(),
                reason:  "backend panicked".to_string(),
            }),
        }
    }
}

impl fmt::Debug for PlannerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerClient")
            .field("name", &self.name)
            .field("service_name", &self.service_name)
            .field("timeout", &self.timeout)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Clears the busy flag when the worker is done, panicking or not.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A request the worker thread can own.
struct OwnedRequest {
    maneuvers:          Vec<Maneuver>,
    initial_trajectory: TrajectoryPlan,
    pose:               Option<Stamped<Pose>>,
    twist:              Option<Stamped<Twist>>,
    now:                Timestamp,
    timeout:            Duration,
}

impl From<&PlanTrajectoryRequest<'_>> for OwnedRequest {
    fn from(req: &PlanTrajectoryRequest<'_>) -> Self {
        Self {
            maneuvers:          req.maneuvers.to_vec(),
            initial_trajectory: req.initial_trajectory.clone(),
            pose:               req.pose.cloned(),
            twist:              req.twist.cloned(),
            now:                req.now,
            timeout:            req.timeout,
        }
    }
}

impl OwnedRequest {
    fn as_request(&self) -> PlanTrajectoryRequest<'_> {
        PlanTrajectoryRequest {
            maneuvers:          &self.maneuvers,
            initial_trajectory: &self.initial_trajectory,
            pose:               self.pose.as_ref(),
            twist:              self.twist.as_ref(),
            now:                self.now,
            timeout:            self.timeout,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
