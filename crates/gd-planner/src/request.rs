//! What a backend is asked, and what it answers.

use std::time::Duration;

use gd_core::{Pose, Stamped, Timestamp, Twist};
use gd_model::{Maneuver, TrajectoryPlan};

/// One PlanTrajectory call.
///
/// Borrows everything from the delegator's cycle snapshot; a request lives
/// for exactly one call.
#[derive(Clone, Copy, Debug)]
pub struct PlanTrajectoryRequest<'a> {
    /// The maneuver to plan followed by the rest of the plan.  Never empty
    /// when built by the delegator.
    pub maneuvers: &'a [Maneuver],

    /// Points accumulated from earlier calls this cycle.  New points must
    /// come strictly after its tail.
    pub initial_trajectory: &'a TrajectoryPlan,

    /// `None` when never received or stale.
    pub pose: Option<&'a Stamped<Pose>>,

    /// `None` when never received or stale.
    pub twist: Option<&'a Stamped<Twist>>,

    /// Cycle time.
    pub now: Timestamp,

    /// Time budget for this call.  Responses arriving later are discarded.
    pub timeout: Duration,
}

impl<'a> PlanTrajectoryRequest<'a> {
    /// The maneuver this call is for.
    #[inline]
    pub fn maneuver(&self) -> Option<&'a Maneuver> {
        self.maneuvers.first()
    }
}

/// A backend's answer: the points it planned, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanTrajectoryResponse {
    pub trajectory: TrajectoryPlan,
}

impl PlanTrajectoryResponse {
    pub fn new(trajectory: TrajectoryPlan) -> Self {
        Self { trajectory }
    }
}
