//! The `TrajectoryPlanner` trait: the backend extension point.

use crate::{PlanTrajectoryRequest, PlanTrajectoryResponse, PlannerResult};

/// A backend that turns maneuvers into trajectory points.
///
/// Implementations plan [`request.maneuver()`][PlanTrajectoryRequest::maneuver]
/// and may look at the remaining maneuvers for context.  A response with
/// fewer than two points is treated as a failure by the caller.
///
/// # Thread safety
///
/// Backends are shared behind `Arc` between the connector that publishes them
/// and the clients that call them, so implementations must be
/// `Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// struct Hold;
///
/// impl TrajectoryPlanner for Hold {
///     fn plan_trajectory(&self, req: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
///         let mut t = TrajectoryPlan::new(&req.initial_trajectory.maneuver_plan_id, req.now);
///         t.points = vec![
///             TrajectoryPoint::new(0.0, 0.0, req.now),
///             TrajectoryPoint::new(0.0, 0.0, req.now.offset_ms(1_000)),
///         ];
///         Ok(PlanTrajectoryResponse::new(t))
///     }
/// }
/// ```
pub trait TrajectoryPlanner: Send + Sync + 'static {
    fn plan_trajectory(&self, request: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse>;
}
