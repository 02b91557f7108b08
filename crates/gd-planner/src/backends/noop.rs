//! A backend that plans nothing.

use gd_model::TrajectoryPlan;

use crate::{PlanTrajectoryRequest, PlanTrajectoryResponse, PlannerResult, TrajectoryPlanner};

/// A [`TrajectoryPlanner`] that always answers with an empty trajectory.
///
/// The delegator treats the empty answer as a planner failure, so this is
/// useful for exercising that path and as a placeholder service.
pub struct NoopPlanner;

impl TrajectoryPlanner for NoopPlanner {
    fn plan_trajectory(&self, request: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
        let plan_id = request.initial_trajectory.maneuver_plan_id.clone();
        Ok(PlanTrajectoryResponse::new(TrajectoryPlan::new(plan_id, request.now)))
    }
}
