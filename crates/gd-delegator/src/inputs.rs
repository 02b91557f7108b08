//! Inbound state: the maneuver plan and the vehicle pose and twist.

use std::sync::Arc;

use tracing::{info, warn};

use gd_core::{Latest, Pose, Stamped, Twist};
use gd_model::ManeuverPlan;

use crate::DelegatorResult;

/// Latest-value handles for everything the delegator reads each cycle.
///
/// Cheap to clone: clones share the same slots, so producers on other threads
/// keep a clone and update it while the delegator runs.
#[derive(Clone, Debug, Default)]
pub struct DelegatorInputs {
    plan:  Arc<Latest<ManeuverPlan>>,
    pose:  Arc<Latest<Stamped<Pose>>>,
    twist: Arc<Latest<Stamped<Twist>>>,
}

/// The inputs as seen by one cycle.
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    pub plan:  Option<Arc<ManeuverPlan>>,
    pub pose:  Option<Arc<Stamped<Pose>>>,
    pub twist: Option<Arc<Stamped<Twist>>>,
}

impl DelegatorInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current plan wholesale.
    ///
    /// A plan that fails [`ManeuverPlan::validate`] is rejected and the
    /// previous plan stays in place.
    pub fn update_plan(&self, plan: ManeuverPlan) -> DelegatorResult<()> {
        if let Err(err) = plan.validate() {
            warn!(plan_id = %plan.plan_id, %err, "rejecting maneuver plan; keeping the previous one");
            return Err(err.into());
        }
        info!(plan_id = %plan.plan_id, maneuvers = plan.len(), "received maneuver plan");
        self.plan.store(plan);
        Ok(())
    }

    pub fn update_pose(&self, pose: Stamped<Pose>) {
        self.pose.store(pose);
    }

    pub fn update_twist(&self, twist: Stamped<Twist>) {
        self.twist.store(twist);
    }

    /// Snapshot all three slots.  Later updates do not affect the snapshot.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            plan:  self.plan.snapshot(),
            pose:  self.pose.snapshot(),
            twist: self.twist.snapshot(),
        }
    }

    /// Drop `plan` if it is still the current one.  A newer plan stored since
    /// the snapshot was taken is kept.
    pub(crate) fn discard_plan(&self, plan: &Arc<ManeuverPlan>) -> bool {
        self.plan.clear_if(plan)
    }
}
