//! The `PlanDelegator` and its planning cycle.

use std::sync::Arc;

use tracing::{debug, warn};

use gd_core::{Clock, DelegatorConfig, Pose, Stamped, Timestamp, Twist};
use gd_model::{
    Maneuver, ManeuverPlan, TrajectoryPlan, TrajectoryPoint, is_plan_expired, is_plan_valid,
    is_trajectory_long_enough, is_trajectory_valid,
};
use gd_planner::{PlanTrajectoryRequest, PlannerConnector, PlannerError, PlannerRegistry, PlannerResult};

use crate::{CycleOutcome, DelegatorInputs, SkipReason, TrajectoryPublisher};

/// Turns the latest maneuver plan into a trajectory, once per cycle.
///
/// `PlanDelegator<C, K>` owns the planner registry (clients reached through
/// connector `C`) and reads time from clock `K`.  Each cycle:
///
/// 1. **Snapshot** the plan, pose and twist.  Pose or twist older than
///    `max_state_age_ms` are treated as absent.
/// 2. **Gate the plan.**  An empty or expired plan is discarded and the cycle
///    skipped.
/// 3. **Dispatch**, from the first maneuver that has not expired: resolve the
///    maneuver's planner client, send it the remaining maneuvers plus the
///    trajectory so far, and append the points it returns.  Stop once the
///    trajectory spans `min_trajectory_duration_ms`, the maneuvers run out,
///    or a call fails.
/// 4. **Publish** the trajectory if it has at least two points and spans the
///    minimum duration.
///
/// Create via [`DelegatorBuilder`][crate::DelegatorBuilder].
pub struct PlanDelegator<C: PlannerConnector, K: Clock> {
    pub(crate) config:   DelegatorConfig,
    pub(crate) inputs:   DelegatorInputs,
    pub(crate) registry: PlannerRegistry<C>,
    pub(crate) clock:    K,
}

impl<C: PlannerConnector, K: Clock> PlanDelegator<C, K> {
    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &DelegatorConfig {
        &self.config
    }

    /// Handles for feeding plans and vehicle state in.
    #[inline]
    pub fn inputs(&self) -> &DelegatorInputs {
        &self.inputs
    }

    #[inline]
    pub fn registry(&self) -> &PlannerRegistry<C> {
        &self.registry
    }

    #[inline]
    pub fn clock(&self) -> &K {
        &self.clock
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run one planning cycle at the clock's current time.
    pub fn run_cycle<P: TrajectoryPublisher>(&mut self, publisher: &mut P) -> CycleOutcome {
        let now = self.clock.now();
        match self.plan_cycle(now) {
            Ok((trajectory, calls)) => {
                let outcome = CycleOutcome::Published {
                    trajectory_id: trajectory.trajectory_id.clone(),
                    points:        trajectory.len(),
                    span_ms:       trajectory.span_ms(),
                    calls,
                };
                debug!(
                    trajectory_id = %trajectory.trajectory_id,
                    points = trajectory.len(),
                    span_ms = trajectory.span_ms(),
                    calls,
                    "published trajectory"
                );
                publisher.publish(trajectory);
                outcome
            }
            Err(reason) => {
                publisher.on_cycle_skipped(now, &reason);
                CycleOutcome::Skipped(reason)
            }
        }
    }

    /// Run exactly `n` cycles back to back, without waiting between them.
    ///
    /// Useful for tests and stepping with a manual clock.
    pub fn run_cycles<P: TrajectoryPublisher>(&mut self, n: usize, publisher: &mut P) -> Vec<CycleOutcome> {
        (0..n).map(|_| self.run_cycle(publisher)).collect()
    }

    // ── Cycle ─────────────────────────────────────────────────────────────

    /// Build this cycle's trajectory, returning it with the number of
    /// planner calls made.
    fn plan_cycle(&mut self, now: Timestamp) -> Result<(TrajectoryPlan, usize), SkipReason> {
        let snapshot = self.inputs.snapshot();

        let Some(plan) = snapshot.plan else {
            debug!("no maneuver plan; skipping cycle");
            return Err(SkipReason::NoPlan);
        };
        self.gate_plan(&plan, now)?;

        let max_age = self.config.max_state_age_ms;
        let pose = fresh(snapshot.pose.as_deref(), now, max_age, "pose");
        let twist = fresh(snapshot.twist.as_deref(), now, max_age, "twist");

        let Some(first) = plan.first_active_index(now) else {
            return Err(SkipReason::ExpiredPlan { plan_id: plan.plan_id.clone() });
        };

        let min_duration = self.config.min_trajectory_duration();
        let mut trajectory = TrajectoryPlan::new(plan.plan_id.clone(), now);
        let mut calls = 0;
        let mut failure = None;

        for index in first..plan.len() {
            if is_trajectory_long_enough(&trajectory, min_duration) {
                break;
            }
            let remaining = &plan.maneuvers[index..];
            calls += 1;
            let result = self
                .dispatch(remaining, &trajectory, pose, twist, now)
                .and_then(|points| append(&mut trajectory, points, remaining[0].planner()));
            if let Err(err) = result {
                warn!(
                    plan_id = %plan.plan_id,
                    maneuver = index,
                    planner = remaining[0].planner(),
                    %err,
                    "planner call failed; abandoning the rest of this cycle"
                );
                failure = Some(err);
                break;
            }
        }

        if is_trajectory_valid(&trajectory) && is_trajectory_long_enough(&trajectory, min_duration) {
            return Ok((trajectory, calls));
        }

        let reason = match failure {
            Some(err) => SkipReason::PlannerFailed(err),
            None => SkipReason::InsufficientTrajectory {
                points:  trajectory.len(),
                span_ms: trajectory.span_ms(),
            },
        };
        warn!(plan_id = %plan.plan_id, %reason, "not publishing trajectory");
        Err(reason)
    }

    /// Discard the plan if it is empty or expired.
    fn gate_plan(&self, plan: &Arc<ManeuverPlan>, now: Timestamp) -> Result<(), SkipReason> {
        if !is_plan_valid(plan) {
            warn!(plan_id = %plan.plan_id, "discarding maneuver plan with no maneuvers");
            self.inputs.discard_plan(plan);
            return Err(SkipReason::InvalidPlan { plan_id: plan.plan_id.clone() });
        }
        if is_plan_expired(plan, now) {
            warn!(plan_id = %plan.plan_id, %now, "discarding expired maneuver plan");
            self.inputs.discard_plan(plan);
            return Err(SkipReason::ExpiredPlan { plan_id: plan.plan_id.clone() });
        }
        Ok(())
    }

    /// One PlanTrajectory call for `maneuvers[0]`, returning the points to
    /// append.
    fn dispatch(
        &mut self,
        maneuvers:  &[Maneuver],
        trajectory: &TrajectoryPlan,
        pose:       Option<&Stamped<Pose>>,
        twist:      Option<&Stamped<Twist>>,
        now:        Timestamp,
    ) -> PlannerResult<Vec<TrajectoryPoint>> {
        let planner = maneuvers[0].planner();
        let client = self.registry.get_or_connect(planner)?;

        let request = PlanTrajectoryRequest {
            maneuvers,
            initial_trajectory: trajectory,
            pose,
            twist,
            now,
            timeout: client.timeout(),
        };
        let response = client.call(&request)?;

        if !is_trajectory_valid(&response.trajectory) {
            return Err(PlannerError::InvalidResponse {
                planner: planner.to_string(),
                reason:  format!("{} point(s), need at least 2", response.trajectory.len()),
            });
        }

        let mut points = response.trajectory.points;
        // A backend continuing the trajectory may echo its tail point.
        if let (Some(tail), Some(head)) = (trajectory.last(), points.first()) {
            if head.target_time == tail.target_time {
                points.remove(0);
            }
        }
        Ok(points)
    }
}

/// Append a backend's points, turning an ordering violation into an invalid
/// response from `planner`.
fn append(trajectory: &mut TrajectoryPlan, points: Vec<TrajectoryPoint>, planner: &str) -> PlannerResult<()> {
    trajectory
        .append(points)
        .map_err(|err| PlannerError::InvalidResponse {
            planner: planner.to_string(),
            reason:  err.to_string(),
        })
}

/// `value`, unless it is older than `max_age_ms`.
fn fresh<'a, T>(
    value:      Option<&'a Stamped<T>>,
    now:        Timestamp,
    max_age_ms: Option<u64>,
    what:       &'static str,
) -> Option<&'a Stamped<T>> {
    match (value, max_age_ms) {
        (Some(v), Some(max)) if v.is_stale(now, max) => {
            warn!(what, age_ms = v.age_ms(now), max_age_ms = max, "ignoring stale vehicle state");
            None
        }
        _ => value,
    }
}
