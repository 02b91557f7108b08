//! Pure predicates gating expiration, structural validity, and trajectory
//! sufficiency.  None of them allocate or mutate.

use std::time::Duration;

use gd_core::Timestamp;

use crate::{Maneuver, ManeuverPlan, TrajectoryPlan};

/// A maneuver is expired once `now` is strictly past its end time.
#[inline]
pub fn is_maneuver_expired(maneuver: &Maneuver, now: Timestamp) -> bool {
    now > maneuver.end_time()
}

/// A plan is expired when its final maneuver is.  An empty plan is never
/// expired (it is invalid instead).
pub fn is_plan_expired(plan: &ManeuverPlan, now: Timestamp) -> bool {
    plan.maneuvers
        .last()
        .is_some_and(|last| is_maneuver_expired(last, now))
}

/// A plan is valid when it contains at least one maneuver.
#[inline]
pub fn is_plan_valid(plan: &ManeuverPlan) -> bool {
    !plan.maneuvers.is_empty()
}

/// A trajectory is valid when it has at least two points.
#[inline]
pub fn is_trajectory_valid(trajectory: &TrajectoryPlan) -> bool {
    trajectory.points.len() >= 2
}

/// A trajectory is long enough when its first-to-last arrival span is at
/// least `min_duration`.
///
/// Both sides are compared in milliseconds: arrival times are
/// [`Timestamp`]s and `min_duration` is converted with
/// [`Duration::as_millis`].  Fewer than two points span zero time.
pub fn is_trajectory_long_enough(trajectory: &TrajectoryPlan, min_duration: Duration) -> bool {
    let span_ms = trajectory.span_ms();
    let min_ms = i64::try_from(min_duration.as_millis()).unwrap_or(i64::MAX);
    span_ms >= min_ms
}
