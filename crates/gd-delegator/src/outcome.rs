//! What one planning cycle did.

use std::fmt;

use gd_planner::PlannerError;

/// Result of [`PlanDelegator::run_cycle`][crate::PlanDelegator::run_cycle].
#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// A trajectory passed both gates and went to the publisher.
    Published {
        trajectory_id: String,
        points:        usize,
        span_ms:       i64,
        /// Planner calls made this cycle.
        calls:         usize,
    },
    /// Nothing was published.
    Skipped(SkipReason),
}

impl CycleOutcome {
    #[inline]
    pub fn is_published(&self) -> bool {
        matches!(self, CycleOutcome::Published { .. })
    }
}

/// Why a cycle published nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// No plan has been received, or the last one was discarded.
    NoPlan,
    /// The stored plan has no maneuvers.  It was discarded.
    InvalidPlan { plan_id: String },
    /// The stored plan's last maneuver has ended.  It was discarded.
    ExpiredPlan { plan_id: String },
    /// A planner call failed and the points gathered before it were not
    /// enough.
    PlannerFailed(PlannerError),
    /// Every remaining maneuver was planned and the result is still too
    /// short.
    InsufficientTrajectory { points: usize, span_ms: i64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoPlan => f.write_str("no maneuver plan"),
            SkipReason::InvalidPlan { plan_id } => write!(f, "plan {plan_id} is invalid"),
            SkipReason::ExpiredPlan { plan_id } => write!(f, "plan {plan_id} has expired"),
            SkipReason::PlannerFailed(err) => write!(f, "{err}"),
            SkipReason::InsufficientTrajectory { points, span_ms } => {
                write!(f, "trajectory of {points} point(s) spans only {span_ms} ms")
            }
        }
    }
}
