//! The `ManeuverPlan`: an ordered sequence of maneuvers covering the
//! vehicle's near-term route.
//!
//! Plans are replaced wholesale on every update and never merged.

use serde::{Deserialize, Serialize};

use gd_core::Timestamp;

use crate::{Maneuver, ModelError, ModelResult, is_maneuver_expired};

/// Largest gap or overlap, in metres, accepted between one maneuver's end
/// and the next one's start.
pub const CONTIGUITY_TOLERANCE_M: f64 = 0.01;

/// Ordered maneuvers covering a contiguous, non-decreasing distance range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManeuverPlan {
    pub plan_id: String,
    /// When the upstream planner started building this plan.
    pub planning_start_time: Timestamp,
    /// When the upstream planner finished building this plan.
    pub planning_completion_time: Timestamp,
    pub maneuvers: Vec<Maneuver>,
}

impl ManeuverPlan {
    pub fn new(plan_id: impl Into<String>, created: Timestamp, maneuvers: Vec<Maneuver>) -> Self {
        Self {
            plan_id:                  plan_id.into(),
            planning_start_time:      created,
            planning_completion_time: created,
            maneuvers,
        }
    }

    /// Decode a plan from JSON and run [`validate`][Self::validate] on it.
    ///
    /// An unrecognized maneuver `"type"` is a decode error.
    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let plan: ManeuverPlan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.maneuvers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.maneuvers.is_empty()
    }

    /// Index of the maneuver covering the vehicle's current progress: the
    /// first one that has not expired at `now`.
    pub fn first_active_index(&self, now: Timestamp) -> Option<usize> {
        self.maneuvers
            .iter()
            .position(|m| !is_maneuver_expired(m, now))
    }

    /// Structural check applied to incoming plans.
    ///
    /// - at least one maneuver;
    /// - each maneuver ends no earlier than it starts, in distance and time;
    /// - each maneuver starts where the previous one ended, within
    ///   [`CONTIGUITY_TOLERANCE_M`];
    /// - every maneuver names a planner.
    pub fn validate(&self) -> ModelResult<()> {
        if self.maneuvers.is_empty() {
            return Err(ModelError::EmptyPlan { plan_id: self.plan_id.clone() });
        }

        let mut prev_end: Option<f64> = None;
        for (index, maneuver) in self.maneuvers.iter().enumerate() {
            let p = maneuver.params();
            let malformed = |reason: String| ModelError::MalformedManeuver {
                plan_id: self.plan_id.clone(),
                index,
                reason,
            };

            if !(p.start_dist.is_finite() && p.end_dist.is_finite()) {
                return Err(malformed("non-finite distance".to_string()));
            }
            if p.end_dist < p.start_dist {
                return Err(malformed(format!(
                    "end_dist {} is before start_dist {}",
                    p.end_dist, p.start_dist
                )));
            }
            if p.end_time < p.start_time {
                return Err(malformed(format!(
                    "end_time {} is before start_time {}",
                    p.end_time, p.start_time
                )));
            }
            if let Some(prev_end) = prev_end {
                if (p.start_dist - prev_end).abs() > CONTIGUITY_TOLERANCE_M {
                    return Err(malformed(format!(
                        "start_dist {} does not meet the previous maneuver's end_dist {}",
                        p.start_dist, prev_end
                    )));
                }
            }
            if p.planner.is_empty() {
                return Err(malformed(format!("{} maneuver names no planner", maneuver.kind())));
            }
            prev_end = Some(p.end_dist);
        }
        Ok(())
    }
}
