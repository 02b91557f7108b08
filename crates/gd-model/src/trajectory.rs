//! Trajectory plans: timestamped points the vehicle should pass through.

use serde::{Deserialize, Serialize};

use gd_core::Timestamp;

use crate::{ModelError, ModelResult};

/// One point of a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Metres east of the map origin.
    pub x: f64,
    /// Metres north of the map origin.
    pub y: f64,
    /// When the vehicle should reach this point.
    pub target_time: Timestamp,
    /// Planner backend that produced the point.
    pub planner: String,
    pub lane_id: String,
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64, target_time: Timestamp) -> Self {
        Self {
            x,
            y,
            target_time,
            planner: String::new(),
            lane_id: String::new(),
        }
    }

    /// Builder-style provenance tag.
    pub fn with_source(mut self, planner: impl Into<String>, lane_id: impl Into<String>) -> Self {
        self.planner = planner.into();
        self.lane_id = lane_id.into();
        self
    }
}

/// An ordered sequence of [`TrajectoryPoint`]s with strictly increasing
/// arrival times.
///
/// Built incrementally by concatenating planner outputs in maneuver order.
/// [`append`][Self::append] refuses any point that does not come strictly
/// after the current tail.  `points` stays public for decoding, so a plan
/// received from elsewhere is only known to be ordered once its points have
/// been appended to another trajectory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPlan {
    pub trajectory_id: String,
    /// Maneuver plan this trajectory was generated from.
    pub maneuver_plan_id: String,
    /// When generation of this trajectory started.
    pub stamp: Timestamp,
    pub points: Vec<TrajectoryPoint>,
}

impl TrajectoryPlan {
    /// An empty trajectory for `maneuver_plan_id`, stamped `stamp`.
    pub fn new(maneuver_plan_id: impl Into<String>, stamp: Timestamp) -> Self {
        let maneuver_plan_id = maneuver_plan_id.into();
        Self {
            trajectory_id: format!("{}@{}", maneuver_plan_id, stamp.as_millis()),
            maneuver_plan_id,
            stamp,
            points: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Milliseconds from the first to the last arrival time (0 with fewer
    /// than two points).
    pub fn span_ms(&self) -> i64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.target_time.since(first.target_time),
            _ => 0,
        }
    }

    /// Append `points` after the current tail.
    ///
    /// All-or-nothing: if any point fails to come strictly after its
    /// predecessor, nothing is appended.
    pub fn append(&mut self, points: Vec<TrajectoryPoint>) -> ModelResult<()> {
        let mut last = self.last().map(|p| p.target_time);
        for point in &points {
            if let Some(prev) = last {
                if point.target_time <= prev {
                    return Err(ModelError::NonMonotonicTrajectory {
                        last: prev,
                        got:  point.target_time,
                    });
                }
            }
            last = Some(point.target_time);
        }
        self.points.extend(points);
        Ok(())
    }
}
