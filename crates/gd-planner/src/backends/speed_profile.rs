//! A longitudinal backend: straight-line points along the heading, timed by a
//! speed profile.

use tracing::trace;

use gd_core::{KinematicsConfig, Timestamp};
use gd_kinematics::{SpeedChange, SpeedProfile};
use gd_model::{ManeuverParams, TrajectoryPlan, TrajectoryPoint};

use crate::{PlanTrajectoryRequest, PlanTrajectoryResponse, PlannerError, PlannerResult, TrajectoryPlanner};

/// Plans the first maneuver of a request as motion along a straight line.
///
/// The line starts at the tail of the accumulated trajectory, or at the
/// vehicle pose when nothing has been planned yet.  Its heading is that of
/// the last trajectory segment, else the pose yaw.  Timing comes from the
/// maneuver's speeds: a constant-speed cruise when they are equal, otherwise
/// a [`SpeedChange`] fitted to the maneuver's distance.
///
/// Points are spaced `sample_period_ms` apart (at least two per call).  When
/// continuing a trajectory the tail point itself is not repeated.
pub struct SpeedProfilePlanner {
    name:   String,
    config: KinematicsConfig,
}

/// Where the new points start.
struct Origin {
    x:          f64,
    y:          f64,
    heading:    f64,
    time:       Timestamp,
    continuing: bool,
}

/// Distance along the line as a function of time.
enum Motion {
    Cruise { speed: f64, secs: f64 },
    Change(SpeedProfile),
}

impl Motion {
    fn total_secs(&self) -> f64 {
        match self {
            Motion::Cruise { secs, .. } => *secs,
            Motion::Change(profile) => profile.travel_secs(),
        }
    }

    fn distance_at(&self, t: f64) -> f64 {
        match self {
            Motion::Cruise { speed, .. } => speed * t,
            Motion::Change(profile) => profile.distance_at(t),
        }
    }
}

impl SpeedProfilePlanner {
    pub fn new(name: impl Into<String>, config: KinematicsConfig) -> Self {
        Self { name: name.into(), config }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn rejected(&self, reason: impl Into<String>) -> PlannerError {
        PlannerError::Rejected {
            planner: self.name.clone(),
            reason:  reason.into(),
        }
    }

    fn origin(&self, request: &PlanTrajectoryRequest<'_>) -> PlannerResult<Origin> {
        let points = &request.initial_trajectory.points;
        let pose_yaw = request.pose.map(|p| p.value.yaw);

        if let Some(tail) = points.last() {
            let segment_heading = match points.len() {
                n if n >= 2 => {
                    let prev = &points[n - 2];
                    let (dx, dy) = (tail.x - prev.x, tail.y - prev.y);
                    (dx != 0.0 || dy != 0.0).then(|| dy.atan2(dx))
                }
                _ => None,
            };
            return Ok(Origin {
                x:          tail.x,
                y:          tail.y,
                heading:    segment_heading.or(pose_yaw).unwrap_or(0.0),
                time:       tail.target_time,
                continuing: true,
            });
        }

        match request.pose {
            Some(pose) => Ok(Origin {
                x:          pose.value.x,
                y:          pose.value.y,
                heading:    pose.value.yaw,
                time:       request.now,
                continuing: false,
            }),
            None => Err(self.rejected("no pose and no trajectory to continue from")),
        }
    }

    fn motion(&self, params: &ManeuverParams) -> PlannerResult<Motion> {
        let length = params.length();
        if !(length > 0.0) {
            return Err(self.rejected(format!("maneuver covers no distance ({length} m)")));
        }

        if params.start_speed == params.end_speed {
            let speed = params.start_speed;
            if !(speed.is_finite() && speed > 0.0) {
                return Err(self.rejected(format!("cannot cruise {length} m at {speed} m/s")));
            }
            return Ok(Motion::Cruise { speed, secs: length / speed });
        }

        let mut change = SpeedChange::for_maneuver(params).map_err(|e| self.rejected(e.to_string()))?;
        change
            .plan_to_target_distance(&self.config, params.start_dist, params.end_dist)
            .map_err(|e| self.rejected(e.to_string()))?;
        match change.profile() {
            Some(profile) => Ok(Motion::Change(profile.clone())),
            None => Err(self.rejected("speed change produced no profile")),
        }
    }
}

impl TrajectoryPlanner for SpeedProfilePlanner {
    fn plan_trajectory(&self, request: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
        let Some(maneuver) = request.maneuver() else {
            return Err(self.rejected("request carries no maneuvers"));
        };
        let params = maneuver.params();
        let origin = self.origin(request)?;
        let motion = self.motion(params)?;

        let total = motion.total_secs();
        let period = self.config.sample_period_ms as f64 / 1_000.0;
        let steps = ((total / period).ceil() as usize).max(2);
        let step = total / steps as f64;
        let (cos, sin) = (origin.heading.cos(), origin.heading.sin());

        let first = usize::from(origin.continuing);
        let mut points: Vec<TrajectoryPoint> = Vec::with_capacity(steps + 1);
        let mut last_time = origin.continuing.then_some(origin.time);
        for i in first..=steps {
            let t = i as f64 * step;
            let time = origin.time.offset_ms((t * 1_000.0).round() as i64);
            if last_time.is_some_and(|prev| time <= prev) {
                continue;
            }
            let d = motion.distance_at(t);
            points.push(
                TrajectoryPoint::new(origin.x + d * cos, origin.y + d * sin, time)
                    .with_source(params.planner.as_str(), params.lane_id.as_str()),
            );
            last_time = Some(time);
        }

        trace!(
            planner = %self.name,
            kind = %maneuver.kind(),
            points = points.len(),
            secs = total,
            "sampled maneuver"
        );

        let mut trajectory = TrajectoryPlan::new(request.initial_trajectory.maneuver_plan_id.clone(), request.now);
        trajectory
            .append(points)
            .map_err(|err| PlannerError::InvalidResponse {
                planner: self.name.clone(),
                reason:  err.to_string(),
            })?;
        Ok(PlanTrajectoryResponse::new(trajectory))
    }
}
