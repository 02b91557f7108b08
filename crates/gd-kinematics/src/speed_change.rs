//! `SpeedChange`: plan and execute a longitudinal speed change.

use tracing::{debug, warn};

use gd_core::{KinematicsConfig, Timestamp};
use gd_model::ManeuverParams;

use crate::{Direction, Infeasibility, KinematicsError, KinematicsResult, ManeuverPhase, SpeedProfile};

/// A speed-up or slow-down maneuver.
///
/// Holds the requested speeds, the planned [`SpeedProfile`] once one of the
/// planning calls has succeeded, and the execution start time once
/// [`begin`][Self::begin] has been called.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedChange {
    direction:    Direction,
    start_speed:  f64,
    target_speed: f64,
    profile:      Option<SpeedProfile>,
    started_at:   Option<Timestamp>,
}

impl SpeedChange {
    // ── Construction ──────────────────────────────────────────────────────

    pub fn speed_up(start_speed: f64, target_speed: f64) -> Self {
        Self::new(Direction::SpeedUp, start_speed, target_speed)
    }

    pub fn slow_down(start_speed: f64, target_speed: f64) -> Self {
        Self::new(Direction::SlowDown, start_speed, target_speed)
    }

    /// Pick the direction from the two speeds.  Equal speeds are not a speed
    /// change and are rejected.
    pub fn between(start_speed: f64, target_speed: f64) -> KinematicsResult<Self> {
        check_speeds(start_speed, target_speed)?;
        let direction = if target_speed > start_speed {
            Direction::SpeedUp
        } else if target_speed < start_speed {
            Direction::SlowDown
        } else {
            return Err(Infeasibility::WrongSpeedDirection {
                direction: Direction::SpeedUp,
                start_speed,
                end_speed: target_speed,
            }
            .into());
        };
        Ok(Self::new(direction, start_speed, target_speed))
    }

    /// A speed change between a maneuver's start and end speeds.
    pub fn for_maneuver(params: &ManeuverParams) -> KinematicsResult<Self> {
        Self::between(params.start_speed, params.end_speed)
    }

    fn new(direction: Direction, start_speed: f64, target_speed: f64) -> Self {
        Self {
            direction,
            start_speed,
            target_speed,
            profile: None,
            started_at: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn start_speed(&self) -> f64 {
        self.start_speed
    }

    /// The requested end speed.  The planned one is on the profile.
    #[inline]
    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    #[inline]
    pub fn profile(&self) -> Option<&SpeedProfile> {
        self.profile.as_ref()
    }

    #[inline]
    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    /// Lifecycle phase at `now`.
    pub fn phase(&self, now: Timestamp) -> ManeuverPhase {
        match (&self.profile, self.started_at) {
            (None, _) => ManeuverPhase::Unplanned,
            (Some(_), None) => ManeuverPhase::Planned,
            (Some(p), Some(start)) if now.secs_since(start) >= p.duration_secs => ManeuverPhase::Complete,
            (Some(_), Some(_)) => ManeuverPhase::Executing,
        }
    }

    /// Phase ignoring completion, for the checks that do not take a time.
    fn static_phase(&self) -> ManeuverPhase {
        match (&self.profile, self.started_at) {
            (None, _) => ManeuverPhase::Unplanned,
            (Some(_), None) => ManeuverPhase::Planned,
            (Some(_), Some(_)) => ManeuverPhase::Executing,
        }
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Plan the speed change starting at `start_dist` with no distance
    /// constraint, returning the resulting profile.
    ///
    /// Uses `max_accel`, halved when the speed difference is below
    /// `small_speed_change`.  The profile ends after the ramp plus the
    /// response-lag distance plus `end_buffer_secs` of travel at the target
    /// speed.
    pub fn plan(&mut self, config: &KinematicsConfig, start_dist: f64) -> KinematicsResult<&SpeedProfile> {
        self.ensure_not_started()?;
        self.check_direction()?;

        let v0 = self.start_speed;
        let v1 = self.target_speed;
        let dv = (v1 - v0).abs();

        let mut accel = config.max_accel;
        if dv < config.small_speed_change {
            accel *= 0.5;
        }

        let duration_secs = dv / accel;
        if !is_usable_duration(duration_secs) {
            return Err(Infeasibility::DegenerateRamp { accel, duration_secs }.into());
        }

        let ideal = ramp_numerator(self.direction, v0, dv) / accel;
        let lag = v0 * config.response_lag_secs;
        let buffer = config.end_buffer_secs * v1;

        let profile = SpeedProfile {
            direction: self.direction,
            start_dist,
            end_dist: start_dist + ideal + lag + buffer,
            start_speed: v0,
            end_speed: v1,
            accel,
            duration_secs,
            clamped: false,
        };
        debug!(
            direction = %self.direction,
            start_dist,
            end_dist = profile.end_dist,
            accel,
            duration_secs = profile.duration_secs,
            "planned speed change"
        );
        Ok(self.profile.insert(profile))
    }

    /// Plan the speed change to fit exactly between `start_dist` and
    /// `end_dist`, returning the end speed actually planned.
    ///
    /// The acceleration is solved from the distance left after the response
    /// lag.  If that exceeds `max_accel` the acceleration is clamped and the
    /// end speed becomes whatever `max_accel` reaches over that distance.
    /// On error the maneuver is left untouched.
    pub fn plan_to_target_distance(
        &mut self,
        config: &KinematicsConfig,
        start_dist: f64,
        end_dist: f64,
    ) -> KinematicsResult<f64> {
        self.ensure_not_started()?;
        let profile = self.solve_to_distance(config, start_dist, end_dist)?;

        if profile.clamped {
            warn!(
                direction = %self.direction,
                requested = self.target_speed,
                achievable = profile.end_speed,
                max_accel = config.max_accel,
                "target speed not reachable within distance; clamped to max acceleration"
            );
        }
        debug!(
            direction = %self.direction,
            start_dist,
            end_dist,
            end_speed = profile.end_speed,
            accel = profile.accel,
            duration_secs = profile.duration_secs,
            "planned speed change to target distance"
        );

        let end_speed = profile.end_speed;
        self.profile = Some(profile);
        Ok(end_speed)
    }

    /// `true` if the span leaves positive distance after the response lag.
    /// Never changes the maneuver.
    pub fn can_plan(&self, config: &KinematicsConfig, start_dist: f64, end_dist: f64) -> bool {
        end_dist - start_dist - self.start_speed * config.response_lag_secs > 0.0
    }

    fn solve_to_distance(
        &self,
        config: &KinematicsConfig,
        start_dist: f64,
        end_dist: f64,
    ) -> Result<SpeedProfile, Infeasibility> {
        self.check_direction()?;
        if end_dist <= start_dist {
            return Err(Infeasibility::NonPositiveDistance { start_dist, end_dist });
        }

        let v0 = self.start_speed;
        let displacement = end_dist - start_dist - v0 * config.response_lag_secs;
        if !(displacement > 0.0) {
            return Err(Infeasibility::InsufficientDistance { displacement });
        }

        let mut end_speed = self.target_speed;
        let mut accel = ramp_numerator(self.direction, v0, (end_speed - v0).abs()) / displacement;
        let clamped = accel > config.max_accel;
        if clamped {
            accel = config.max_accel;
            end_speed = match self.direction {
                Direction::SpeedUp => (v0 * v0 + 2.0 * accel * displacement).sqrt(),
                Direction::SlowDown => (v0 * v0 - 2.0 * accel * displacement).max(0.0).sqrt(),
            };
        }

        // A clamp over a vanishing displacement can round the end speed back
        // to the start speed.
        let duration_secs = (end_speed - v0).abs() / accel;
        if !is_usable_duration(duration_secs) {
            return Err(Infeasibility::InsufficientDistance { displacement });
        }

        Ok(SpeedProfile {
            direction: self.direction,
            start_dist,
            end_dist,
            start_speed: v0,
            end_speed,
            accel,
            duration_secs,
            clamped,
        })
    }

    fn check_direction(&self) -> Result<(), Infeasibility> {
        check_speeds(self.start_speed, self.target_speed)?;
        if !self.direction.admits(self.start_speed, self.target_speed) {
            return Err(Infeasibility::WrongSpeedDirection {
                direction:   self.direction,
                start_speed: self.start_speed,
                end_speed:   self.target_speed,
            });
        }
        Ok(())
    }

    fn ensure_not_started(&self) -> KinematicsResult<()> {
        if self.started_at.is_some() {
            return Err(KinematicsError::WrongPhase {
                expected: ManeuverPhase::Planned,
                actual:   ManeuverPhase::Executing,
            });
        }
        Ok(())
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Start executing the planned profile at `now`.
    pub fn begin(&mut self, now: Timestamp) -> KinematicsResult<()> {
        match self.static_phase() {
            ManeuverPhase::Planned => {
                self.started_at = Some(now);
                Ok(())
            }
            actual => Err(KinematicsError::WrongPhase {
                expected: ManeuverPhase::Planned,
                actual,
            }),
        }
    }

    /// The speed to command at `now`, m/s.
    ///
    /// Linear between the start and planned end speed over the ramp
    /// duration, measured from [`begin`][Self::begin].  Saturates at the end
    /// speed once the ramp is over.  A `now` before the start is a clock
    /// anomaly.
    pub fn generate_speed_command(&self, now: Timestamp) -> KinematicsResult<f64> {
        let (Some(profile), Some(start)) = (&self.profile, self.started_at) else {
            return Err(KinematicsError::WrongPhase {
                expected: ManeuverPhase::Executing,
                actual:   self.static_phase(),
            });
        };

        let elapsed_ms = now.since(start);
        if elapsed_ms < 0 {
            return Err(KinematicsError::ClockAnomaly { elapsed_ms });
        }

        if !is_usable_duration(profile.duration_secs) {
            return Ok(profile.end_speed);
        }
        let fraction = (elapsed_ms as f64 / 1_000.0) / profile.duration_secs;
        if fraction >= 1.0 {
            return Ok(profile.end_speed);
        }
        Ok(profile.start_speed + (profile.end_speed - profile.start_speed) * fraction)
    }
}

/// `v0·Δv ± ½·Δv²`: the ramp distance times the acceleration.
fn ramp_numerator(direction: Direction, v0: f64, dv: f64) -> f64 {
    v0 * dv + direction.sign() * 0.5 * dv * dv
}

fn is_usable_duration(secs: f64) -> bool {
    secs.is_finite() && secs > 0.0
}

fn check_speeds(start_speed: f64, end_speed: f64) -> Result<(), Infeasibility> {
    let ok = |v: f64| v.is_finite() && v >= 0.0;
    if ok(start_speed) && ok(end_speed) {
        Ok(())
    } else {
        Err(Infeasibility::InvalidSpeed { start_speed, end_speed })
    }
}
