//! The planned speed/distance/time profile of a speed change.

use crate::Direction;

/// Result of planning a [`SpeedChange`][crate::SpeedChange].
///
/// The speed ramps linearly from `start_speed` to `end_speed` over
/// `duration_secs` at a constant `accel`, then holds `end_speed` until
/// `end_dist`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedProfile {
    pub direction: Direction,

    /// Downtrack distance where the maneuver begins, m.
    pub start_dist: f64,

    /// Downtrack distance where the maneuver ends, m.  Includes the response
    /// lag and the end buffer.
    pub end_dist: f64,

    /// m/s
    pub start_speed: f64,

    /// Speed actually reached, m/s.  Lower than the requested target when
    /// [`clamped`][Self::clamped].
    pub end_speed: f64,

    /// Acceleration magnitude used, m/s².  Always in `(0, max_accel]`.
    pub accel: f64,

    /// Length of the ramp, s.  Always finite and positive.
    pub duration_secs: f64,

    /// `true` when the target speed was lowered to respect `max_accel`.
    pub clamped: bool,
}

impl SpeedProfile {
    /// Total distance covered, m.
    #[inline]
    pub fn length(&self) -> f64 {
        self.end_dist - self.start_dist
    }

    /// Distance covered during the ramp itself, m.
    #[inline]
    pub fn ramp_distance(&self) -> f64 {
        0.5 * (self.start_speed + self.end_speed) * self.duration_secs
    }

    /// Speed `t` seconds after the ramp starts.
    pub fn speed_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            self.start_speed
        } else if t >= self.duration_secs {
            self.end_speed
        } else {
            self.start_speed + self.direction.sign() * self.accel * t
        }
    }

    /// Distance travelled `t` seconds after the ramp starts, m.
    pub fn distance_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            0.0
        } else if t < self.duration_secs {
            self.start_speed * t + self.direction.sign() * 0.5 * self.accel * t * t
        } else {
            self.ramp_distance() + self.end_speed * (t - self.duration_secs)
        }
    }

    /// Time to cover [`length`][Self::length]: the ramp, then the remainder
    /// at `end_speed`.  A maneuver that slows to a stop ends with its ramp.
    pub fn travel_secs(&self) -> f64 {
        let remaining = (self.length() - self.ramp_distance()).max(0.0);
        if self.end_speed > 0.0 {
            self.duration_secs + remaining / self.end_speed
        } else {
            self.duration_secs
        }
    }
}
