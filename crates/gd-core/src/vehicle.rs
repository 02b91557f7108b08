//! Vehicle state snapshots.
//!
//! Pose and twist arrive from independent sources at independent rates.  Each
//! is wrapped in a [`Stamped`] so consumers can judge staleness.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Planar vehicle pose in the map frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Metres east of the map origin.
    pub x: f64,
    /// Metres north of the map origin.
    pub y: f64,
    /// Heading in radians, counter-clockwise from +x.
    pub yaw: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }
}

/// Vehicle velocity in the body frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Twist {
    /// Forward speed, m/s.
    pub linear_x: f64,
    /// Lateral speed, m/s.
    pub linear_y: f64,
    /// Yaw rate, rad/s.
    pub angular_z: f64,
}

impl Twist {
    #[inline]
    pub fn forward(speed: f64) -> Self {
        Self { linear_x: speed, ..Self::default() }
    }
}

/// A value tagged with the time it was measured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub stamp: Timestamp,
    pub value: T,
}

impl<T> Stamped<T> {
    #[inline]
    pub fn new(stamp: Timestamp, value: T) -> Self {
        Self { stamp, value }
    }

    /// Milliseconds between the stamp and `now` (negative if stamped in the
    /// future).
    #[inline]
    pub fn age_ms(&self, now: Timestamp) -> i64 {
        now.since(self.stamp)
    }

    /// `true` when the value is older than `max_age_ms` at `now`.
    ///
    /// A value stamped in the future is not stale.
    #[inline]
    pub fn is_stale(&self, now: Timestamp, max_age_ms: u64) -> bool {
        self.age_ms(now) > max_age_ms as i64
    }
}
