//! Lifecycle phase and speed-change direction.

use std::fmt;

/// Lifecycle of a longitudinal maneuver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ManeuverPhase {
    Unplanned,
    Planned,
    Executing,
    Complete,
}

impl fmt::Display for ManeuverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManeuverPhase::Unplanned => "unplanned",
            ManeuverPhase::Planned   => "planned",
            ManeuverPhase::Executing => "executing",
            ManeuverPhase::Complete  => "complete",
        };
        f.write_str(s)
    }
}

/// Which way the speed changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    SpeedUp,
    SlowDown,
}

impl Direction {
    /// `+1.0` for speeding up, `-1.0` for slowing down.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::SpeedUp  => 1.0,
            Direction::SlowDown => -1.0,
        }
    }

    /// `true` if going from `start` to `end` moves in this direction.
    #[inline]
    pub fn admits(self, start: f64, end: f64) -> bool {
        match self {
            Direction::SpeedUp  => end > start,
            Direction::SlowDown => end < start,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SpeedUp  => f.write_str("speed-up"),
            Direction::SlowDown => f.write_str("slow-down"),
        }
    }
}
