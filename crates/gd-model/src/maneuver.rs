//! Maneuvers: atomic driving directives spanning a distance/time interval.

use std::fmt;

use serde::{Deserialize, Serialize};

use gd_core::Timestamp;

/// Fields shared by every maneuver kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManeuverParams {
    /// Downtrack distance at which the maneuver begins, m.
    pub start_dist: f64,
    /// Downtrack distance at which the maneuver ends, m.
    pub end_dist: f64,
    /// Speed at `start_dist`, m/s.
    pub start_speed: f64,
    /// Speed at `end_dist`, m/s.
    pub end_speed: f64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Identifier of the planner backend that turns this maneuver into
    /// trajectory points.
    pub planner: String,
    /// Lane the maneuver starts in.
    pub lane_id: String,
}

impl ManeuverParams {
    /// Distance covered by the maneuver, m.
    #[inline]
    pub fn length(&self) -> f64 {
        self.end_dist - self.start_dist
    }
}

/// A lane change additionally names its target lane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneChangeManeuver {
    #[serde(flatten)]
    pub params: ManeuverParams,
    pub ending_lane_id: String,
}

/// The kind of a [`Maneuver`], without its data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ManeuverKind {
    LaneFollowing,
    LaneChange,
    IntersectionTransitLeftTurn,
    IntersectionTransitRightTurn,
    IntersectionTransitStraight,
    SpeedChange,
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManeuverKind::LaneFollowing                => "lane_following",
            ManeuverKind::LaneChange                   => "lane_change",
            ManeuverKind::IntersectionTransitLeftTurn  => "intersection_transit_left_turn",
            ManeuverKind::IntersectionTransitRightTurn => "intersection_transit_right_turn",
            ManeuverKind::IntersectionTransitStraight  => "intersection_transit_straight",
            ManeuverKind::SpeedChange                  => "speed_change",
        };
        f.write_str(s)
    }
}

/// An atomic directive.  Exactly one kind is active.
///
/// Encoded as an internally tagged JSON object; an unknown `"type"` fails to
/// decode instead of producing a defaulted maneuver.
///
/// ```json
/// { "type": "lane_change", "start_dist": 0.0, "end_dist": 80.0, ...,
///   "ending_lane_id": "2" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Maneuver {
    LaneFollowing(ManeuverParams),
    LaneChange(LaneChangeManeuver),
    IntersectionTransitLeftTurn(ManeuverParams),
    IntersectionTransitRightTurn(ManeuverParams),
    IntersectionTransitStraight(ManeuverParams),
    SpeedChange(ManeuverParams),
}

impl Maneuver {
    /// The fields every kind carries.
    pub fn params(&self) -> &ManeuverParams {
        match self {
            Maneuver::LaneFollowing(p)
            | Maneuver::IntersectionTransitLeftTurn(p)
            | Maneuver::IntersectionTransitRightTurn(p)
            | Maneuver::IntersectionTransitStraight(p)
            | Maneuver::SpeedChange(p) => p,
            Maneuver::LaneChange(lc) => &lc.params,
        }
    }

    pub fn kind(&self) -> ManeuverKind {
        match self {
            Maneuver::LaneFollowing(_)                => ManeuverKind::LaneFollowing,
            Maneuver::LaneChange(_)                   => ManeuverKind::LaneChange,
            Maneuver::IntersectionTransitLeftTurn(_)  => ManeuverKind::IntersectionTransitLeftTurn,
            Maneuver::IntersectionTransitRightTurn(_) => ManeuverKind::IntersectionTransitRightTurn,
            Maneuver::IntersectionTransitStraight(_)  => ManeuverKind::IntersectionTransitStraight,
            Maneuver::SpeedChange(_)                  => ManeuverKind::SpeedChange,
        }
    }

    #[inline]
    pub fn planner(&self) -> &str {
        &self.params().planner
    }

    #[inline]
    pub fn start_time(&self) -> Timestamp {
        self.params().start_time
    }

    #[inline]
    pub fn end_time(&self) -> Timestamp {
        self.params().end_time
    }
}
