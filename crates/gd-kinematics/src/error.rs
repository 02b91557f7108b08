use thiserror::Error;

use crate::{Direction, ManeuverPhase};

/// Why a speed change cannot be planned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Infeasibility {
    #[error("speeds must be finite and non-negative (start {start_speed}, end {end_speed})")]
    InvalidSpeed { start_speed: f64, end_speed: f64 },

    #[error("{direction} from {start_speed} m/s to {end_speed} m/s")]
    WrongSpeedDirection {
        direction:   Direction,
        start_speed: f64,
        end_speed:   f64,
    },

    #[error("end distance {end_dist} m does not exceed start distance {start_dist} m")]
    NonPositiveDistance { start_dist: f64, end_dist: f64 },

    #[error("insufficient distance: {displacement} m left after response lag")]
    InsufficientDistance { displacement: f64 },

    #[error("no usable ramp: {accel} m/s² over {duration_secs} s")]
    DegenerateRamp { accel: f64, duration_secs: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    #[error("kinematically infeasible: {0}")]
    Infeasible(#[from] Infeasibility),

    #[error("clock anomaly: {elapsed_ms} ms elapsed since the maneuver started")]
    ClockAnomaly { elapsed_ms: i64 },

    #[error("maneuver is {actual}, operation requires {expected}")]
    WrongPhase {
        expected: ManeuverPhase,
        actual:   ManeuverPhase,
    },
}

pub type KinematicsResult<T> = Result<T, KinematicsError>;
