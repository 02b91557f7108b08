use gd_core::Timestamp;
use thiserror::Error;

/// Structural problems with plans and trajectories.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("maneuver plan {plan_id:?} contains no maneuvers")]
    EmptyPlan { plan_id: String },

    #[error("maneuver plan could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("maneuver {index} of plan {plan_id:?} is malformed: {reason}")]
    MalformedManeuver {
        plan_id: String,
        index:   usize,
        reason:  String,
    },

    #[error("trajectory point at {got} does not come after {last}")]
    NonMonotonicTrajectory { last: Timestamp, got: Timestamp },
}

pub type ModelResult<T> = Result<T, ModelError>;
