use gd_core::GuidanceError;
use gd_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DelegatorError {
    #[error("delegator configuration error: {0}")]
    Config(#[from] GuidanceError),

    #[error("rejected maneuver plan: {0}")]
    InvalidPlan(#[from] ModelError),
}

pub type DelegatorResult<T> = Result<T, DelegatorError>;
