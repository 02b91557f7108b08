use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("no planner service at {service}")]
    Unavailable { service: String },

    #[error("planner {planner} took {elapsed_ms} ms, limit is {timeout_ms} ms")]
    Timeout {
        planner:    String,
        timeout_ms: u64,
        elapsed_ms: u64,
    },

    #[error("planner {planner} is still running a call that timed out")]
    Busy { planner: String },

    #[error("planner {planner} rejected the request: {reason}")]
    Rejected { planner: String, reason: String },

    #[error("planner {planner} returned an invalid response: {reason}")]
    InvalidResponse { planner: String, reason: String },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
