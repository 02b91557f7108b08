//! Framework error type.
//!
//! Sub-crates define their own error enums (`ModelError`, `KinematicsError`,
//! `PlannerError`, `DelegatorError`).  `GuidanceError` covers loading and
//! validating configuration.

use thiserror::Error;

/// The top-level error type for `gd-core`.
#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `gd-core`.
pub type GuidanceResult<T> = Result<T, GuidanceError>;
