//! Static configuration, fixed at startup.
//!
//! Loaded from JSON by the application (see [`GuidanceConfig::from_path`]).
//! Every field has a default, so a config file only needs to list what it
//! overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GuidanceError, GuidanceResult};

// ── PlannerNaming ─────────────────────────────────────────────────────────────

/// How a planner backend identifier maps to the service name of its endpoint.
///
///   service_name = prefix + planner + suffix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerNaming {
    pub prefix: String,
    pub suffix: String,
}

impl Default for PlannerNaming {
    fn default() -> Self {
        Self {
            prefix: "/guidance/plugins/".to_string(),
            suffix: "/plan_trajectory".to_string(),
        }
    }
}

impl PlannerNaming {
    /// Derive the endpoint service name for `planner`.
    pub fn service_name(&self, planner: &str) -> String {
        format!("{}{}{}", self.prefix, planner, self.suffix)
    }
}

// ── DelegatorConfig ───────────────────────────────────────────────────────────

/// Slowest accepted cycle rate: one cycle every 1000 s.
pub const MIN_SPIN_RATE_HZ: f64 = 1e-3;

/// Configuration of the plan delegator's cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegatorConfig {
    /// Backend service name derivation.
    pub naming: PlannerNaming,

    /// Planning cycles per second.  Default: 10.
    pub spin_rate_hz: f64,

    /// Minimum time span a trajectory must cover before dispatch stops and
    /// the trajectory may be published, in milliseconds.  Default: 6000.
    pub min_trajectory_duration_ms: u64,

    /// Upper bound on one planner call, in milliseconds.  Default: 100.
    pub planner_timeout_ms: u64,

    /// Pose/twist older than this are treated as absent.  `None` disables the
    /// staleness check.  Default: 500.
    pub max_state_age_ms: Option<u64>,
}

impl Default for DelegatorConfig {
    fn default() -> Self {
        Self {
            naming:                     PlannerNaming::default(),
            spin_rate_hz:               10.0,
            min_trajectory_duration_ms: 6_000,
            planner_timeout_ms:         100,
            max_state_age_ms:           Some(500),
        }
    }
}

impl DelegatorConfig {
    /// Period of one planning cycle.  Rates below [`MIN_SPIN_RATE_HZ`] are
    /// read as that rate.
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.spin_rate_hz.max(MIN_SPIN_RATE_HZ))
    }

    #[inline]
    pub fn min_trajectory_duration(&self) -> Duration {
        Duration::from_millis(self.min_trajectory_duration_ms)
    }

    #[inline]
    pub fn planner_timeout(&self) -> Duration {
        Duration::from_millis(self.planner_timeout_ms)
    }

    /// Reject values the cycle cannot run with.
    pub fn validate(&self) -> GuidanceResult<()> {
        if !(self.spin_rate_hz.is_finite() && self.spin_rate_hz >= MIN_SPIN_RATE_HZ) {
            return Err(config_err(format!(
                "spin_rate_hz must be finite and >= {MIN_SPIN_RATE_HZ}, got {}",
                self.spin_rate_hz
            )));
        }
        if self.planner_timeout_ms == 0 {
            return Err(config_err("planner_timeout_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

// ── KinematicsConfig ──────────────────────────────────────────────────────────

/// Limits and vehicle response parameters for longitudinal maneuvers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicsConfig {
    /// Maximum acceleration magnitude, m/s².  Default: 2.0.
    pub max_accel: f64,

    /// Speed changes below this (m/s) use half of `max_accel`.  Default: 2.0.
    pub small_speed_change: f64,

    /// Delay between a commanded speed change and the vehicle responding, s.
    /// Default: 1.0.
    pub response_lag_secs: f64,

    /// Extra distance allowed after a speed change, as seconds of travel at
    /// the end speed.  Default: 0.2.
    pub end_buffer_secs: f64,

    /// Spacing of trajectory points produced by the built-in longitudinal
    /// planner, in milliseconds.  Default: 100.
    pub sample_period_ms: u64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            max_accel:          2.0,
            small_speed_change: 2.0,
            response_lag_secs:  1.0,
            end_buffer_secs:    0.2,
            sample_period_ms:   100,
        }
    }
}

impl KinematicsConfig {
    /// Reject limits no maneuver can be planned with.
    pub fn validate(&self) -> GuidanceResult<()> {
        if !(self.max_accel.is_finite() && self.max_accel > 0.0) {
            return Err(config_err(format!("max_accel must be > 0, got {}", self.max_accel)));
        }
        if !(self.small_speed_change.is_finite() && self.small_speed_change >= 0.0) {
            return Err(config_err(format!(
                "small_speed_change must be >= 0, got {}",
                self.small_speed_change
            )));
        }
        if !(self.response_lag_secs.is_finite() && self.response_lag_secs >= 0.0) {
            return Err(config_err(format!(
                "response_lag_secs must be >= 0, got {}",
                self.response_lag_secs
            )));
        }
        if !(self.end_buffer_secs.is_finite() && self.end_buffer_secs >= 0.0) {
            return Err(config_err(format!(
                "end_buffer_secs must be >= 0, got {}",
                self.end_buffer_secs
            )));
        }
        if self.sample_period_ms == 0 {
            return Err(config_err("sample_period_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

// ── GuidanceConfig ────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub delegator:  DelegatorConfig,
    pub kinematics: KinematicsConfig,
}

impl GuidanceConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> GuidanceResult<Self> {
        let config: GuidanceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> GuidanceResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the cycle or the kinematics cannot run with.
    pub fn validate(&self) -> GuidanceResult<()> {
        self.delegator.validate()?;
        self.kinematics.validate()
    }
}

fn config_err(msg: String) -> GuidanceError {
    GuidanceError::Config(msg)
}
