//! `gd-core`: foundational types for the `rust_guidance` trajectory stack.
//!
//! This crate is a dependency of every other `gd-*` crate.  It has no `gd-*`
//! dependencies and few external ones (`thiserror`, `serde`, `serde_json`,
//! `parking_lot`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`time`]      | `Timestamp`, `Clock`, `SystemClock`, `ManualClock`         |
//! | [`vehicle`]   | `Pose`, `Twist`, `Stamped<T>`                              |
//! | [`latest`]    | `Latest<T>`: torn-free latest-value slot                   |
//! | [`config`]    | `GuidanceConfig`, `DelegatorConfig`, `KinematicsConfig`    |
//! | [`error`]     | `GuidanceError`, `GuidanceResult`                          |
//!
//! # Units
//!
//! Every absolute time is a [`Timestamp`] in integer milliseconds since the
//! Unix epoch.  Configuration durations carry an explicit `_ms` or `_secs`
//! suffix.  Distances are metres, speeds m/s, accelerations m/s².

pub mod config;
pub mod error;
pub mod latest;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DelegatorConfig, GuidanceConfig, KinematicsConfig, MIN_SPIN_RATE_HZ, PlannerNaming};
pub use error::{GuidanceError, GuidanceResult};
pub use latest::Latest;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use vehicle::{Pose, Stamped, Twist};
