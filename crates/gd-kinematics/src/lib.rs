//! `gd-kinematics`: the longitudinal speed-change family of maneuvers.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`phase`]         | `ManeuverPhase`, `Direction`                              |
//! | [`profile`]       | `SpeedProfile`: the planned speed/distance/time profile   |
//! | [`speed_change`]  | `SpeedChange`: plan / plan-to-distance / live commands    |
//! | [`error`]         | `KinematicsError`, `Infeasibility`, `KinematicsResult<T>` |
//!
//! # Lifecycle
//!
//! ```text
//! Unplanned ──plan / plan_to_target_distance──▶ Planned ──begin(now)──▶ Executing ──▶ Complete
//! ```
//!
//! Planning takes `&mut self` and is all-or-nothing: a failed call leaves the
//! maneuver exactly as it was.  Once [`SpeedChange::begin`] has been called the
//! maneuver is read-only; [`SpeedChange::generate_speed_command`] takes
//! `&self`, so an executing maneuver can be moved into an `Arc` and sampled
//! from a faster control thread while the planner works on other maneuvers.

pub mod error;
pub mod phase;
pub mod profile;
pub mod speed_change;


pub use error::{Infeasibility, KinematicsError, KinematicsResult};
pub use phase::{Direction, ManeuverPhase};
pub use profile::SpeedProfile;
pub use speed_change::SpeedChange;
