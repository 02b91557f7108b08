//! `gd-model`: maneuver plans, trajectory plans, and the pure predicates that
//! gate them.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`maneuver`]    | `Maneuver` (tagged variant), `ManeuverParams`, `ManeuverKind` |
//! | [`plan`]        | `ManeuverPlan`: ordered maneuvers, replaced wholesale         |
//! | [`trajectory`]  | `TrajectoryPoint`, `TrajectoryPlan`                           |
//! | [`checks`]      | Expired / PlanValid / TrajectoryValid / LongEnough            |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                                |
//!
//! # Invariants
//!
//! - A `Maneuver` always has exactly one active kind; the shared fields are
//!   read through an exhaustive `match`, so adding a kind is a compile error
//!   until every accessor handles it.
//! - A `TrajectoryPlan` only grows through [`TrajectoryPlan::append`], which
//!   keeps arrival times strictly increasing.

pub mod checks;
pub mod error;
pub mod maneuver;
pub mod plan;
pub mod trajectory;


pub use checks::{is_maneuver_expired, is_plan_expired, is_plan_valid, is_trajectory_long_enough, is_trajectory_valid};
pub use error::{ModelError, ModelResult};
pub use maneuver::{LaneChangeManeuver, Maneuver, ManeuverKind, ManeuverParams};
pub use plan::{CONTIGUITY_TOLERANCE_M, ManeuverPlan};
pub use trajectory::{TrajectoryPlan, TrajectoryPoint};
