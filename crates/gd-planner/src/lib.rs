//! `gd-planner`: everything on the backend side of a planning cycle.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`planner`]     | `TrajectoryPlanner` trait: the backend extension point         |
//! | [`request`]     | `PlanTrajectoryRequest`, `PlanTrajectoryResponse`              |
//! | [`client`]      | `PlannerClient`: named handle enforcing the per-call timeout   |
//! | [`connector`]   | `PlannerConnector` trait, `InProcessConnector` directory       |
//! | [`registry`]    | `PlannerRegistry`: one client per planner name, created lazily |
//! | [`backends`]    | `SpeedProfilePlanner`, `NoopPlanner`                           |
//! | [`error`]       | `PlannerError`, `PlannerResult<T>`                             |
//!
//! # Feature flags
//!
//! | Feature   | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | Use `rustc-hash`'s FxHashMap for the registry's client map |

pub mod backends;
pub mod client;
pub mod connector;
pub mod error;
pub mod planner;
pub mod registry;
pub mod request;


pub use backends::{NoopPlanner, SpeedProfilePlanner};
pub use client::PlannerClient;
pub use connector::{InProcessConnector, PlannerConnector};
pub use error::{PlannerError, PlannerResult};
pub use planner::TrajectoryPlanner;
pub use registry::PlannerRegistry;
pub use request::{PlanTrajectoryRequest, PlanTrajectoryResponse};
