//! `gd-delegator`: the plan delegator.
//!
//! # Planning cycle
//!
//! ```text
//! every 1 / spin_rate_hz:
//!   ① Snapshot: latest plan, pose, twist (stale state reads as absent)
//!   ② Gate    : empty or expired plan → discard, skip cycle
//!   ③ Dispatch: for each maneuver from the first non-expired one:
//!                  registry.get_or_connect(maneuver.planner)
//!                  client.call(remaining maneuvers, trajectory so far, pose, twist)
//!                  append the returned points
//!                until the trajectory spans min_trajectory_duration_ms,
//!                the maneuvers run out, or a call fails
//!   ④ Publish : only if ≥ 2 points and long enough
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                             |
//! |---------------|------------------------------------------------------|
//! | [`delegator`] | `PlanDelegator` and the cycle                        |
//! | [`builder`]   | `DelegatorBuilder`                                   |
//! | [`inputs`]    | `DelegatorInputs`, `InputSnapshot`                   |
//! | [`publisher`] | `TrajectoryPublisher` trait, `NoopPublisher`         |
//! | [`outcome`]   | `CycleOutcome`, `SkipReason`                         |
//! | [`spin`]      | fixed-rate loop, `SpinStats`                         |
//! | [`error`]     | `DelegatorError`, `DelegatorResult<T>`               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let connector = Arc::new(InProcessConnector::new());
//! connector.register_planner(&config.delegator.naming, "cruise", Arc::new(backend));
//!
//! let mut delegator = DelegatorBuilder::new(config.delegator.clone(), connector).build()?;
//! let inputs = delegator.inputs().clone();
//! inputs.update_plan(plan)?;
//!
//! let shutdown = AtomicBool::new(false);
//! delegator.spin(&mut publisher, &shutdown);
//! ```

pub mod builder;
pub mod delegator;
pub mod error;
pub mod inputs;
pub mod outcome;
pub mod publisher;
pub mod spin;

#[cfg(test)]
mod tests;

pub use builder::DelegatorBuilder;
pub use delegator::PlanDelegator;
pub use error::{DelegatorError, DelegatorResult};
pub use inputs::{DelegatorInputs, InputSnapshot};
pub use outcome::{CycleOutcome, SkipReason};
pub use publisher::{NoopPublisher, TrajectoryPublisher};
pub use spin::SpinStats;
