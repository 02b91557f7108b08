//! Where finished trajectories go.

use gd_core::Timestamp;
use gd_model::TrajectoryPlan;

use crate::SkipReason;

/// Receives the delegator's output.
///
/// [`publish`][Self::publish] is called at most once per cycle, only with a
/// trajectory that passed the validity and sufficiency gates.
/// [`on_cycle_skipped`][Self::on_cycle_skipped] has a no-op default.
///
/// # Example: forward to a channel
///
/// ```rust,ignore
/// struct ToChannel(std::sync::mpsc::Sender<TrajectoryPlan>);
///
/// impl TrajectoryPublisher for ToChannel {
///     fn publish(&mut self, trajectory: TrajectoryPlan) {
///         let _ = self.0.send(trajectory);
///     }
/// }
/// ```
pub trait TrajectoryPublisher {
    fn publish(&mut self, trajectory: TrajectoryPlan);

    /// Called instead of `publish` when a cycle produced nothing.
    fn on_cycle_skipped(&mut self, _now: Timestamp, _reason: &SkipReason) {}
}

/// Collects every published trajectory.
impl TrajectoryPublisher for Vec<TrajectoryPlan> {
    fn publish(&mut self, trajectory: TrajectoryPlan) {
        self.push(trajectory);
    }
}

/// A [`TrajectoryPublisher`] that drops everything.
pub struct NoopPublisher;

impl TrajectoryPublisher for NoopPublisher {
    fn publish(&mut self, _trajectory: TrajectoryPlan) {}
}
