//! The fixed-rate spin loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use gd_core::Clock;
use gd_planner::PlannerConnector;

use crate::{CycleOutcome, PlanDelegator, TrajectoryPublisher};

/// Counters accumulated by [`PlanDelegator::spin`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinStats {
    pub cycles:    u64,
    pub published: u64,
    pub skipped:   u64,
    /// Cycles that ran past their deadline.
    pub overruns:  u64,
    /// Deadlines dropped to catch up after overruns.
    pub coalesced: u64,
}

impl SpinStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        if outcome.is_published() {
            self.published += 1;
        } else {
            self.skipped += 1;
        }
    }
}

impl<C: PlannerConnector, K: Clock> PlanDelegator<C, K> {
    /// Run cycles at `spin_rate_hz` until `shutdown` is set.
    ///
    /// Cycles never overlap.  When a cycle overruns, every deadline it
    /// overran is dropped and the loop resumes on the next one, so a slow
    /// cycle is followed by at most one immediate cycle.  `shutdown` is
    /// checked between cycles.
    pub fn spin<P: TrajectoryPublisher>(&mut self, publisher: &mut P, shutdown: &AtomicBool) -> SpinStats {
        let period = self.config.cycle_period().max(Duration::from_nanos(1));
        let mut stats = SpinStats::default();
        let mut deadline = Instant::now();
        info!(rate_hz = self.config.spin_rate_hz, "delegator spinning");

        while !shutdown.load(Ordering::Acquire) {
            let outcome = self.run_cycle(publisher);
            stats.record(&outcome);

            deadline += period;
            let now = Instant::now();
            if now > deadline {
                let behind = now - deadline;
                let missed = behind.as_nanos() / period.as_nanos();
                warn!(
                    overrun_ms = behind.as_millis() as u64,
                    missed = missed as u64,
                    "planning cycle overran its period"
                );
                stats.overruns += 1;
                stats.coalesced += missed as u64;
                deadline += period * u32::try_from(missed + 1).unwrap_or(u32::MAX);
            }
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
        }

        info!(
            cycles = stats.cycles,
            published = stats.published,
            overruns = stats.overruns,
            "delegator stopped"
        );
        stats
    }
}
