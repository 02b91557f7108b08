//! Unit tests for gd-delegator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gd_core::{DelegatorConfig, ManualClock, Pose, Stamped, Timestamp};
use gd_model::{Maneuver, ManeuverParams, ManeuverPlan, TrajectoryPlan, TrajectoryPoint};
use gd_planner::{
    InProcessConnector, PlanTrajectoryRequest, PlanTrajectoryResponse, PlannerError, PlannerResult,
    TrajectoryPlanner,
};

use crate::{CycleOutcome, DelegatorBuilder, PlanDelegator, SkipReason, TrajectoryPublisher};

// ── Helpers ───────────────────────────────────────────────────────────────────

const START: Timestamp = Timestamp(1_000);

fn maneuver(planner: &str, start_dist: f64, end_dist: f64, end_time_ms: i64) -> Maneuver {
    Maneuver::LaneFollowing(ManeuverParams {
        start_dist,
        end_dist,
        start_speed: 10.0,
        end_speed: 10.0,
        start_time: Timestamp(0),
        end_time: Timestamp(end_time_ms),
        planner: planner.to_string(),
        lane_id: "1".to_string(),
    })
}

/// `a` until 20 s, then `b` until 30 s.
fn two_step_plan() -> ManeuverPlan {
    ManeuverPlan::new(
        "plan-ab",
        Timestamp(0),
        vec![maneuver("a", 0.0, 10.0, 20_000), maneuver("b", 10.0, 90.0, 30_000)],
    )
}

/// What a backend saw in one request.
#[derive(Clone, Debug, PartialEq)]
struct Seen {
    initial_len: usize,
    maneuvers:   usize,
    had_pose:    bool,
}

/// Answers points at fixed millisecond offsets from the trajectory tail (or
/// from the cycle time when there is no tail).
struct Scripted {
    name:       &'static str,
    offsets_ms: Vec<i64>,
    seen:       Mutex<Vec<Seen>>,
}

impl Scripted {
    fn new(name: &'static str, offsets_ms: &[i64]) -> Arc<Self> {
        Arc::new(Self {
            name,
            offsets_ms: offsets_ms.to_vec(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl TrajectoryPlanner for Scripted {
    fn plan_trajectory(&self, req: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
        self.seen.lock().unwrap().push(Seen {
            initial_len: req.initial_trajectory.len(),
            maneuvers:   req.maneuvers.len(),
            had_pose:    req.pose.is_some(),
        });
        let tail = req.initial_trajectory.last();
        let base = tail.map_or(req.now, |p| p.target_time);
        let x0 = tail.map_or(0.0, |p| p.x);

        let mut t = TrajectoryPlan::new("echo", req.now);
        t.points = self
            .offsets_ms
            .iter()
            .enumerate()
            .map(|(i, &ms)| TrajectoryPoint::new(x0 + i as f64, 0.0, base.offset_ms(ms)).with_source(self.name, "1"))
            .collect();
        Ok(PlanTrajectoryResponse::new(t))
    }
}

struct Failing;

impl TrajectoryPlanner for Failing {
    fn plan_trajectory(&self, _req: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
        Err(PlannerError::Rejected {
            planner: "b".into(),
            reason:  "no route".into(),
        })
    }
}

struct Slow(Duration);

impl TrajectoryPlanner for Slow {
    fn plan_trajectory(&self, req: &PlanTrajectoryRequest<'_>) -> PlannerResult<PlanTrajectoryResponse> {
        std::thread::sleep(self.0);
        Scripted::new("slow", &[0, 10_000]).plan_trajectory(req)
    }
}

#[derive(Default)]
struct Recorder {
    published: Vec<TrajectoryPlan>,
    skipped:   Vec<(Timestamp, SkipReason)>,
}

impl TrajectoryPublisher for Recorder {
    fn publish(&mut self, trajectory: TrajectoryPlan) {
        self.published.push(trajectory);
    }

    fn on_cycle_skipped(&mut self, now: Timestamp, reason: &SkipReason) {
        self.skipped.push((now, reason.clone()));
    }
}

struct Harness {
    clock:     ManualClock,
    connector: Arc<InProcessConnector>,
    delegator: PlanDelegator<Arc<InProcessConnector>, ManualClock>,
}

impl Harness {
    fn new(config: DelegatorConfig) -> Self {
        let clock = ManualClock::new(START);
        let connector = Arc::new(InProcessConnector::new());
        let delegator = DelegatorBuilder::new(config, connector.clone())
            .clock(clock.clone())
            .build()
            .unwrap();
        Self { clock, connector, delegator }
    }

    fn serve(&self, planner: &str, backend: Arc<dyn TrajectoryPlanner>) {
        self.connector
            .register_planner(&self.delegator.config().naming, planner, backend);
    }
}

fn harness() -> Harness {
    Harness::new(DelegatorConfig::default())
}

fn times(t: &TrajectoryPlan) -> Vec<i64> {
    t.points.iter().map(|p| p.target_time.0).collect()
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use super::*;

    #[test]
    fn two_backends_concatenate_into_one_plan() {
        let mut h = harness();
        let a = Scripted::new("a", &[0, 1_000]);
        let b = Scripted::new("b", &[0, 2_000, 7_000]);
        h.serve("a", a.clone());
        h.serve("b", b.clone());
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let mut out = Recorder::default();
        let outcome = h.delegator.run_cycle(&mut out);

        assert!(outcome.is_published(), "{outcome:?}");
        assert_eq!(out.published.len(), 1);
        let t = &out.published[0];
        // b's echo of a's tail is dropped.
        assert_eq!(times(t), vec![1_000, 2_000, 4_000, 9_000]);
        let planners: Vec<&str> = t.points.iter().map(|p| p.planner.as_str()).collect();
        assert_eq!(planners, vec!["a", "a", "b", "b"]);
        assert_eq!(t.maneuver_plan_id, "plan-ab");

        assert_eq!(a.seen.lock().unwrap()[0], Seen { initial_len: 0, maneuvers: 2, had_pose: false });
        assert_eq!(b.seen.lock().unwrap()[0], Seen { initial_len: 2, maneuvers: 1, had_pose: false });
        match outcome {
            CycleOutcome::Published { points, span_ms, calls, .. } => {
                assert_eq!((points, span_ms, calls), (4, 8_000, 2));
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn stops_once_long_enough() {
        let mut h = harness();
        let a = Scripted::new("a", &[0, 6_000]);
        let b = Scripted::new("b", &[0, 1_000]);
        h.serve("a", a.clone());
        h.serve("b", b.clone());
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let mut out = Recorder::default();
        assert!(h.delegator.run_cycle(&mut out).is_published());
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 0);
        assert_eq!(h.delegator.registry().len(), 1, "b never needed a client");
    }

    #[test]
    fn starts_at_first_active_maneuver() {
        let mut h = harness();
        let a = Scripted::new("a", &[0, 1_000]);
        let b = Scripted::new("b", &[0, 2_000, 7_000]);
        h.serve("a", a.clone());
        h.serve("b", b.clone());
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();
        h.clock.set(Timestamp(20_001));

        let mut out = Recorder::default();
        assert!(h.delegator.run_cycle(&mut out).is_published());
        assert_eq!(a.calls(), 0);
        assert_eq!(times(&out.published[0]), vec![20_001, 22_001, 27_001]);
    }

    #[test]
    fn exhausted_maneuvers_leave_trajectory_insufficient() {
        let mut h = harness();
        h.serve("a", Scripted::new("a", &[0, 1_000]));
        h.serve("b", Scripted::new("b", &[0, 1_000]));
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let mut out = Recorder::default();
        let outcome = h.delegator.run_cycle(&mut out);
        assert_eq!(
            outcome,
            CycleOutcome::Skipped(SkipReason::InsufficientTrajectory { points: 3, span_ms: 2_000 })
        );
        assert!(out.published.is_empty());
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].0, START);
    }

    #[test]
    fn registry_reuses_clients_across_cycles() {
        let mut h = harness();
        h.serve("a", Scripted::new("a", &[0, 1_000]));
        h.serve("b", Scripted::new("b", &[0, 7_000]));
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let mut out = Recorder::default();
        let outcomes = h.delegator.run_cycles(3, &mut out);
        assert!(outcomes.iter().all(CycleOutcome::is_published));
        assert_eq!(h.delegator.registry().len(), 2);

        let before = Arc::clone(h.delegator.registry().get("a").unwrap().backend());
        h.delegator.run_cycle(&mut out);
        let after = Arc::clone(h.delegator.registry().get("a").unwrap().backend());
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn speed_profile_backends_end_to_end() {
        use gd_core::KinematicsConfig;
        use gd_planner::SpeedProfilePlanner;

        let mut h = harness();
        let backend = Arc::new(SpeedProfilePlanner::new("longitudinal", KinematicsConfig::default()));
        h.serve("cruise", backend.clone());
        h.serve("speed", backend);

        let mut speed_up = maneuver("speed", 50.0, 150.0, 30_000);
        if let Maneuver::LaneFollowing(p) = &mut speed_up {
            p.end_speed = 15.0;
        }
        let plan = ManeuverPlan::new("drive", Timestamp(0), vec![maneuver("cruise", 0.0, 50.0, 20_000), speed_up]);
        h.delegator.inputs().update_plan(plan).unwrap();
        h.delegator.inputs().update_pose(Stamped::new(START, Pose::new(0.0, 0.0, 0.0)));

        let mut out: Vec<TrajectoryPlan> = Vec::new();
        let outcome = h.delegator.run_cycle(&mut out);
        assert!(outcome.is_published(), "{outcome:?}");

        let t = &out[0];
        assert!(t.span_ms() >= 6_000);
        for pair in t.points.windows(2) {
            assert!(pair[0].target_time < pair[1].target_time);
            assert!(pair[0].x < pair[1].x);
        }
        assert_eq!(t.first().unwrap().planner, "cruise");
        assert_eq!(t.last().unwrap().planner, "speed");
        assert!((t.last().unwrap().x - 150.0).abs() < 1e-6);
    }
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use super::*;
    use gd_planner::NoopPlanner;

    #[test]
    fn failure_aborts_rest_of_cycle() {
        let mut h = harness();
        let c = Scripted::new("c", &[0, 10_000]);
        h.serve("a", Scripted::new("a", &[0, 1_000]));
        h.serve("b", Arc::new(Failing));
        h.serve("c", c.clone());
        let plan = ManeuverPlan::new(
            "plan-abc",
            Timestamp(0),
            vec![
                maneuver("a", 0.0, 10.0, 20_000),
                maneuver("b", 10.0, 20.0, 25_000),
                maneuver("c", 20.0, 90.0, 30_000),
            ],
        );
        h.delegator.inputs().update_plan(plan).unwrap();

        let mut out = Recorder::default();
        let outcome = h.delegator.run_cycle(&mut out);
        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::PlannerFailed(PlannerError::Rejected { .. }))
        ));
        assert!(out.published.is_empty());
        assert_eq!(c.calls(), 0);
    }

    #[test]
    fn slow_planner_cannot_stall_the_cycle() {
        let config = DelegatorConfig { planner_timeout_ms: 10, ..DelegatorConfig::default() };
        let mut h = Harness::new(config);
        h.serve("a", Arc::new(Slow(Duration::from_millis(1_500))));
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let mut out = Recorder::default();
        let started = Instant::now();
        let outcome = h.delegator.run_cycle(&mut out);
        let took = started.elapsed();

        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::PlannerFailed(PlannerError::Timeout { .. }))
        ));
        assert!(took < Duration::from_millis(1_000), "cycle took {took:?}");
        assert!(out.published.is_empty());

        // The abandoned call is still running; the next cycle fails fast.
        let started = Instant::now();
        assert!(matches!(
            h.delegator.run_cycle(&mut out),
            CycleOutcome::Skipped(SkipReason::PlannerFailed(PlannerError::Busy { .. }))
        ));
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }

    #[test]
    fn unavailable_planner_is_retried_next_cycle() {
        let mut h = harness();
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let mut out = Recorder::default();
        let outcome = h.delegator.run_cycle(&mut out);
        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::PlannerFailed(PlannerError::Unavailable { ref service }))
                if service == "/guidance/plugins/a/plan_trajectory"
        ));
        assert!(h.delegator.registry().is_empty());

        h.serve("a", Scripted::new("a", &[0, 7_000]));
        assert!(h.delegator.run_cycle(&mut out).is_published());
    }

    #[test]
    fn short_response_is_invalid() {
        let mut h = harness();
        h.serve("a", Arc::new(NoopPlanner));
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let outcome = h.delegator.run_cycle(&mut Recorder::default());
        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::PlannerFailed(PlannerError::InvalidResponse { .. }))
        ));
    }

    #[test]
    fn out_of_order_response_is_invalid() {
        let mut h = harness();
        h.serve("a", Scripted::new("a", &[0, 3_000, 2_000]));
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let outcome = h.delegator.run_cycle(&mut Recorder::default());
        assert!(matches!(
            outcome,
            CycleOutcome::Skipped(SkipReason::PlannerFailed(PlannerError::InvalidResponse { .. }))
        ));
    }
}

// ── Inputs & gating ───────────────────────────────────────────────────────────

#[cfg(test)]
mod inputs {
    use super::*;
    use crate::DelegatorError;

    #[test]
    fn no_plan_skips() {
        let mut h = harness();
        let mut out = Recorder::default();
        assert_eq!(h.delegator.run_cycle(&mut out), CycleOutcome::Skipped(SkipReason::NoPlan));
        assert_eq!(out.skipped.len(), 1);
    }

    #[test]
    fn expired_plan_is_discarded() {
        let mut h = harness();
        let a = Scripted::new("a", &[0, 7_000]);
        h.serve("a", a.clone());
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();
        h.clock.set(Timestamp(30_001));

        let mut out = Recorder::default();
        assert_eq!(
            h.delegator.run_cycle(&mut out),
            CycleOutcome::Skipped(SkipReason::ExpiredPlan { plan_id: "plan-ab".into() })
        );
        assert!(h.delegator.inputs().snapshot().plan.is_none());
        assert_eq!(h.delegator.run_cycle(&mut out), CycleOutcome::Skipped(SkipReason::NoPlan));
        assert_eq!(a.calls(), 0);
    }

    #[test]
    fn invalid_update_keeps_previous_plan() {
        let h = harness();
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let err = h
            .delegator
            .inputs()
            .update_plan(ManeuverPlan::new("empty", Timestamp(0), vec![]))
            .unwrap_err();
        assert!(matches!(err, DelegatorError::InvalidPlan(_)));
        assert_eq!(h.delegator.inputs().snapshot().plan.unwrap().plan_id, "plan-ab");
    }

    #[test]
    fn stale_pose_reads_as_absent() {
        let mut h = harness();
        let a = Scripted::new("a", &[0, 7_000]);
        h.serve("a", a.clone());
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        // 1000 ms old, limit 500 ms.
        h.delegator.inputs().update_pose(Stamped::new(Timestamp(0), Pose::default()));
        h.delegator.run_cycle(&mut Recorder::default());
        h.delegator.inputs().update_pose(Stamped::new(Timestamp(900), Pose::default()));
        h.delegator.run_cycle(&mut Recorder::default());

        let seen: Vec<bool> = a.seen.lock().unwrap().iter().map(|s| s.had_pose).collect();
        assert_eq!(seen, vec![false, true]);
    }

    #[test]
    fn producers_share_the_slots() {
        let h = harness();
        let producer = h.delegator.inputs().clone();
        producer.update_plan(two_step_plan()).unwrap();
        assert!(h.delegator.inputs().snapshot().plan.is_some());
    }

    #[test]
    fn builder_rejects_bad_rate() {
        for rate in [0.0, 1e-20, f64::NAN] {
            let config = DelegatorConfig { spin_rate_hz: rate, ..DelegatorConfig::default() };
            let result = DelegatorBuilder::new(config, Arc::new(InProcessConnector::new())).build();
            assert!(matches!(result, Err(DelegatorError::Config(_))), "rate {rate}");
        }
    }

    #[test]
    fn builder_and_file_config_agree() {
        let config = DelegatorConfig { planner_timeout_ms: 0, ..DelegatorConfig::default() };
        assert!(config.validate().is_err());
        let result = DelegatorBuilder::new(config, Arc::new(InProcessConnector::new())).build();
        assert!(matches!(result, Err(DelegatorError::Config(_))));
    }
}

// ── Spin loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spin {
    use std::sync::atomic::AtomicBool;
    use std::thread;

    use super::*;
    use crate::NoopPublisher;

    #[test]
    fn stops_when_shutdown_is_set() {
        let config = DelegatorConfig { spin_rate_hz: 200.0, ..DelegatorConfig::default() };
        let mut h = Harness::new(config);
        let shutdown = AtomicBool::new(false);
        let published = AtomicUsize::new(0);

        struct Counting<'a>(&'a AtomicUsize);
        impl TrajectoryPublisher for Counting<'_> {
            fn publish(&mut self, _trajectory: TrajectoryPlan) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        h.serve("a", Scripted::new("a", &[0, 7_000]));
        h.delegator.inputs().update_plan(two_step_plan()).unwrap();

        let stats = thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(Duration::from_millis(60));
                shutdown.store(true, Ordering::Release);
            });
            h.delegator.spin(&mut Counting(&published), &shutdown)
        });

        assert!(stats.cycles >= 1);
        assert_eq!(stats.published, stats.cycles);
        assert_eq!(stats.published as usize, published.load(Ordering::SeqCst));
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn preset_shutdown_runs_nothing() {
        let mut h = harness();
        let stats = h.delegator.spin(&mut NoopPublisher, &AtomicBool::new(true));
        assert_eq!(stats.cycles, 0);
    }
}
