//! corridor: end-to-end demo of the guidance stack.
//!
//! A vehicle cruises down a straight corridor, then speeds up.  Three things
//! run at once:
//!
//! - the plan delegator, spinning at `spin_rate_hz` and publishing
//!   trajectories built by two in-process speed-profile backends;
//! - a vehicle thread integrating the commanded speed into pose and twist
//!   updates;
//! - a control thread that owns the speed-up maneuver's kinematics and
//!   streams speed commands at a higher rate once the vehicle reaches it.
//!
//! Usage: `corridor [config.json]`.  Set `RUST_LOG=debug` for per-cycle
//! events.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gd_core::{Clock, GuidanceConfig, Pose, Stamped, SystemClock, Timestamp, Twist};
use gd_delegator::{DelegatorBuilder, DelegatorInputs, SkipReason, TrajectoryPublisher};
use gd_kinematics::{ManeuverPhase, SpeedChange};
use gd_model::{Maneuver, ManeuverParams, ManeuverPlan, TrajectoryPlan};
use gd_planner::{InProcessConnector, SpeedProfilePlanner};

// ── Constants ─────────────────────────────────────────────────────────────────

const RUN_SECS:        u64   = 5;
const CRUISE_SPEED:    f64   = 10.0; // m/s
const TARGET_SPEED:    f64   = 15.0; // m/s
const CRUISE_END_M:    f64   = 30.0;
const SPEED_UP_END_M:  f64   = 130.0;
const LANE:            &str  = "1";
const VEHICLE_PERIOD:  Duration = Duration::from_millis(20);
const COMMAND_PERIOD:  Duration = Duration::from_millis(10);

// ── Plan ──────────────────────────────────────────────────────────────────────

fn corridor_plan(now: Timestamp) -> ManeuverPlan {
    let cruise = ManeuverParams {
        start_dist:  0.0,
        end_dist:    CRUISE_END_M,
        start_speed: CRUISE_SPEED,
        end_speed:   CRUISE_SPEED,
        start_time:  now,
        end_time:    now.offset_ms(3_000),
        planner:     "cruise".to_string(),
        lane_id:     LANE.to_string(),
    };
    let speed_up = ManeuverParams {
        start_dist:  CRUISE_END_M,
        end_dist:    SPEED_UP_END_M,
        start_speed: CRUISE_SPEED,
        end_speed:   TARGET_SPEED,
        start_time:  now.offset_ms(3_000),
        end_time:    now.offset_ms(30_000),
        planner:     "speed_change".to_string(),
        lane_id:     LANE.to_string(),
    };
    ManeuverPlan::new(
        format!("corridor@{}", now.as_millis()),
        now,
        vec![Maneuver::LaneFollowing(cruise), Maneuver::SpeedChange(speed_up)],
    )
}

// ── Publisher ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct LogPublisher {
    published: usize,
    skipped:   usize,
    last:      Option<TrajectoryPlan>,
}

impl TrajectoryPublisher for LogPublisher {
    fn publish(&mut self, trajectory: TrajectoryPlan) {
        self.published += 1;
        info!(
            trajectory_id = %trajectory.trajectory_id,
            points = trajectory.len(),
            span_ms = trajectory.span_ms(),
            "trajectory"
        );
        self.last = Some(trajectory);
    }

    fn on_cycle_skipped(&mut self, now: Timestamp, reason: &SkipReason) {
        self.skipped += 1;
        info!(%now, %reason, "cycle skipped");
    }
}

// ── Threads ───────────────────────────────────────────────────────────────────

fn load_f64(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Acquire))
}

fn store_f64(cell: &AtomicU64, value: f64) {
    cell.store(value.to_bits(), Ordering::Release);
}

/// Integrate the commanded speed and publish pose and twist.
fn simulate_vehicle(inputs: DelegatorInputs, position: &AtomicU64, speed: &AtomicU64, shutdown: &AtomicBool) {
    let clock = SystemClock;
    let mut last = clock.now();
    let mut x = 0.0;
    while !shutdown.load(Ordering::Acquire) {
        let now = clock.now();
        let v = load_f64(speed);
        x += v * now.secs_since(last).max(0.0);
        last = now;
        store_f64(position, x);
        inputs.update_pose(Stamped::new(now, Pose::new(x, 0.0, 0.0)));
        inputs.update_twist(Stamped::new(now, Twist::forward(v)));
        thread::sleep(VEHICLE_PERIOD);
    }
}

/// Own the speed-up maneuver and stream its speed commands once the vehicle
/// reaches its start.
fn control_speed(
    mut change: SpeedChange,
    start_dist: f64,
    position:   &AtomicU64,
    speed:      &AtomicU64,
    shutdown:   &AtomicBool,
) -> Result<()> {
    let clock = SystemClock;
    let mut reported_complete = false;
    while !shutdown.load(Ordering::Acquire) {
        let now = clock.now();
        if change.started_at().is_none() && load_f64(position) >= start_dist {
            change.begin(now)?;
            info!(x = load_f64(position), "speed change started");
        }
        if change.started_at().is_some() {
            store_f64(speed, change.generate_speed_command(now)?);
            if !reported_complete && change.phase(now) == ManeuverPhase::Complete {
                reported_complete = true;
                info!(speed = load_f64(speed), "speed change complete");
            }
        }
        thread::sleep(COMMAND_PERIOD);
    }
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => GuidanceConfig::from_path(&path)?,
        None => GuidanceConfig::default(),
    };
    let naming = &config.delegator.naming;

    // ── Backends ──────────────────────────────────────────────────────────
    let connector = Arc::new(InProcessConnector::new());
    for planner in ["cruise", "speed_change"] {
        let backend = SpeedProfilePlanner::new(planner, config.kinematics.clone());
        connector.register_planner(naming, planner, Arc::new(backend));
    }

    // ── Delegator and plan ────────────────────────────────────────────────
    let mut delegator = DelegatorBuilder::new(config.delegator.clone(), connector).build()?;
    let inputs = delegator.inputs().clone();
    let plan = corridor_plan(SystemClock.now());

    // Plan the speed-up kinematics here; the control thread takes ownership.
    let speed_up = plan
        .maneuvers
        .iter()
        .find(|m| matches!(m, Maneuver::SpeedChange(_)))
        .map(|m| m.params().clone())
        .ok_or_else(|| anyhow!("plan has no speed change"))?;
    let mut change = SpeedChange::for_maneuver(&speed_up)?;
    let end_speed = change.plan_to_target_distance(&config.kinematics, speed_up.start_dist, speed_up.end_dist)?;
    info!(end_speed, "speed change planned");

    inputs.update_plan(plan)?;

    // ── Run ───────────────────────────────────────────────────────────────
    let position = AtomicU64::new(0f64.to_bits());
    let speed = AtomicU64::new(CRUISE_SPEED.to_bits());
    let shutdown = AtomicBool::new(false);
    let mut publisher = LogPublisher::default();

    let stats = thread::scope(|s| -> Result<_> {
        s.spawn(|| {
            thread::sleep(Duration::from_secs(RUN_SECS));
            shutdown.store(true, Ordering::Release);
        });
        let vehicle = {
            let inputs = inputs.clone();
            s.spawn(|| simulate_vehicle(inputs, &position, &speed, &shutdown))
        };
        let control = s.spawn(|| control_speed(change, speed_up.start_dist, &position, &speed, &shutdown));

        let stats = delegator.spin(&mut publisher, &shutdown);

        vehicle.join().map_err(|_| anyhow!("vehicle thread panicked"))?;
        control.join().map_err(|_| anyhow!("control thread panicked"))??;
        Ok(stats)
    })?;

    info!(
        cycles = stats.cycles,
        published = publisher.published,
        skipped = publisher.skipped,
        overruns = stats.overruns,
        x = load_f64(&position),
        "done"
    );
    if let Some(last) = &publisher.last {
        println!("{}", serde_json::to_string_pretty(last)?);
    }
    Ok(())
}
