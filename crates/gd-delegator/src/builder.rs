//! Fluent builder for constructing a [`PlanDelegator`].

use gd_core::{Clock, DelegatorConfig, SystemClock};
use gd_planner::{PlannerConnector, PlannerRegistry};

use crate::{DelegatorInputs, DelegatorResult, PlanDelegator};

/// Fluent builder for [`PlanDelegator<C, K>`].
///
/// # Required inputs
///
/// - [`DelegatorConfig`]: naming, cycle rate, minimum duration, timeouts
/// - `C: PlannerConnector`: how planner names reach their backends
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                      |
/// |----------------|------------------------------|
/// | `.clock(k)`    | [`SystemClock`]              |
/// | `.inputs(i)`   | Fresh, empty `DelegatorInputs` |
///
/// # Example
///
/// ```rust,ignore
/// let connector = Arc::new(InProcessConnector::new());
/// let mut delegator = DelegatorBuilder::new(config.delegator.clone(), connector)
///     .clock(ManualClock::new(Timestamp(0)))
///     .build()?;
/// delegator.inputs().update_plan(plan)?;
/// delegator.run_cycle(&mut published);
/// ```
pub struct DelegatorBuilder<C: PlannerConnector, K: Clock = SystemClock> {
    config:    DelegatorConfig,
    connector: C,
    clock:     K,
    inputs:    Option<DelegatorInputs>,
}

impl<C: PlannerConnector> DelegatorBuilder<C, SystemClock> {
    /// Create a builder reading wall-clock time.
    pub fn new(config: DelegatorConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            clock:  SystemClock,
            inputs: None,
        }
    }
}

impl<C: PlannerConnector, K: Clock> DelegatorBuilder<C, K> {
    /// Read time from `clock` instead.
    pub fn clock<K2: Clock>(self, clock: K2) -> DelegatorBuilder<C, K2> {
        DelegatorBuilder {
            config:    self.config,
            connector: self.connector,
            clock,
            inputs:    self.inputs,
        }
    }

    /// Share existing input handles, e.g. ones producers already hold.
    pub fn inputs(mut self, inputs: DelegatorInputs) -> Self {
        self.inputs = Some(inputs);
        self
    }

    /// Validate the configuration and return a ready-to-run delegator.
    pub fn build(self) -> DelegatorResult<PlanDelegator<C, K>> {
        self.config.validate()?;

        let registry = PlannerRegistry::new(
            self.connector,
            self.config.naming.clone(),
            self.config.planner_timeout(),
        );
        Ok(PlanDelegator {
            inputs: self.inputs.unwrap_or_default(),
            registry,
            clock: self.clock,
            config: self.config,
        })
    }
}
