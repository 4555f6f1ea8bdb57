use crate::config::{ConfigError, SimulationConfig};
use crate::core::settlement::{IslandEdges, SettlementLog};
use crate::simulation::engine::{PassOutcome, PaymentSettlementEngine, SimulationContext};
use crate::simulation::snapshot::LedgerSnapshot;
use crate::sink::{SinkError, StepSink};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use uuid::Uuid;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("sink failed: {0}")]
    Sink(#[from] SinkError),
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Seed the run's RNG was built from; rerun with it to reproduce.
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub steps_completed: u32,
    pub passes_consumed: u64,
    pub settlements: u64,
    pub self_payments: u64,
    /// True if the run was stopped before its last step.
    pub aborted: bool,
}

/// Splits a run into equal steps and drives the engine pass by pass.
///
/// After each step the cumulative ledger snapshot, the island edges and
/// the step's raw events are handed to a [`StepSink`]. State carries
/// over from step to step; nothing is reset until the controller is
/// dropped.
///
/// # Examples
///
/// ```
/// use island_currencies::prelude::*;
///
/// let config = SimulationConfig {
///     agent_count: 20,
///     island_count: 2,
///     pass_count: 100,
///     step_count: 10,
///     seed: Some(1),
///     ..Default::default()
/// };
/// let mut controller = StepController::new(config).unwrap();
/// let mut sink = MemorySink::new();
/// let summary = controller.run(&mut sink).unwrap();
///
/// assert_eq!(summary.passes_consumed, 100);
/// assert_eq!(sink.snapshots().len(), 10);
/// assert!(controller.context().ledger().is_balanced());
/// ```
#[derive(Debug)]
pub struct StepController {
    config: SimulationConfig,
    seed: u64,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    ctx: SimulationContext,
    engine: PaymentSettlementEngine,
    edges: IslandEdges,
    log: SettlementLog,
    /// Position in `log` of the first event not yet handed to sinks.
    flushed_events: usize,
    passes_consumed: u64,
    steps_completed: u32,
    self_payments: u64,
    /// Set by an abort or a failed boundary. A halted run issues no more passes.
    halted: bool,
}

impl StepController {
    /// Validate the configuration and set up a fresh run.
    ///
    /// No simulation state is created when validation fails.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let run_id = Uuid::new_v4();
        info!(
            "run {}: {} agents, {} islands (divisor {}), {} passes in {} steps, seed {}",
            run_id,
            config.agent_count,
            config.island_count,
            config.island_divisor(),
            config.pass_count,
            config.step_count,
            seed
        );

        Ok(Self {
            ctx: SimulationContext::new(config.agent_count, config.island_count),
            engine: PaymentSettlementEngine::seeded(config.agent_count, config.payment_mode, seed),
            edges: IslandEdges::new(config.island_count),
            log: SettlementLog::new(),
            flushed_events: 0,
            passes_consumed: 0,
            steps_completed: 0,
            self_payments: 0,
            halted: false,
            started_at: Utc::now(),
            run_id,
            seed,
            config,
        })
    }

    /// Run every remaining step.
    pub fn run(&mut self, sink: &mut dyn StepSink) -> Result<RunSummary, SimulationError> {
        self.run_while(sink, |_| true)
    }

    /// Run every remaining step, checking `abort` before each pass.
    ///
    /// On abort no further passes are issued, no boundary is emitted for
    /// the interrupted step and the run is halted for good. Everything
    /// applied so far stays valid.
    pub fn run_until(
        &mut self,
        sink: &mut dyn StepSink,
        abort: &AtomicBool,
    ) -> Result<RunSummary, SimulationError> {
        self.run_while(sink, |_| !abort.load(Ordering::Relaxed))
    }

    /// Run a single step. Returns `false` if the run was already finished
    /// or halted.
    pub fn run_step(&mut self, sink: &mut dyn StepSink) -> Result<bool, SimulationError> {
        if self.is_finished() {
            return Ok(false);
        }
        self.advance_step(sink, &mut |_| true)
    }

    /// Drive the run while `proceed(passes_consumed)` holds before each pass.
    fn run_while(
        &mut self,
        sink: &mut dyn StepSink,
        mut proceed: impl FnMut(u64) -> bool,
    ) -> Result<RunSummary, SimulationError> {
        while !self.is_finished() {
            if !self.advance_step(sink, &mut proceed)? {
                warn!(
                    "run {} aborted after {} of {} passes",
                    self.run_id, self.passes_consumed, self.config.pass_count
                );
                break;
            }
        }

        let summary = self.summary(self.halted);
        info!(
            "run {} finished: {} steps, {} settlements, {} self-payments",
            summary.run_id, summary.steps_completed, summary.settlements, summary.self_payments
        );
        Ok(summary)
    }

    /// Run one step's passes and emit its boundary.
    /// Returns `false` if the step was interrupted, which halts the run.
    fn advance_step(
        &mut self,
        sink: &mut dyn StepSink,
        proceed: &mut impl FnMut(u64) -> bool,
    ) -> Result<bool, SimulationError> {
        for _ in 0..self.config.passes_per_step() {
            if !proceed(self.passes_consumed) {
                self.halted = true;
                return Ok(false);
            }
            self.passes_consumed += 1;
            match self.engine.run_pass(&mut self.ctx) {
                PassOutcome::Settled(settlement) => {
                    self.edges.record(settlement);
                    self.log.push(settlement);
                }
                PassOutcome::SelfPayment => self.self_payments += 1,
            }
        }

        let step = self.steps_completed + 1;
        if let Err(e) = self.emit_boundary(sink, step) {
            // The step's passes are spent; rerunning it would overshoot pass_count.
            self.halted = true;
            return Err(e.into());
        }
        self.steps_completed = step;
        Ok(true)
    }

    fn emit_boundary(&mut self, sink: &mut dyn StepSink, step: u32) -> Result<(), SinkError> {
        let snapshot = LedgerSnapshot::capture(step, self.passes_consumed, &self.ctx, &self.edges);
        let events = self.log.since(self.flushed_events);
        info!(
            "step {}/{}: {} passes, {} new settlements",
            step,
            self.config.step_count,
            self.passes_consumed,
            events.len()
        );

        sink.on_snapshot(&snapshot)?;
        sink.on_edges(step, &self.edges)?;
        sink.on_events(step, events)?;
        debug!("step {} flushed", step);

        self.edges.mark_flushed();
        self.flushed_events = self.log.len();
        Ok(())
    }

    pub fn summary(&self, aborted: bool) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            seed: self.seed,
            started_at: self.started_at,
            finished_at: Utc::now(),
            steps_completed: self.steps_completed,
            passes_consumed: self.passes_consumed,
            settlements: self.log.len() as u64,
            self_payments: self.self_payments,
            aborted,
        }
    }

    /// True once every step has run, or the run was halted.
    pub fn is_finished(&self) -> bool {
        self.halted || self.steps_completed >= self.config.step_count
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Every settlement of the run so far, in chronological order.
    pub fn event_log(&self) -> &SettlementLog {
        &self.log
    }

    pub fn edges(&self) -> &IslandEdges {
        &self.edges
    }

    pub fn passes_consumed(&self) -> u64 {
        self.passes_consumed
    }

    pub fn steps_completed(&self) -> u32 {
        self.steps_completed
    }

    /// Snapshot of the current state, outside of any step boundary.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(self.steps_completed, self.passes_consumed, &self.ctx, &self.edges)
    }
}
