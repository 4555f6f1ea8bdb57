//! Consumers of step-boundary output.
//!
//! At every step boundary the controller hands each sink the cumulative
//! ledger snapshot, the per-island edges since run start, and the raw
//! settlement events recorded since the previous boundary. Sinks own all
//! presentation: charts, graph layouts, files.

pub mod dot;
pub mod json;
pub mod memory;

use crate::core::settlement::{IslandEdges, Settlement};
use crate::simulation::snapshot::LedgerSnapshot;
use thiserror::Error;

pub use dot::DotSink;
pub use json::JsonSink;
pub use memory::MemorySink;

/// Errors raised by sinks while flushing a step.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receiver of step-boundary output. Every hook defaults to a no-op.
pub trait StepSink {
    /// Cumulative ledger and membership state.
    fn on_snapshot(&mut self, _snapshot: &LedgerSnapshot) -> Result<(), SinkError> {
        Ok(())
    }

    /// Edges per island since run start; `IslandEdges::pending` gives
    /// the ones added during this step.
    fn on_edges(&mut self, _step: u32, _edges: &IslandEdges) -> Result<(), SinkError> {
        Ok(())
    }

    /// Raw settlements recorded during this step, in chronological order.
    fn on_events(&mut self, _step: u32, _events: &[Settlement]) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Fans step output out to several sinks, in insertion order.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Box<dyn StepSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sink: Box<dyn StepSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl StepSink for SinkSet {
    fn on_snapshot(&mut self, snapshot: &LedgerSnapshot) -> Result<(), SinkError> {
        for sink in &mut self.sinks {
            sink.on_snapshot(snapshot)?;
        }
        Ok(())
    }

    fn on_edges(&mut self, step: u32, edges: &IslandEdges) -> Result<(), SinkError> {
        for sink in &mut self.sinks {
            sink.on_edges(step, edges)?;
        }
        Ok(())
    }

    fn on_events(&mut self, step: u32, events: &[Settlement]) -> Result<(), SinkError> {
        for sink in &mut self.sinks {
            sink.on_events(step, events)?;
        }
        Ok(())
    }
}
