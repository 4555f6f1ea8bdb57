use crate::core::settlement::{IslandEdges, Settlement, SettlementLog};
use crate::simulation::snapshot::LedgerSnapshot;
use crate::sink::{SinkError, StepSink};

/// Keeps everything it is handed in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    snapshots: Vec<LedgerSnapshot>,
    events: SettlementLog,
    /// Per step: number of edges added on each island during the step.
    new_edges: Vec<Vec<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[LedgerSnapshot] {
        &self.snapshots
    }

    pub fn last_snapshot(&self) -> Option<&LedgerSnapshot> {
        self.snapshots.last()
    }

    /// Every raw event received, in chronological order.
    pub fn events(&self) -> &SettlementLog {
        &self.events
    }

    /// For each flushed step, the edge count added per island.
    pub fn new_edges_per_step(&self) -> &[Vec<usize>] {
        &self.new_edges
    }
}

impl StepSink for MemorySink {
    fn on_snapshot(&mut self, snapshot: &LedgerSnapshot) -> Result<(), SinkError> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn on_edges(&mut self, _step: u32, edges: &IslandEdges) -> Result<(), SinkError> {
        self.new_edges.push(
            edges
                .islands()
                .map(|island| edges.pending(island).len())
                .collect(),
        );
        Ok(())
    }

    fn on_events(&mut self, _step: u32, events: &[Settlement]) -> Result<(), SinkError> {
        for event in events {
            self.events.push(*event);
        }
        Ok(())
    }
}
