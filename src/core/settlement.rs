use crate::core::agent::AgentId;
use crate::core::island::Island;
use crate::core::ledger::Ledger;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One settled payment: `payer` paid `payee` an `amount` on `island`.
///
/// This is both the network edge handed to graph sinks and the raw
/// event of the run's event log. The payer never equals the payee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settlement {
    pub island: Island,
    pub payer: AgentId,
    pub payee: AgentId,
    pub amount: u64,
}

impl Settlement {
    pub fn new(island: Island, payer: AgentId, payee: AgentId, amount: u64) -> Self {
        Self {
            island,
            payer,
            payee,
            amount,
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} {}",
            self.payer, self.payee, self.amount, self.island
        )
    }
}

/// Chronological log of every settlement in a run.
///
/// Replaying the log from zero reproduces the run's ledger exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLog {
    settlements: Vec<Settlement>,
}

impl SettlementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, settlement: Settlement) {
        self.settlements.push(settlement);
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Settlements recorded at or after position `from`.
    pub fn since(&self, from: usize) -> &[Settlement] {
        &self.settlements[from.min(self.settlements.len())..]
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    /// Rebuild a ledger by applying every settlement in order to a fresh one.
    pub fn replay(&self, agent_count: u32, island_count: u32) -> Ledger {
        let mut ledger = Ledger::new(agent_count, island_count);
        for settlement in &self.settlements {
            ledger.apply_settlement(settlement);
        }
        ledger
    }
}

impl FromIterator<Settlement> for SettlementLog {
    fn from_iter<T: IntoIterator<Item = Settlement>>(iter: T) -> Self {
        Self {
            settlements: iter.into_iter().collect(),
        }
    }
}

/// Per-island edge buffers, accumulated since the start of a run.
///
/// Each island keeps a flush cursor so sinks can tell the edges added
/// since the previous step boundary from those already handed out.
#[derive(Debug, Clone, Default)]
pub struct IslandEdges {
    edges: Vec<Vec<Settlement>>,
    flushed: Vec<usize>,
}

impl IslandEdges {
    pub fn new(island_count: u32) -> Self {
        Self {
            edges: vec![Vec::new(); island_count as usize],
            flushed: vec![0; island_count as usize],
        }
    }

    pub fn record(&mut self, settlement: Settlement) {
        self.edges[settlement.island.slot()].push(settlement);
    }

    /// All edges of an island since run start, in settlement order.
    pub fn all(&self, island: Island) -> &[Settlement] {
        &self.edges[island.slot()]
    }

    /// Edges of an island added since the last [`IslandEdges::mark_flushed`].
    pub fn pending(&self, island: Island) -> &[Settlement] {
        let slot = island.slot();
        &self.edges[slot][self.flushed[slot]..]
    }

    /// Move every island's cursor to the end of its buffer.
    pub fn mark_flushed(&mut self) {
        for (cursor, edges) in self.flushed.iter_mut().zip(&self.edges) {
            *cursor = edges.len();
        }
    }

    pub fn islands(&self) -> impl Iterator<Item = Island> {
        (0..self.edges.len() as u32).map(Island::from_index)
    }

    pub fn edge_count(&self, island: Island) -> usize {
        self.edges[island.slot()].len()
    }

    pub fn total_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Every edge across all islands, grouped island by island.
    pub fn iter(&self) -> impl Iterator<Item = &Settlement> {
        self.edges.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement(island: u32, payer: u32, payee: u32, amount: u64) -> Settlement {
        Settlement::new(
            Island::from_index(island),
            AgentId::new(payer),
            AgentId::new(payee),
            amount,
        )
    }

    #[test]
    fn test_replay_reproduces_ledger() {
        let log: SettlementLog = vec![
            settlement(0, 1, 2, 3),
            settlement(1, 5, 4, 2),
            settlement(0, 2, 0, 1),
        ]
        .into_iter()
        .collect();

        let mut direct = Ledger::new(6, 2);
        for s in log.settlements() {
            direct.apply_payment(s.island, s.payer, s.payee, s.amount);
        }

        assert_eq!(log.replay(6, 2), direct);
    }

    #[test]
    fn test_log_since() {
        let mut log = SettlementLog::new();
        log.push(settlement(0, 1, 2, 1));
        log.push(settlement(0, 2, 3, 1));
        assert_eq!(log.since(1), &[settlement(0, 2, 3, 1)]);
        assert!(log.since(5).is_empty());
    }

    #[test]
    fn test_island_edges_pending_and_flush() {
        let mut edges = IslandEdges::new(2);
        edges.record(settlement(0, 1, 2, 1));
        edges.record(settlement(1, 6, 7, 1));
        assert_eq!(edges.pending(Island::Universal).len(), 1);

        edges.mark_flushed();
        assert!(edges.pending(Island::Universal).is_empty());
        assert!(edges.pending(Island::Local(1)).is_empty());

        edges.record(settlement(1, 7, 6, 1));
        assert_eq!(edges.pending(Island::Local(1)), &[settlement(1, 7, 6, 1)]);
        assert_eq!(edges.all(Island::Local(1)).len(), 2);
        assert_eq!(edges.total_edges(), 3);
    }

    #[test]
    fn test_settlement_serializes_flat() {
        let json = serde_json::to_string(&settlement(1, 3, 4, 2)).unwrap();
        assert_eq!(json, r#"{"island":1,"payer":3,"payee":4,"amount":2}"#);
    }
}
