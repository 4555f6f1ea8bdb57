use crate::core::agent::AgentId;
use crate::core::island::Island;
use crate::core::settlement::IslandEdges;
use crate::simulation::engine::SimulationContext;
use serde::{Deserialize, Serialize};

/// State of one island at a step boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandSnapshot {
    pub island: Island,
    /// Agents that have settled on this island, ascending.
    pub members: Vec<AgentId>,
    /// Member balances, sorted ascending.
    pub balances: Vec<i64>,
    /// Payments settled on this island since run start.
    pub payments_received: u64,
    /// Edges recorded on this island since run start.
    pub edge_count: usize,
}

impl IslandSnapshot {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn min_balance(&self) -> Option<i64> {
        self.balances.first().copied()
    }

    pub fn max_balance(&self) -> Option<i64> {
        self.balances.last().copied()
    }
}

/// Cumulative ledger and membership state at a step boundary.
///
/// Snapshots are never reset between steps: each one extends the
/// previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// 1-based step number.
    pub step: u32,
    pub passes_consumed: u64,
    pub islands: Vec<IslandSnapshot>,
}

impl LedgerSnapshot {
    pub fn capture(
        step: u32,
        passes_consumed: u64,
        ctx: &SimulationContext,
        edges: &IslandEdges,
    ) -> Self {
        let islands = ctx
            .classifier()
            .islands()
            .map(|island| IslandSnapshot {
                island,
                members: ctx.membership().members_of(island),
                balances: ctx.ledger().snapshot(island, ctx.membership()),
                payments_received: ctx.ledger().total_payments(island),
                edge_count: edges.edge_count(island),
            })
            .collect();
        Self {
            step,
            passes_consumed,
            islands,
        }
    }

    pub fn island(&self, island: Island) -> Option<&IslandSnapshot> {
        self.islands.iter().find(|s| s.island == island)
    }
}

impl std::fmt::Display for LedgerSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Step {} ({} passes) ===", self.step, self.passes_consumed)?;
        writeln!(
            f,
            "{:<8} {:>8} {:>10} {:>8} {:>8}",
            "Island", "Members", "Payments", "Min", "Max"
        )?;
        for island in &self.islands {
            let fmt_balance =
                |b: Option<i64>| b.map_or_else(|| "-".to_string(), |v| v.to_string());
            writeln!(
                f,
                "{:<8} {:>8} {:>10} {:>8} {:>8}",
                island.island.to_string(),
                island.member_count(),
                island.payments_received,
                fmt_balance(island.min_balance()),
                fmt_balance(island.max_balance()),
            )?;
        }
        Ok(())
    }
}
