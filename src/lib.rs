//! # island-currencies
//!
//! Agent-based simulation of parallel "island" currencies emerging
//! among a population that also shares one universal legal tender.
//!
//! Random agent pairs are drawn pass by pass. A pair that shares a
//! local island settles in that island's currency; every other pair
//! falls back to legal tender (island 0). Balances, payment counts and
//! network edges accumulate per island and are snapshotted at step
//! boundaries.
//!
//! ## Architecture
//!
//! - **core** — Agents, islands, classification, membership, ledger, settlements
//! - **config** — Run configuration and validation
//! - **simulation** — Settlement engine, step controller, snapshots
//! - **graph** — Settlement network graph and DOT rendering
//! - **sink** — Consumers of per-step snapshots, edges and raw events

pub mod config;
pub mod core;
pub mod graph;
pub mod simulation;
pub mod sink;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{ConfigError, PaymentMode, SimulationConfig};
    pub use crate::core::agent::AgentId;
    pub use crate::core::island::{Island, IslandClassifier};
    pub use crate::core::ledger::Ledger;
    pub use crate::core::membership::MembershipTracker;
    pub use crate::core::settlement::{IslandEdges, Settlement, SettlementLog};
    pub use crate::simulation::controller::{RunSummary, SimulationError, StepController};
    pub use crate::simulation::engine::{PassOutcome, PaymentSettlementEngine, SimulationContext};
    pub use crate::simulation::snapshot::{IslandSnapshot, LedgerSnapshot};
    pub use crate::sink::{MemorySink, SinkError, SinkSet, StepSink};
}
