//! Foundational types: agents, islands, membership, ledger and settlements.

pub mod agent;
pub mod island;
pub mod ledger;
pub mod membership;
pub mod settlement;
