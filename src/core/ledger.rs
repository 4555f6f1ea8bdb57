use crate::core::agent::AgentId;
use crate::core::island::Island;
use crate::core::membership::MembershipTracker;
use crate::core::settlement::Settlement;
use serde::{Deserialize, Serialize};

/// Per-island balances and received-payment counts of every agent.
///
/// A positive balance means the agent has received more than it paid
/// on that island; a negative balance means it paid more. Every payment
/// debits the payer and credits the payee by the same amount, so the
/// balances of each island always sum to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// balance[island][agent]
    balances: Vec<Vec<i64>>,
    /// payments_received[island][agent]
    payments_received: Vec<Vec<u64>>,
}

impl Ledger {
    pub fn new(agent_count: u32, island_count: u32) -> Self {
        let agents = agent_count as usize;
        let islands = island_count as usize;
        Self {
            balances: vec![vec![0; agents]; islands],
            payments_received: vec![vec![0; agents]; islands],
        }
    }

    /// Transfer `amount` from payer to payee on an island.
    ///
    /// The caller guarantees `payer != payee`. A zero amount is a valid
    /// payment: balances stay put but the payee's count still moves.
    ///
    /// # Panics
    ///
    /// Panics if `amount` exceeds `i64::MAX` or a balance would leave the
    /// `i64` range. A validated configuration bounds the payment limit so
    /// neither can happen during a run.
    pub fn apply_payment(&mut self, island: Island, payer: AgentId, payee: AgentId, amount: u64) {
        debug_assert_ne!(payer, payee, "self-payment reached the ledger");
        let amount = match i64::try_from(amount) {
            Ok(amount) => amount,
            Err(_) => panic!("payment amount {} exceeds the balance range", amount),
        };
        let balances = &mut self.balances[island.slot()];
        let (payer_balance, payee_balance) = match (
            balances[payer.index()].checked_sub(amount),
            balances[payee.index()].checked_add(amount),
        ) {
            (Some(debited), Some(credited)) => (debited, credited),
            _ => panic!(
                "payment of {} from {} to {} on {} overflows a balance",
                amount, payer, payee, island
            ),
        };
        balances[payer.index()] = payer_balance;
        balances[payee.index()] = payee_balance;
        self.payments_received[island.slot()][payee.index()] += 1;
    }

    /// Apply a recorded settlement.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        self.apply_payment(
            settlement.island,
            settlement.payer,
            settlement.payee,
            settlement.amount,
        );
    }

    pub fn balance(&self, island: Island, agent: AgentId) -> i64 {
        self.balances[island.slot()][agent.index()]
    }

    pub fn payments_received(&self, island: Island, agent: AgentId) -> u64 {
        self.payments_received[island.slot()][agent.index()]
    }

    /// Total number of payments settled on an island.
    pub fn total_payments(&self, island: Island) -> u64 {
        self.payments_received[island.slot()].iter().sum()
    }

    /// Sum of all balances on an island. Always zero.
    pub fn island_sum(&self, island: Island) -> i64 {
        self.balances[island.slot()].iter().sum()
    }

    /// Verify that every island balances to zero.
    pub fn is_balanced(&self) -> bool {
        self.balances
            .iter()
            .all(|island| island.iter().sum::<i64>() == 0)
    }

    /// Balances of the current members of an island, sorted ascending.
    ///
    /// This is a rank-ordered view for distribution charts, not an
    /// agent-indexed one.
    pub fn snapshot(&self, island: Island, membership: &MembershipTracker) -> Vec<i64> {
        let balances = &self.balances[island.slot()];
        let mut snapshot: Vec<i64> = membership
            .members_of(island)
            .into_iter()
            .map(|agent| balances[agent.index()])
            .collect();
        snapshot.sort_unstable();
        snapshot
    }

    pub fn island_count(&self) -> usize {
        self.balances.len()
    }
}
