use crate::config::PaymentMode;
use crate::core::agent::AgentId;
use crate::core::island::{Island, IslandClassifier};
use crate::core::ledger::Ledger;
use crate::core::membership::MembershipTracker;
use crate::core::settlement::Settlement;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mutable state of one run: classification, membership and ledger.
///
/// Created once when a run starts and dropped when it ends. The engine
/// borrows it for each pass; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    classifier: IslandClassifier,
    membership: MembershipTracker,
    ledger: Ledger,
}

impl SimulationContext {
    pub fn new(agent_count: u32, island_count: u32) -> Self {
        Self {
            classifier: IslandClassifier::new(agent_count, island_count),
            membership: MembershipTracker::new(agent_count, island_count),
            ledger: Ledger::new(agent_count, island_count),
        }
    }

    pub fn classifier(&self) -> &IslandClassifier {
        &self.classifier
    }

    pub fn membership(&self) -> &MembershipTracker {
        &self.membership
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Settle a payment between two distinct agents.
    ///
    /// Picks the settlement island, marks both agents as members of it,
    /// applies the payment to the ledger and returns the settlement edge.
    pub fn settle(&mut self, payer: AgentId, payee: AgentId, amount: u64) -> Settlement {
        let island = settlement_island(&self.classifier, payer, payee);
        self.membership.mark(island, payer);
        self.membership.mark(island, payee);
        self.ledger.apply_payment(island, payer, payee, amount);
        Settlement::new(island, payer, payee, amount)
    }
}

/// The island a pair of agents settles on.
///
/// Two agents sharing a local island use it. Every other pair, including
/// two agents who both only hold legal tender, falls back to legal tender.
pub fn settlement_island(classifier: &IslandClassifier, payer: AgentId, payee: AgentId) -> Island {
    match (classifier.classify(payer), classifier.classify(payee)) {
        (Island::Local(a), Island::Local(b)) if a == b => Island::Local(a),
        _ => Island::Universal,
    }
}

/// What a single pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// A payment was settled.
    Settled(Settlement),
    /// Payer and payee were the same agent; nothing happened.
    SelfPayment,
}

impl PassOutcome {
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            PassOutcome::Settled(s) => Some(s),
            PassOutcome::SelfPayment => None,
        }
    }
}

/// Draws agent pairs and payment amounts and settles them.
///
/// Generic over the random source so tests can drive it with a
/// scripted or fixed-seed generator.
#[derive(Debug, Clone)]
pub struct PaymentSettlementEngine<R = StdRng> {
    rng: R,
    agent_count: u32,
    payment_mode: PaymentMode,
}

impl PaymentSettlementEngine<StdRng> {
    /// Engine driven by a `StdRng` seeded with `seed`.
    pub fn seeded(agent_count: u32, payment_mode: PaymentMode, seed: u64) -> Self {
        Self::with_rng(agent_count, payment_mode, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PaymentSettlementEngine<R> {
    pub fn with_rng(agent_count: u32, payment_mode: PaymentMode, rng: R) -> Self {
        Self {
            rng,
            agent_count,
            payment_mode,
        }
    }

    /// Run one pass against the context.
    ///
    /// Draws payer then payee uniformly from the population. A
    /// self-payment abandons the pass with no side effects.
    pub fn run_pass(&mut self, ctx: &mut SimulationContext) -> PassOutcome {
        let payer = AgentId::new(self.rng.gen_range(0..self.agent_count));
        let payee = AgentId::new(self.rng.gen_range(0..self.agent_count));
        if payer == payee {
            return PassOutcome::SelfPayment;
        }

        let amount = self.draw_amount();
        let settlement = ctx.settle(payer, payee, amount);
        trace!("settled {}", settlement);
        PassOutcome::Settled(settlement)
    }

    fn draw_amount(&mut self) -> u64 {
        match self.payment_mode {
            PaymentMode::Fixed => 1,
            PaymentMode::Uniform { limit } => self.rng.gen_range(0..=limit),
        }
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }
}
