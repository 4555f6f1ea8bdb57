use island_currencies::config::{PaymentMode, SimulationConfig};
use island_currencies::core::agent::AgentId;
use island_currencies::core::island::{Island, IslandClassifier};
use island_currencies::simulation::controller::StepController;
use island_currencies::simulation::engine::{PassOutcome, PaymentSettlementEngine, SimulationContext};
use island_currencies::sink::MemorySink;
use proptest::prelude::*;

/// (agent_count, island_count) with islands dividing agents evenly.
fn arb_population() -> impl Strategy<Value = (u32, u32)> {
    (1u32..6, 1u32..12).prop_map(|(islands, block)| (islands * block, islands))
}

fn arb_payment_mode() -> impl Strategy<Value = PaymentMode> {
    prop_oneof![
        Just(PaymentMode::Fixed),
        (0u64..20).prop_map(|limit| PaymentMode::Uniform { limit }),
    ]
}

/// A valid configuration: steps always divide passes.
fn arb_config() -> impl Strategy<Value = SimulationConfig> {
    (
        arb_population(),
        1u32..8,
        1u64..40,
        arb_payment_mode(),
        any::<u64>(),
    )
        .prop_map(|((agents, islands), steps, per_step, mode, seed)| SimulationConfig {
            agent_count: agents,
            island_count: islands,
            pass_count: u64::from(steps) * per_step,
            step_count: steps,
            payment_mode: mode,
            seed: Some(seed),
        })
}

fn all_islands(ctx: &SimulationContext) -> Vec<Island> {
    ctx.classifier().islands().collect()
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Every island's balances sum to zero after every pass.
    // ===================================================================
    #[test]
    fn zero_sum_after_every_pass(
        (agents, islands) in arb_population(),
        mode in arb_payment_mode(),
        seed in any::<u64>(),
    ) {
        let mut engine = PaymentSettlementEngine::seeded(agents, mode, seed);
        let mut ctx = SimulationContext::new(agents, islands);
        for _ in 0..200 {
            engine.run_pass(&mut ctx);
            for island in all_islands(&ctx) {
                prop_assert_eq!(ctx.ledger().island_sum(island), 0);
            }
        }
    }

    // ===================================================================
    // INVARIANT 2: Membership never reverts.
    // ===================================================================
    #[test]
    fn membership_is_monotonic(
        (agents, islands) in arb_population(),
        seed in any::<u64>(),
    ) {
        let mut engine = PaymentSettlementEngine::seeded(agents, PaymentMode::Fixed, seed);
        let mut ctx = SimulationContext::new(agents, islands);
        let mut previous = ctx.membership().clone();
        for _ in 0..150 {
            engine.run_pass(&mut ctx);
            for island in all_islands(&ctx) {
                for agent in previous.members_of(island) {
                    prop_assert!(ctx.membership().is_member(island, agent));
                }
            }
            previous = ctx.membership().clone();
        }
    }

    // ===================================================================
    // INVARIANT 3: No self-settlement, and the settlement island follows
    // the shared-local-island-first rule.
    // ===================================================================
    #[test]
    fn settlement_rule_holds(
        (agents, islands) in arb_population(),
        mode in arb_payment_mode(),
        seed in any::<u64>(),
    ) {
        let mut engine = PaymentSettlementEngine::seeded(agents, mode, seed);
        let mut ctx = SimulationContext::new(agents, islands);
        for _ in 0..200 {
            if let PassOutcome::Settled(s) = engine.run_pass(&mut ctx) {
                prop_assert_ne!(s.payer, s.payee);
                let payer_island = ctx.classifier().classify(s.payer);
                let payee_island = ctx.classifier().classify(s.payee);
                if payer_island == payee_island && !payer_island.is_universal() {
                    prop_assert_eq!(s.island, payer_island);
                } else {
                    prop_assert_eq!(s.island, Island::Universal);
                }
                prop_assert!(ctx.membership().is_member(s.island, s.payer));
                prop_assert!(ctx.membership().is_member(s.island, s.payee));
            }
        }
    }

    // ===================================================================
    // INVARIANT 4: Exactly pass_count passes are consumed, self-payments
    // included, and every step boundary is emitted.
    // ===================================================================
    #[test]
    fn pass_count_conserved(config in arb_config()) {
        let pass_count = config.pass_count;
        let step_count = config.step_count;
        let mut controller = StepController::new(config).unwrap();
        let mut sink = MemorySink::new();
        let summary = controller.run(&mut sink).unwrap();

        prop_assert_eq!(summary.passes_consumed, pass_count);
        prop_assert_eq!(summary.settlements + summary.self_payments, pass_count);
        prop_assert_eq!(sink.snapshots().len(), step_count as usize);
    }

    // ===================================================================
    // INVARIANT 5: Replaying the event log from zero reproduces the
    // final balances and payment counts exactly.
    // ===================================================================
    #[test]
    fn event_log_replay_reproduces_ledger(config in arb_config()) {
        let (agents, islands) = (config.agent_count, config.island_count);
        let mut controller = StepController::new(config).unwrap();
        let mut sink = MemorySink::new();
        controller.run(&mut sink).unwrap();

        let replayed = sink.events().replay(agents, islands);
        prop_assert_eq!(&replayed, controller.context().ledger());
    }

    // ===================================================================
    // INVARIANT 6: Classification depends only on the agent.
    // ===================================================================
    #[test]
    fn classification_is_deterministic(
        (agents, islands) in arb_population(),
        order in prop::collection::vec(any::<prop::sample::Index>(), 1..50),
    ) {
        let classifier = IslandClassifier::new(agents, islands);
        let expected: Vec<Island> = (0..agents)
            .map(|a| classifier.classify(AgentId::new(a)))
            .collect();
        for idx in order {
            let a = idx.index(agents as usize);
            prop_assert_eq!(classifier.classify(AgentId::new(a as u32)), expected[a]);
        }
    }

    // ===================================================================
    // INVARIANT 7: Snapshots list member balances only, ascending.
    // ===================================================================
    #[test]
    fn snapshot_is_sorted_member_view(config in arb_config()) {
        let mut controller = StepController::new(config).unwrap();
        let mut sink = MemorySink::new();
        controller.run(&mut sink).unwrap();

        for snapshot in sink.snapshots() {
            for island in &snapshot.islands {
                prop_assert_eq!(island.balances.len(), island.members.len());
                prop_assert!(island.balances.windows(2).all(|w| w[0] <= w[1]));
                prop_assert_eq!(island.balances.iter().sum::<i64>(), 0);
            }
        }
    }
}
