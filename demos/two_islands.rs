//! Two-island walkthrough.
//!
//! Twenty agents: 0-9 hold only legal tender, 10-19 share local island 1.
//! Runs 1000 passes in 5 steps and prints how the local island fills up.

use island_currencies::prelude::*;

fn main() {
    println!("╔════════════════════════════════════════════╗");
    println!("║  island-currencies: Two Islands Example    ║");
    println!("╚════════════════════════════════════════════╝\n");

    let config = SimulationConfig {
        agent_count: 20,
        island_count: 2,
        pass_count: 1000,
        step_count: 5,
        payment_mode: PaymentMode::Uniform { limit: 3 },
        seed: Some(2024),
    };

    let mut controller = match StepController::new(config) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };
    let mut sink = MemorySink::new();
    let summary = match controller.run(&mut sink) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            return;
        }
    };

    println!("━━━ Membership growth ━━━\n");
    for snapshot in sink.snapshots() {
        let local = snapshot.island(Island::Local(1));
        let lt = snapshot.island(Island::Universal);
        println!(
            "  step {}: LT members {:>2}, L1 members {:>2}",
            snapshot.step,
            lt.map_or(0, IslandSnapshot::member_count),
            local.map_or(0, IslandSnapshot::member_count),
        );
    }

    println!("\n━━━ Final state ━━━\n");
    if let Some(last) = sink.last_snapshot() {
        print!("{}", last);
    }
    println!(
        "\n  {} settlements, {} self-payments, ledger balanced: {}",
        summary.settlements,
        summary.self_payments,
        controller.context().ledger().is_balanced()
    );

    let replayed = sink.events().replay(20, 2);
    println!(
        "  replayed event log matches ledger: {}",
        &replayed == controller.context().ledger()
    );
}
