//! island-currencies CLI
//!
//! Run an island-currency simulation from the command line.
//!
//! # Usage
//!
//! ```bash
//! # 100 agents on 4 islands, 10_000 passes in 10 steps
//! island-currencies run --agents 100 --islands 4 --passes 10000 --steps 10
//!
//! # Random payments in [0, 5], graph and JSON output into ./out
//! island-currencies run --random-payments 5 --output out
//!
//! # Parameters from a JSON file, summary as JSON
//! island-currencies run --config run.json --format json
//! ```

use island_currencies::config::{PaymentMode, SimulationConfig};
use island_currencies::simulation::controller::{RunSummary, StepController};
use island_currencies::simulation::snapshot::LedgerSnapshot;
use island_currencies::sink::{DotSink, JsonSink, SinkSet};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"island-currencies — local island currencies beside a universal legal tender

USAGE:
    island-currencies <COMMAND> [OPTIONS]

COMMANDS:
    run         Run a simulation
    help        Show this message

OPTIONS (run):
    --agents <N>             Number of agents (default: 100)
    --islands <N>            Number of islands, legal tender included (default: 2)
    --passes <N>             Number of passes (default: 10000)
    --steps <N>              Number of snapshot steps (default: 1)
    --random-payments <MAX>  Draw payment amounts uniformly from [0, MAX]
    --seed <N>               RNG seed (default: random)
    --config <FILE>          Read parameters from a JSON file; flags override it
    --output <DIR>           Write step_NNN.dot, snapshot_NNN.json and events.jsonl
    --format <FORMAT>        Output format: text (default) or json

EXAMPLES:
    island-currencies run --agents 100 --islands 4 --passes 10000 --steps 10
    island-currencies run --random-payments 5 --seed 7 --output out
    island-currencies run --config run.json --format json"#
    );
}

#[derive(serde::Serialize)]
struct RunOutput<'a> {
    config: &'a SimulationConfig,
    summary: &'a RunSummary,
    snapshot: &'a LedgerSnapshot,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("{} requires a number", flag);
            process::exit(1);
        })
}

fn load_config(path: &str) -> SimulationConfig {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });
    SimulationConfig::from_json_str(&content).unwrap_or_else(|e| {
        eprintln!("Error in '{}': {}", path, e);
        process::exit(1);
    })
}

fn cmd_run(args: &[String]) {
    // The config file is read first so that flags override it.
    let mut config = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args.get(i + 1).unwrap_or_else(|| {
                eprintln!("--config requires a file path");
                process::exit(1);
            });
            load_config(path)
        }
        None => SimulationConfig::default(),
    };

    let mut output_dir: Option<String> = None;
    let mut json_output = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--agents" => {
                i += 1;
                config.agent_count = parse_value(args, i, "--agents");
            }
            "--islands" => {
                i += 1;
                config.island_count = parse_value(args, i, "--islands");
            }
            "--passes" => {
                i += 1;
                config.pass_count = parse_value(args, i, "--passes");
            }
            "--steps" => {
                i += 1;
                config.step_count = parse_value(args, i, "--steps");
            }
            "--random-payments" => {
                i += 1;
                config.payment_mode = PaymentMode::Uniform {
                    limit: parse_value(args, i, "--random-payments"),
                };
            }
            "--seed" => {
                i += 1;
                config.seed = Some(parse_value(args, i, "--seed"));
            }
            "--config" => {
                i += 1;
            }
            "--output" => {
                i += 1;
                output_dir = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a directory path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                json_output = match args.get(i).map(String::as_str) {
                    Some("json") => true,
                    Some("text") => false,
                    other => {
                        eprintln!("Unknown format: {}", other.unwrap_or("<missing>"));
                        process::exit(1);
                    }
                };
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut controller = StepController::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    });

    let mut sinks = SinkSet::new();
    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir).unwrap_or_else(|e| {
            eprintln!("Error creating '{}': {}", dir, e);
            process::exit(1);
        });
        sinks.add(Box::new(DotSink::new(dir)));
        sinks.add(Box::new(JsonSink::create(dir).unwrap_or_else(|e| {
            eprintln!("Error preparing '{}': {}", dir, e);
            process::exit(1);
        })));
    }

    let summary = controller.run(&mut sinks).unwrap_or_else(|e| {
        eprintln!("Simulation failed: {}", e);
        process::exit(1);
    });
    let snapshot = controller.snapshot();

    if json_output {
        let output = RunOutput {
            config: &config,
            summary: &summary,
            snapshot: &snapshot,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("=== Island Currency Simulation ===");
        println!("Run:            {}", summary.run_id);
        println!("Seed:           {}", summary.seed);
        println!("Passes:         {}", summary.passes_consumed);
        println!("Settlements:    {}", summary.settlements);
        println!("Self-payments:  {}", summary.self_payments);
        println!();
        print!("{}", snapshot);
        if let Some(dir) = output_dir {
            println!("\nOutput written to {}", dir);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "run" => cmd_run(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
