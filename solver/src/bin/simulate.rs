use std::collections::BTreeMap;

use log::info;
use yahtzee::env_config::{default_games, default_seed, init_rayon_threads_lenient};
use yahtzee::simulation::{make_strategy, simulate_batch, SimulationResult, STRATEGY_NAMES};
use yahtzee::types::YahtzeeContext;

struct Args {
    num_games: usize,
    seed: u64,
    strategies: Vec<String>,
    json: bool,
}

fn usage() -> String {
    format!(
        "Usage: yahtzee-simulate [--games N] [--seed S] [--strategies {}] [--json]",
        STRATEGY_NAMES.join(",")
    )
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut num_games = default_games();
    let mut seed = default_seed();
    let mut strategies: Vec<String> = STRATEGY_NAMES.iter().map(|s| s.to_string()).collect();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                if i < args.len() {
                    num_games = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --games value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--strategies" => {
                i += 1;
                if i < args.len() {
                    strategies = args[i].split(',').map(|s| s.trim().to_string()).collect();
                }
            }
            "--json" => {
                json = true;
            }
            "--help" | "-h" => {
                println!("{}", usage());
                println!();
                println!("Options:");
                println!("  --games N          Games per strategy (default: $YAHTZEE_GAMES or 1000)");
                println!("  --seed S           Base RNG seed (default: $YAHTZEE_SEED or 42)");
                println!("  --strategies LIST  Comma-separated strategy names");
                println!("  --json             Print results as JSON");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", usage());
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if num_games == 0 {
        eprintln!("Error: --games must be positive");
        std::process::exit(1);
    }

    Args {
        num_games,
        seed,
        strategies,
        json,
    }
}

fn print_table(results: &[SimulationResult]) {
    println!(
        "{:<12} {:>8} {:>8} {:>6} {:>6} {:>6} {:>7} {:>9}",
        "Strategy", "Mean", "StdDev", "Min", "Max", "Median", "Bonus%", "Time(s)"
    );
    println!("{}", "-".repeat(70));
    for r in results {
        println!(
            "{:<12} {:>8.2} {:>8.2} {:>6} {:>6} {:>6} {:>6.1}% {:>9.3}",
            r.strategy,
            r.mean,
            r.std_dev,
            r.min,
            r.max,
            r.median,
            r.bonus_rate * 100.0,
            r.elapsed_secs
        );
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();
    init_rayon_threads_lenient();

    let ctx = match YahtzeeContext::build() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to build lookup tables: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::with_capacity(args.strategies.len());
    for name in &args.strategies {
        let Some(strategy) = make_strategy(name, &ctx) else {
            eprintln!(
                "Unknown strategy: '{}'. Available: {}",
                name,
                STRATEGY_NAMES.join(", ")
            );
            std::process::exit(1);
        };
        info!("Simulating {} games with '{}' (seed {})", args.num_games, name, args.seed);
        match simulate_batch(strategy.as_ref(), args.num_games, args.seed) {
            Ok(r) => results.push(r),
            Err(e) => {
                eprintln!("Simulation with '{}' failed: {}", name, e);
                std::process::exit(1);
            }
        }
    }

    if args.json {
        let by_name: BTreeMap<&str, &SimulationResult> =
            results.iter().map(|r| (r.strategy.as_str(), r)).collect();
        match serde_json::to_string_pretty(&by_name) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize results: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("Yahtzee Simulation ({} games, seed {})", args.num_games, args.seed);
        print_table(&results);
    }
}
