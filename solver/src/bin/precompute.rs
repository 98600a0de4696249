use std::time::Instant;

use serde::Serialize;
use yahtzee::constants::*;
use yahtzee::types::YahtzeeContext;

#[derive(Serialize)]
struct TableReport<'a> {
    outcomes: usize,
    keep_multisets: usize,
    transition_nnz: usize,
    build_ms: f64,
    category_ev: Vec<CategoryEntry<'a>>,
}

#[derive(Serialize)]
struct CategoryEntry<'a> {
    category: &'a str,
    ev: f64,
}

fn parse_args() -> bool {
    let args: Vec<String> = std::env::args().collect();
    let mut json = false;
    for arg in &args[1..] {
        match arg.as_str() {
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Usage: yahtzee-precompute [--json]");
                println!();
                println!("Options:");
                println!("  --json  Print the table summary as JSON");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }
    json
}

fn main() {
    env_logger::init();
    let json = parse_args();

    let t0 = Instant::now();
    let ctx = match YahtzeeContext::build() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to build lookup tables: {}", e);
            std::process::exit(1);
        }
    };
    let build_ms = t0.elapsed().as_secs_f64() * 1000.0;

    let report = TableReport {
        outcomes: ctx.num_outcomes,
        keep_multisets: ctx.keep_table.keep_freq.len(),
        transition_nnz: ctx.keep_table.vals.len(),
        build_ms,
        category_ev: CATEGORY_NAMES
            .iter()
            .zip(ctx.category_ev.iter())
            .map(|(&category, &ev)| CategoryEntry { category, ev })
            .collect(),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Yahtzee lookup tables");
    println!("  {:<24} {:>8}", "Outcomes", report.outcomes);
    println!("  {:<24} {:>8}", "Keep multisets", report.keep_multisets);
    println!("  {:<24} {:>8}", "Transition entries", report.transition_nnz);
    println!("  {:<24} {:>8.3} ms", "Build time", report.build_ms);
    println!();
    println!("  {:<24} {:>8}", "Category", "EV");
    println!("  {}", "-".repeat(33));
    for entry in &report.category_ev {
        println!("  {:<24} {:>8.3}", entry.category, entry.ev);
    }
    let total: f64 = ctx.category_ev.iter().sum();
    println!("  {}", "-".repeat(33));
    println!("  {:<24} {:>8.3}", "Sum", total);
}
