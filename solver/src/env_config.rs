//! Shared environment configuration for the Yahtzee binaries.
//!
//! Consolidates `RAYON_NUM_THREADS`, `YAHTZEE_GAMES`, `YAHTZEE_SEED` and the
//! adjustment-model overrides read by [`crate::adjustment::AdjustmentConfig::from_env`].

use std::str::FromStr;

use log::{info, warn};

/// Default number of games for `yahtzee-simulate`.
pub const DEFAULT_GAMES: usize = 1000;
/// Default base seed for `yahtzee-simulate`.
pub const DEFAULT_SEED: u64 = 42;

/// Parse environment variable `name` as `T`. Unset yields `None`; an
/// unparsable value is logged and ignored.
pub fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8).
pub fn rayon_threads() -> usize {
    env_parse("RAYON_NUM_THREADS")
        .or_else(|| env_parse("OMP_NUM_THREADS"))
        .unwrap_or(8)
}

/// Build the rayon global pool from [`rayon_threads`], tolerating an
/// already-initialized pool. Returns thread count.
pub fn init_rayon_threads_lenient() -> usize {
    let num_threads = rayon_threads();
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        warn!("Rayon global pool already initialized");
    }
    info!("Rayon threads: {}", num_threads);
    num_threads
}

/// Read `YAHTZEE_GAMES` (default [`DEFAULT_GAMES`]).
pub fn default_games() -> usize {
    env_parse("YAHTZEE_GAMES").unwrap_or(DEFAULT_GAMES)
}

/// Read `YAHTZEE_SEED` (default [`DEFAULT_SEED`]).
pub fn default_seed() -> u64 {
    env_parse("YAHTZEE_SEED").unwrap_or(DEFAULT_SEED)
}
