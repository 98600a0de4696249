//! Game simulation.
//!
//! - [`strategy`]: the [`Strategy`] interface and the built-in strategies
//! - [`engine`]: seeded turn/game loop and parallel batches

pub mod engine;
pub mod strategy;

pub use engine::{play_turn, simulate_batch, simulate_game, GameSummary, SimulationResult};
pub use strategy::{make_strategy, OneRollLookahead, OptimalStrategy, Strategy, STRATEGY_NAMES};
