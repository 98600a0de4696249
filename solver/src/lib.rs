//! # Yahtzee: exact-table decision engine
//!
//! Plays standard 13-category Yahtzee from exact per-turn probability tables
//! and a heuristic valuation of each scoring category.
//!
//! ## Pipeline
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | Outcome space | [`phase0_tables`], [`dice_mechanics`] | 252 sorted 5-dice outcomes, reverse lookup, multinomial probabilities |
//! | Score table | [`game_mechanics`] | s(r, c) for every outcome and category; joker rule in context |
//! | Holds + transitions | [`phase0_tables`], [`types::KeepTable`] | distinct holds per outcome and sparse P(K→r) rows |
//! | Category EV | [`category_ev`] | standalone expected turn value of each category |
//! | Decision | [`decision`], [`adjustment`] | lookahead over holds with adjusted leaf values |
//!
//! All tables live in one [`types::YahtzeeContext`], built once by
//! [`types::YahtzeeContext::build`] and read-only afterwards, so a single
//! context can serve any number of threads.
//!
//! ## Decision model
//!
//! Leaves are `raw + adjustment` maximized over unfilled categories, where the
//! adjustment charges an opportunity cost against each category's standalone
//! EV and, for the upper section, credits the change in a modeled probability
//! of reaching the 35-point bonus. Rerolls are evaluated exactly over the
//! transition rows, one or two levels deep depending on the rolls left.
//!
//! [`simulation`] plays seeded games with any [`simulation::Strategy`] to
//! compare the engine against a raw-score baseline.

#![allow(clippy::needless_range_loop)]

pub mod adjustment;
pub mod category_ev;
pub mod constants;
pub mod decision;
pub mod dice_mechanics;
pub mod env_config;
pub mod error;
pub mod game_mechanics;
pub mod phase0_tables;
pub mod simulation;
pub mod types;
pub mod widget_solver;

pub use adjustment::AdjustmentConfig;
pub use decision::decide;
pub use error::SolverError;
pub use types::{Action, Scorecard, TurnView, YahtzeeContext};
