//! Game simulation engine: plays seeded games with any [`Strategy`].
//!
//! A turn is: mandatory first roll, then up to two rerolls chosen by the
//! strategy, then a score. Each game owns a [`SmallRng`] seeded from
//! `seed + game_index`, so a batch is reproducible regardless of how rayon
//! schedules it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::constants::*;
use crate::error::SolverError;
use crate::types::{Action, Scorecard, TurnView};

use super::strategy::Strategy;

/// Final state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub total_score: i32,
    pub upper_total: i32,
    pub got_bonus: bool,
    pub yahtzee_bonus_count: i32,
}

/// Results of a batch simulation.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationResult {
    pub strategy: String,
    pub games: usize,
    #[serde(skip)]
    pub scores: Vec<i32>,
    pub mean: f64,
    pub std_dev: f64,
    pub min: i32,
    pub max: i32,
    pub median: i32,
    /// Fraction of games that earned the upper bonus.
    pub bonus_rate: f64,
    #[serde(skip)]
    pub elapsed: std::time::Duration,
    pub elapsed_secs: f64,
}

/// Roll 5 random dice (position order, unsorted).
#[inline(always)]
fn roll_dice(rng: &mut SmallRng) -> [i32; 5] {
    let mut dice = [0i32; 5];
    for d in &mut dice {
        *d = rng.random_range(1..=6);
    }
    dice
}

/// Reroll every position not marked in `held`.
#[inline(always)]
fn apply_reroll(dice: &mut [i32; 5], held: &[bool; 5], rng: &mut SmallRng) {
    for i in 0..5 {
        if !held[i] {
            dice[i] = rng.random_range(1..=6);
        }
    }
}

fn illegal(strategy: &dyn Strategy, reason: String) -> SolverError {
    SolverError::IllegalAction {
        strategy: strategy.name().to_string(),
        reason,
    }
}

/// Play one turn on `scorecard`. Returns the category score entered.
pub fn play_turn(
    strategy: &dyn Strategy,
    scorecard: &mut Scorecard,
    rng: &mut SmallRng,
) -> Result<i32, SolverError> {
    let mut dice = roll_dice(rng);
    let mut held = [false; 5];
    let mut rolls_used = 1;

    loop {
        let view = TurnView {
            dice,
            held,
            rolls_used,
            scorecard: &*scorecard,
        };
        match strategy.decide(&view)? {
            Action::Score { category } => {
                if category >= CATEGORY_COUNT || scorecard.is_filled(category) {
                    return Err(illegal(
                        strategy,
                        format!("category {} is not open", category),
                    ));
                }
                return Ok(scorecard.record(category, &dice));
            }
            Action::Reroll { hold } => {
                if rolls_used >= 3 {
                    return Err(illegal(strategy, "reroll after the third roll".into()));
                }
                let mut next = [false; 5];
                for &pos in &hold {
                    if pos >= 5 || next[pos] {
                        return Err(illegal(strategy, format!("bad hold {:?}", hold)));
                    }
                    next[pos] = true;
                }
                held = next;
                apply_reroll(&mut dice, &held, rng);
                rolls_used += 1;
            }
        }
    }
}

/// Play a full 13-turn game from `seed`.
pub fn simulate_game(strategy: &dyn Strategy, seed: u64) -> Result<GameSummary, SolverError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut scorecard = Scorecard::new();
    for _ in 0..CATEGORY_COUNT {
        play_turn(strategy, &mut scorecard, &mut rng)?;
    }
    Ok(GameSummary {
        total_score: scorecard.grand_total(),
        upper_total: scorecard.upper_total(),
        got_bonus: scorecard.upper_bonus() > 0,
        yahtzee_bonus_count: scorecard.yahtzee_bonus_count,
    })
}

/// Simulate N games in parallel, returning aggregate statistics.
pub fn simulate_batch(
    strategy: &dyn Strategy,
    num_games: usize,
    seed: u64,
) -> Result<SimulationResult, SolverError> {
    let start = Instant::now();

    let summaries: Vec<GameSummary> = (0..num_games)
        .into_par_iter()
        .map(|i| simulate_game(strategy, seed.wrapping_add(i as u64)))
        .collect::<Result<Vec<_>, SolverError>>()?;

    let elapsed = start.elapsed();
    let mut scores: Vec<i32> = summaries.iter().map(|g| g.total_score).collect();
    let n = num_games.max(1) as f64;

    let sum: f64 = scores.iter().map(|&s| s as f64).sum();
    let mean = sum / n;
    let variance: f64 = scores
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();
    let min = *scores.iter().min().unwrap_or(&0);
    let max = *scores.iter().max().unwrap_or(&0);
    let bonus_rate = summaries.iter().filter(|g| g.got_bonus).count() as f64 / n;

    scores.sort_unstable();
    let median = scores.get(num_games / 2).copied().unwrap_or(0);

    Ok(SimulationResult {
        strategy: strategy.name().to_string(),
        games: num_games,
        scores,
        mean,
        std_dev,
        min,
        max,
        median,
        bonus_rate,
        elapsed,
        elapsed_secs: elapsed.as_secs_f64(),
    })
}
