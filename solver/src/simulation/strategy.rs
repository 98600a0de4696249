//! Strategy types for game simulation.
//!
//! A [`Strategy`] maps a live [`TurnView`] to an [`Action`]. Two are provided:
//!
//! - [`OptimalStrategy`]: the decision engine ([`crate::decision::decide`])
//! - [`OneRollLookahead`]: raw scores only, one reroll of lookahead, no
//!   opportunity cost or bonus modeling
//!
//! [`make_strategy`] maps CLI specs like `"optimal"` or `"one-roll"` to
//! concrete strategies.

use crate::adjustment::AdjustmentConfig;
use crate::constants::NUM_OUTCOMES;
use crate::decision::{decide, open_categories, remap_hold_to_positions, validate_view};
use crate::error::SolverError;
use crate::types::{Action, TurnView, YahtzeeContext};
use crate::widget_solver::choose_best_hold;

/// A decision policy usable by the game loop.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;
    fn decide(&self, view: &TurnView) -> Result<Action, SolverError>;
}

/// The decision engine with a fixed adjustment configuration.
pub struct OptimalStrategy<'a> {
    ctx: &'a YahtzeeContext,
    config: AdjustmentConfig,
}

impl<'a> OptimalStrategy<'a> {
    pub fn new(ctx: &'a YahtzeeContext, config: AdjustmentConfig) -> Self {
        Self { ctx, config }
    }
}

impl Strategy for OptimalStrategy<'_> {
    fn name(&self) -> &str {
        "optimal"
    }

    fn decide(&self, view: &TurnView) -> Result<Action, SolverError> {
        decide(self.ctx, &self.config, view)
    }
}

/// Context-free baseline: best raw score now vs. the exact one-reroll
/// expectation of the best raw score.
pub struct OneRollLookahead<'a> {
    ctx: &'a YahtzeeContext,
}

impl<'a> OneRollLookahead<'a> {
    pub fn new(ctx: &'a YahtzeeContext) -> Self {
        Self { ctx }
    }
}

impl Strategy for OneRollLookahead<'_> {
    fn name(&self) -> &str {
        "one-roll"
    }

    fn decide(&self, view: &TurnView) -> Result<Action, SolverError> {
        let ctx = self.ctx;
        let ds = validate_view(ctx, view)?;
        let open = open_categories(view.scorecard);

        let best_raw = |r: usize| -> (usize, i32) {
            let mut best = (open[0], i32::MIN);
            for &c in &open {
                let s = ctx.precomputed_scores[r][c];
                if s > best.1 {
                    best = (c, s);
                }
            }
            best
        };

        let (category, now) = best_raw(ds);
        if view.rolls_used == 3 {
            return Ok(Action::Score { category });
        }

        let mut leaf = [0.0f64; NUM_OUTCOMES];
        for (r, value) in leaf.iter_mut().enumerate() {
            *value = best_raw(r).1 as f64;
        }
        match choose_best_hold(ctx, ds, &leaf) {
            Some((kid, ev)) if ev > now as f64 => Ok(Action::Reroll {
                hold: remap_hold_to_positions(&view.dice, &view.held, &ctx.keep_table.hold_values(kid)),
            }),
            _ => Ok(Action::Score { category }),
        }
    }
}

/// Names accepted by [`make_strategy`].
pub const STRATEGY_NAMES: [&str; 2] = ["optimal", "one-roll"];

/// Build a strategy from its CLI name. The optimal strategy reads its
/// adjustment constants from the environment.
pub fn make_strategy<'a>(spec: &str, ctx: &'a YahtzeeContext) -> Option<Box<dyn Strategy + 'a>> {
    match spec {
        "optimal" => Some(Box::new(OptimalStrategy::new(ctx, AdjustmentConfig::from_env()))),
        "one-roll" => Some(Box::new(OneRollLookahead::new(ctx))),
        _ => None,
    }
}
