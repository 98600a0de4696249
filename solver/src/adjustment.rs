//! Category valuation: raw score plus a heuristic adjustment.
//!
//! Two terms:
//!
//! - **Opportunity cost.** Scoring below a category's standalone expected
//!   value ([`YahtzeeContext::category_ev`]) forfeits the difference; a zero
//!   forfeits the whole EV plus a fixed penalty.
//! - **Upper-bonus delta** (Ones..Sixes only). P(reaching the bonus threshold)
//!   is modeled as a clamped linear function of expected remaining upper points
//!   vs. points still needed. The adjustment adds
//!   `(p_after − p_before) × bonus_value`.
//!
//! The probability model is a tunable approximation, not an exact computation.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::env_config::env_parse;
use crate::types::{Scorecard, YahtzeeContext};

/// Tunable constants of the adjustment model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    /// Extra penalty on top of the lost category EV when scoring 0.
    pub zero_penalty: f64,
    /// Upper total that earns the bonus.
    pub bonus_threshold: i32,
    /// Value of the bonus in the delta term.
    pub bonus_value: f64,
    /// Expected upper points per open category, as a multiple of its face.
    pub target_per_face: f64,
    /// Points of surplus (or deficit) that move the probability by 1.
    pub probability_scale: f64,
    /// Probability when expected remaining points exactly cover the need.
    pub base_probability: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            zero_penalty: 5.0,
            bonus_threshold: UPPER_BONUS_THRESHOLD,
            bonus_value: UPPER_BONUS as f64,
            target_per_face: 3.0,
            probability_scale: 20.0,
            base_probability: 0.5,
        }
    }
}

impl AdjustmentConfig {
    /// Defaults overridden by `YAHTZEE_ZERO_PENALTY`, `YAHTZEE_BONUS_SCALE`
    /// and `YAHTZEE_BONUS_VALUE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_parse("YAHTZEE_ZERO_PENALTY") {
            config.zero_penalty = v;
        }
        if let Some(v) = env_parse::<f64>("YAHTZEE_BONUS_SCALE") {
            if v > 0.0 {
                config.probability_scale = v;
            }
        }
        if let Some(v) = env_parse("YAHTZEE_BONUS_VALUE") {
            config.bonus_value = v;
        }
        config
    }

    /// Expected points from the upper category scoring `face`.
    #[inline]
    pub fn upper_target(&self, face: i32) -> f64 {
        self.target_per_face * face as f64
    }

    /// Modeled P(reaching the bonus threshold).
    ///
    /// `needed` is the points still missing; `open_upper` the number of
    /// unfilled upper categories whose targets sum to `expected_remaining`.
    pub fn bonus_probability(&self, needed: i32, expected_remaining: f64, open_upper: usize) -> f64 {
        if needed <= 0 {
            return 1.0;
        }
        if open_upper == 0 {
            return 0.0;
        }
        let p = self.base_probability + (expected_remaining - needed as f64) / self.probability_scale;
        p.clamp(0.0, 1.0)
    }
}

/// Opportunity-cost term: −max(0, ev − raw) for raw > 0, −(ev + penalty) for 0.
#[inline]
pub fn opportunity_cost(config: &AdjustmentConfig, category_ev: f64, raw: i32) -> f64 {
    if raw > 0 {
        -(category_ev - raw as f64).max(0.0)
    } else {
        -(category_ev + config.zero_penalty)
    }
}

/// Adjusted values for one scorecard.
///
/// Captures the upper-section state once so that [`Self::adjusted_value`] is
/// cheap enough to call at every lookahead leaf.
#[derive(Clone, Debug)]
pub struct CategoryValuer<'a> {
    config: &'a AdjustmentConfig,
    category_ev: &'a [f64; CATEGORY_COUNT],
    needed: i32,
    expected_remaining: f64,
    open_upper: usize,
    p_before: f64,
}

impl<'a> CategoryValuer<'a> {
    pub fn new(ctx: &'a YahtzeeContext, config: &'a AdjustmentConfig, scorecard: &Scorecard) -> Self {
        let needed = config.bonus_threshold - scorecard.upper_total();
        let mut expected_remaining = 0.0;
        let mut open_upper = 0;
        for cat in 0..UPPER_CATEGORY_COUNT {
            if !scorecard.is_filled(cat) {
                expected_remaining += config.upper_target(upper_category_face(cat));
                open_upper += 1;
            }
        }
        let p_before = config.bonus_probability(needed, expected_remaining, open_upper);
        Self {
            config,
            category_ev: &ctx.category_ev,
            needed,
            expected_remaining,
            open_upper,
            p_before,
        }
    }

    /// Change in bonus probability × bonus value if `category` scores `raw`.
    pub fn bonus_delta(&self, category: usize, raw: i32) -> f64 {
        if !is_upper_category(category) {
            return 0.0;
        }
        let target = self.config.upper_target(upper_category_face(category));
        let p_after = self.config.bonus_probability(
            self.needed - raw,
            self.expected_remaining - target,
            self.open_upper.saturating_sub(1),
        );
        (p_after - self.p_before) * self.config.bonus_value
    }

    /// raw + opportunity cost + upper-bonus delta.
    #[inline]
    pub fn adjusted_value(&self, category: usize, raw: i32) -> f64 {
        raw as f64
            + opportunity_cost(self.config, self.category_ev[category], raw)
            + self.bonus_delta(category, raw)
    }
}
