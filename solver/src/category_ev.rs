//! Context-free per-category expected values.
//!
//! For each category c, the expected score of a turn played as if c were the
//! only category available:
//!
//! ```text
//! phase3[r] = s(r, c)
//! phase2[r] = max over holds K of r of Σ P(K→r') · phase3[r']
//! ev(c)     = Σ P(⊥→r) · phase2[r]
//! ```
//!
//! These feed the opportunity-cost term of the adjustment model.

use crate::constants::*;
use crate::types::YahtzeeContext;
use crate::widget_solver::{compute_max_ev_for_n_rerolls, expected_value_fresh_roll};

/// Expected turn value of a single category.
pub fn compute_category_ev(ctx: &YahtzeeContext, category: usize) -> f64 {
    let mut phase3 = [0.0f64; NUM_OUTCOMES];
    for (ds, value) in phase3.iter_mut().enumerate() {
        *value = ctx.precomputed_scores[ds][category] as f64;
    }
    let mut phase2 = [0.0f64; NUM_OUTCOMES];
    compute_max_ev_for_n_rerolls(ctx, &phase3, &mut phase2);
    expected_value_fresh_roll(ctx, &phase2)
}

/// Expected turn values of all 13 categories, in category order.
pub fn compute_category_evs(ctx: &YahtzeeContext) -> [f64; CATEGORY_COUNT] {
    let mut evs = [0.0f64; CATEGORY_COUNT];
    for (c, ev) in evs.iter_mut().enumerate() {
        *ev = compute_category_ev(ctx, c);
    }
    evs
}
