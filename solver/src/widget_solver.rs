//! Turn-level expectation kernels shared by every evaluator.
//!
//! A single turn is solved bottom-up over the 252 outcomes:
//!
//! ```text
//! leaf[r]            : value of stopping on roll r
//! E(K)   = Σ P(K→r) · leaf[r]                 expected value of keeping K
//! level[r] = max_{K ⊆ r} E(K)                 best value with one reroll left
//! ```
//!
//! Keep-all is among the holds of r and has E = leaf[r], so `level[r] >= leaf[r]`.
//! Choosing a concrete reroll excludes keep-all: scoring the roll is the
//! alternative, and the caller compares against it explicitly.

use crate::constants::*;
use crate::types::{KeepTable, YahtzeeContext};

/// E(K) = Σ P(K→r) · values[r] over the sparse row of keep `kid`.
#[inline(always)]
pub fn expected_value_for_keep(kt: &KeepTable, kid: usize, values: &[f64; NUM_OUTCOMES]) -> f64 {
    let (vals, cols) = kt.row(kid);
    let mut ev = 0.0;
    for (&p, &t) in vals.iter().zip(cols) {
        ev += p * values[t as usize];
    }
    ev
}

/// Expected value of a fresh roll of all five dice.
pub fn expected_value_fresh_roll(ctx: &YahtzeeContext, values: &[f64; NUM_OUTCOMES]) -> f64 {
    expected_value_for_keep(&ctx.keep_table, ctx.empty_keep_id(), values)
}

/// One reroll level: `cur[r] = max over every hold K of r of E(K)` under `prev`.
pub fn compute_max_ev_for_n_rerolls(
    ctx: &YahtzeeContext,
    prev: &[f64; NUM_OUTCOMES],
    cur: &mut [f64; NUM_OUTCOMES],
) {
    let kt = &ctx.keep_table;
    for ds in 0..NUM_OUTCOMES {
        let mut best = f64::NEG_INFINITY;
        for &kid in kt.holds(ds) {
            let ev = expected_value_for_keep(kt, kid as usize, prev);
            if ev > best {
                best = ev;
            }
        }
        cur[ds] = best;
    }
}

/// Best proper hold of outcome `ds` (keep-all excluded) and its expectation.
///
/// Holds are scanned in first-seen order with strict `>`, so ties resolve to
/// the earliest hold. `None` only if the outcome has no proper hold, which
/// cannot happen for a built context.
pub fn choose_best_hold(
    ctx: &YahtzeeContext,
    ds: usize,
    values: &[f64; NUM_OUTCOMES],
) -> Option<(usize, f64)> {
    let kt = &ctx.keep_table;
    let mut best: Option<(usize, f64)> = None;
    for &kid in kt.holds(ds) {
        let kid = kid as usize;
        if kt.keep_size[kid] == 5 {
            continue;
        }
        let ev = expected_value_for_keep(kt, kid, values);
        match best {
            Some((_, best_ev)) if ev <= best_ev => {}
            _ => best = Some((kid, ev)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice_mechanics::find_outcome_index;

    fn make_ctx() -> Box<YahtzeeContext> {
        YahtzeeContext::build().unwrap()
    }

    /// Leaf values for a single open category, scored raw.
    fn single_category_leaf(ctx: &YahtzeeContext, cat: usize) -> [f64; NUM_OUTCOMES] {
        let mut leaf = [0.0; NUM_OUTCOMES];
        for ds in 0..NUM_OUTCOMES {
            leaf[ds] = ctx.precomputed_scores[ds][cat] as f64;
        }
        leaf
    }

    #[test]
    fn test_keep_all_equals_leaf() {
        let ctx = make_ctx();
        let leaf = single_category_leaf(&ctx, CATEGORY_CHANCE);
        let kt = &ctx.keep_table;
        for ds in [0, 100, 251] {
            let full = *kt.holds(ds).last().unwrap() as usize;
            let ev = expected_value_for_keep(kt, full, &leaf);
            assert!((ev - leaf[ds]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fresh_roll_chance() {
        let ctx = make_ctx();
        let leaf = single_category_leaf(&ctx, CATEGORY_CHANCE);
        assert!((expected_value_fresh_roll(&ctx, &leaf) - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_level_dominates_leaf() {
        let ctx = make_ctx();
        let leaf = single_category_leaf(&ctx, CATEGORY_YAHTZEE);
        let mut level = [0.0; NUM_OUTCOMES];
        compute_max_ev_for_n_rerolls(&ctx, &leaf, &mut level);
        for ds in 0..NUM_OUTCOMES {
            assert!(level[ds] >= leaf[ds] - 1e-12);
        }
        let yahtzee = find_outcome_index(&ctx, &[2, 2, 2, 2, 2]);
        assert!((level[yahtzee] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_choose_best_hold_four_of_a_kind() {
        let ctx = make_ctx();
        let leaf = single_category_leaf(&ctx, CATEGORY_YAHTZEE);
        let ds = find_outcome_index(&ctx, &[2, 4, 4, 4, 4]);
        let (kid, ev) = choose_best_hold(&ctx, ds, &leaf).unwrap();
        assert_eq!(ctx.keep_table.hold_values(kid), vec![4, 4, 4, 4]);
        assert!((ev - 50.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_choose_best_hold_never_keeps_all() {
        let ctx = make_ctx();
        let leaf = single_category_leaf(&ctx, CATEGORY_CHANCE);
        for ds in 0..NUM_OUTCOMES {
            let (kid, _) = choose_best_hold(&ctx, ds, &leaf).unwrap();
            assert!(ctx.keep_table.keep_size[kid] < 5);
        }
    }
}
