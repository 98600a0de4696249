//! Decision engine: best action for a live turn.
//!
//! Leaves are adjusted category values ([`CategoryValuer`]) maximized over the
//! unfilled categories, with the joker rule applied to five-of-a-kind outcomes.
//! Lookahead depth follows the rolls already used:
//!
//! | rolls used | evaluation                                                  |
//! |-----------:|-------------------------------------------------------------|
//! | 3          | argmax category on the current outcome                      |
//! | 2          | score now vs. best hold of Σ P(K→r) · leaf[r]               |
//! | 1          | score now vs. best hold of Σ P(K→r) · level1[r]             |
//!
//! where `level1[r]` is the best-over-holds expectation of the leaves. All
//! comparisons are strict, so ties favor the earlier category and favor
//! scoring over rerolling. Holds are chosen as value multisets and mapped back
//! to die positions only at the boundary ([`remap_hold_to_positions`]).

use crate::adjustment::{AdjustmentConfig, CategoryValuer};
use crate::constants::*;
use crate::dice_mechanics::{dice_in_range, outcome_index_unsorted};
use crate::error::SolverError;
use crate::game_mechanics::{joker_applies, score_in_context};
use crate::types::{Action, Scorecard, TurnView, YahtzeeContext};
use crate::widget_solver::{choose_best_hold, compute_max_ev_for_n_rerolls};

/// A decision in value space, before position remapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Score(usize),
    /// Sorted face values to keep.
    Hold(Vec<i32>),
}

/// Check the view's preconditions and return the current outcome index.
pub(crate) fn validate_view(ctx: &YahtzeeContext, view: &TurnView) -> Result<usize, SolverError> {
    if !dice_in_range(&view.dice) {
        let bad = view
            .dice
            .iter()
            .copied()
            .find(|d| !(1..=6).contains(d))
            .unwrap_or_default();
        return Err(SolverError::InvalidDie(bad));
    }
    if !(1..=3).contains(&view.rolls_used) {
        return Err(SolverError::InvalidRollsUsed(view.rolls_used));
    }
    if view.scorecard.is_complete() {
        return Err(SolverError::ScorecardComplete);
    }
    Ok(outcome_index_unsorted(ctx, &view.dice))
}

/// Unfilled categories in enumeration order.
pub(crate) fn open_categories(scorecard: &Scorecard) -> Vec<usize> {
    (0..CATEGORY_COUNT)
        .filter(|&c| !scorecard.is_filled(c))
        .collect()
}

/// Raw score of outcome `ds` in `category`, joker rule included.
#[inline]
fn raw_score(ctx: &YahtzeeContext, scorecard: &Scorecard, joker: bool, ds: usize, category: usize) -> i32 {
    if joker {
        score_in_context(&ctx.all_outcomes[ds], category, scorecard)
    } else {
        ctx.precomputed_scores[ds][category]
    }
}

/// Best (category, adjusted value) for outcome `ds`.
///
/// `open` must be non-empty; [`validate_view`] rejects complete scorecards first.
fn best_category(
    ctx: &YahtzeeContext,
    valuer: &CategoryValuer,
    scorecard: &Scorecard,
    open: &[usize],
    ds: usize,
) -> (usize, f64) {
    debug_assert!(!open.is_empty(), "no open category");
    let joker = joker_applies(&ctx.all_outcomes[ds], scorecard);
    let mut best = (open[0], f64::NEG_INFINITY);
    for &c in open {
        let v = valuer.adjusted_value(c, raw_score(ctx, scorecard, joker, ds, c));
        if v > best.1 {
            best = (c, v);
        }
    }
    best
}

/// Leaf value of every outcome: best adjusted value over a non-empty `open`.
pub(crate) fn leaf_values(
    ctx: &YahtzeeContext,
    valuer: &CategoryValuer,
    scorecard: &Scorecard,
    open: &[usize],
) -> [f64; NUM_OUTCOMES] {
    let mut leaf = [0.0f64; NUM_OUTCOMES];
    for (ds, value) in leaf.iter_mut().enumerate() {
        *value = best_category(ctx, valuer, scorecard, open, ds).1;
    }
    leaf
}

/// Decide in value space.
pub fn decide_values(
    ctx: &YahtzeeContext,
    config: &AdjustmentConfig,
    view: &TurnView,
) -> Result<Decision, SolverError> {
    let ds = validate_view(ctx, view)?;
    let scorecard = view.scorecard;
    let valuer = CategoryValuer::new(ctx, config, scorecard);
    let open = open_categories(scorecard);

    let (best_cat, score_now) = best_category(ctx, &valuer, scorecard, &open, ds);
    if view.rolls_used == 3 {
        return Ok(Decision::Score(best_cat));
    }

    let leaf = leaf_values(ctx, &valuer, scorecard, &open);
    let values = if view.rolls_used == 1 {
        let mut level1 = [0.0f64; NUM_OUTCOMES];
        compute_max_ev_for_n_rerolls(ctx, &leaf, &mut level1);
        level1
    } else {
        leaf
    };

    match choose_best_hold(ctx, ds, &values) {
        Some((kid, ev)) if ev > score_now => Ok(Decision::Hold(ctx.keep_table.hold_values(kid))),
        _ => Ok(Decision::Score(best_cat)),
    }
}

/// Decide and map the result onto die positions.
pub fn decide(
    ctx: &YahtzeeContext,
    config: &AdjustmentConfig,
    view: &TurnView,
) -> Result<Action, SolverError> {
    Ok(match decide_values(ctx, config, view)? {
        Decision::Score(category) => Action::Score { category },
        Decision::Hold(values) => Action::Reroll {
            hold: remap_hold_to_positions(&view.dice, &view.held, &values),
        },
    })
}

/// Map a held value multiset onto die positions.
///
/// Each value claims the lowest-index unclaimed die showing it, preferring
/// dice that are already held. Values absent from `dice` are skipped. The
/// result is sorted ascending.
pub fn remap_hold_to_positions(dice: &[i32; 5], held: &[bool; 5], values: &[i32]) -> Vec<usize> {
    let mut claimed = [false; 5];
    let mut positions = Vec::with_capacity(values.len());
    for &v in values {
        let pick = (0..5)
            .filter(|&i| !claimed[i] && dice[i] == v)
            .min_by_key(|&i| (!held[i], i));
        if let Some(i) = pick {
            claimed[i] = true;
            positions.push(i);
        }
    }
    positions.sort_unstable();
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ctx() -> Box<YahtzeeContext> {
        YahtzeeContext::build().unwrap()
    }

    fn view<'a>(dice: [i32; 5], rolls_used: i32, sc: &'a Scorecard) -> TurnView<'a> {
        TurnView {
            dice,
            held: [false; 5],
            rolls_used,
            scorecard: sc,
        }
    }

    fn only_open(open: &[usize]) -> Scorecard {
        let mut sc = Scorecard::new();
        for c in 0..CATEGORY_COUNT {
            if !open.contains(&c) {
                sc.set_score(c, 0);
            }
        }
        sc
    }

    #[test]
    fn test_yahtzee_scored_immediately() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = Scorecard::new();
        for rolls in 1..=3 {
            let a = decide(&ctx, &cfg, &view([3, 3, 3, 3, 3], rolls, &sc)).unwrap();
            assert_eq!(a, Action::Score { category: CATEGORY_YAHTZEE });
        }
    }

    #[test]
    fn test_large_straight_scored() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = Scorecard::new();
        for rolls in 1..=3 {
            let a = decide(&ctx, &cfg, &view([5, 3, 1, 2, 4], rolls, &sc)).unwrap();
            assert_eq!(a, Action::Score { category: CATEGORY_LARGE_STRAIGHT });
        }
    }

    #[test]
    fn test_four_of_a_kind_rerolls_odd_die() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = Scorecard::new();
        let d = decide_values(&ctx, &cfg, &view([4, 4, 4, 4, 2], 1, &sc)).unwrap();
        assert_eq!(d, Decision::Hold(vec![4, 4, 4, 4]));

        let a = decide(&ctx, &cfg, &view([2, 4, 4, 4, 4], 1, &sc)).unwrap();
        assert_eq!(a, Action::Reroll { hold: vec![1, 2, 3, 4] });
    }

    #[test]
    fn test_rolls_left_changes_lookahead() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = Scorecard::new();
        // Two rerolls left: breaking the full house pays.
        assert_eq!(
            decide_values(&ctx, &cfg, &view([1, 1, 1, 4, 4], 1, &sc)),
            Ok(Decision::Hold(vec![4]))
        );
        // One reroll left: the full house in hand wins.
        assert_eq!(
            decide_values(&ctx, &cfg, &view([1, 1, 1, 4, 4], 2, &sc)),
            Ok(Decision::Score(CATEGORY_FULL_HOUSE))
        );
    }

    #[test]
    fn test_complete_scorecard_rejected_before_leaves() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let full = only_open(&[]);
        for rolls in 1..=3 {
            assert_eq!(
                decide_values(&ctx, &cfg, &view([2, 2, 3, 5, 6], rolls, &full)),
                Err(SolverError::ScorecardComplete)
            );
        }
    }

    #[test]
    fn test_must_score_after_third_roll() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = Scorecard::new();
        let a = decide(&ctx, &cfg, &view([4, 4, 4, 4, 2], 3, &sc)).unwrap();
        match a {
            Action::Score { category } => assert!(category < CATEGORY_COUNT),
            other => panic!("expected score, got {:?}", other),
        }
    }

    #[test]
    fn test_single_open_category() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = only_open(&[CATEGORY_CHANCE]);
        let a = decide(&ctx, &cfg, &view([1, 1, 2, 2, 3], 3, &sc)).unwrap();
        assert_eq!(a, Action::Score { category: CATEGORY_CHANCE });

        // Every rerolled die beats a held 1.
        let a = decide(&ctx, &cfg, &view([1, 1, 1, 1, 1], 1, &sc)).unwrap();
        assert_eq!(a, Action::Reroll { hold: vec![] });
    }

    #[test]
    fn test_joker_enables_straight() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let mut sc = only_open(&[CATEGORY_ONES, CATEGORY_LARGE_STRAIGHT]);
        sc.scores[CATEGORY_YAHTZEE] = Some(YAHTZEE_SCORE);
        let a = decide(&ctx, &cfg, &view([5, 5, 5, 5, 5], 3, &sc)).unwrap();
        assert_eq!(a, Action::Score { category: CATEGORY_LARGE_STRAIGHT });
    }

    #[test]
    fn test_only_open_categories_chosen() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = only_open(&[CATEGORY_ONES, CATEGORY_TWOS]);
        let a = decide(&ctx, &cfg, &view([6, 6, 6, 6, 6], 3, &sc)).unwrap();
        match a {
            Action::Score { category } => {
                assert!(category == CATEGORY_ONES || category == CATEGORY_TWOS)
            }
            other => panic!("expected score, got {:?}", other),
        }
    }

    #[test]
    fn test_precondition_errors() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let sc = Scorecard::new();
        assert_eq!(
            decide(&ctx, &cfg, &view([1, 2, 3, 4, 5], 0, &sc)),
            Err(SolverError::InvalidRollsUsed(0))
        );
        assert_eq!(
            decide(&ctx, &cfg, &view([1, 2, 3, 4, 5], 4, &sc)),
            Err(SolverError::InvalidRollsUsed(4))
        );
        assert_eq!(
            decide(&ctx, &cfg, &view([1, 2, 7, 4, 5], 1, &sc)),
            Err(SolverError::InvalidDie(7))
        );
        let full = only_open(&[]);
        assert_eq!(
            decide(&ctx, &cfg, &view([1, 2, 3, 4, 5], 1, &full)),
            Err(SolverError::ScorecardComplete)
        );
    }

    #[test]
    fn test_deterministic() {
        let ctx = make_ctx();
        let cfg = AdjustmentConfig::default();
        let mut sc = Scorecard::new();
        sc.set_score(CATEGORY_FULL_HOUSE, 25);
        sc.set_score(CATEGORY_SIXES, 24);
        for dice in [[1, 3, 3, 5, 6], [2, 2, 4, 6, 6], [1, 2, 3, 4, 6]] {
            for rolls in 1..=3 {
                let v = view(dice, rolls, &sc);
                assert_eq!(decide(&ctx, &cfg, &v), decide(&ctx, &cfg, &v));
            }
        }
    }

    #[test]
    fn test_remap_hold_to_positions() {
        let none = [false; 5];
        assert_eq!(remap_hold_to_positions(&[4, 2, 4, 4, 4], &none, &[4, 4, 4, 4]), vec![0, 2, 3, 4]);
        assert_eq!(remap_hold_to_positions(&[6, 1, 6, 3, 1], &none, &[1, 6]), vec![0, 1]);
        assert_eq!(remap_hold_to_positions(&[6, 1, 6, 3, 1], &none, &[]), Vec::<usize>::new());

        let held = [false, false, true, false, true];
        assert_eq!(remap_hold_to_positions(&[6, 1, 6, 3, 1], &held, &[1, 6]), vec![2, 4]);
    }
}
