//! Phase 0: Precompute all static lookup tables.
//!
//! The orchestrator [`precompute_lookup_tables`] runs 6 sub-steps in dependency order:
//!
//! 1. **Factorials**: 0!..5! for multinomial coefficients
//! 2. **Outcomes**: enumerate R_{5,6} (252 sorted 5-dice multisets) + reverse lookup
//! 3. **Category scores**: s(r, c) for all (r, c) pairs
//! 4. **Outcome probabilities**: P(⊥→r) for each r ∈ R_{5,6}
//! 5. **Keep-multiset table**: distinct holds per outcome and sparse P(K→r) rows
//! 6. **Category EV**: context-free per-category turn value ([`crate::category_ev`])
//!
//! Every step is deterministic and I/O-free. Steps 2, 4 and 5 verify their
//! invariants and return [`SolverError`] on violation; a context that failed
//! to build must be discarded.

use std::time::Instant;

use log::{debug, info};

use crate::category_ev::compute_category_evs;
use crate::constants::*;
use crate::dice_mechanics::{compute_probability_of_outcome, find_outcome_index, sort_dice_set};
use crate::error::SolverError;
use crate::game_mechanics::calculate_category_score;
use crate::types::{KeepTable, YahtzeeContext};

/// Precompute factorials 0!..5! for multinomial coefficient calculations.
pub fn precompute_factorials(ctx: &mut YahtzeeContext) {
    ctx.factorial[0] = 1;
    for i in 1..=5 {
        ctx.factorial[i] = ctx.factorial[i - 1] * i as i32;
    }
}

/// Enumerate all C(10,5) = 252 sorted 5-dice multisets R_{5,6} and build
/// a 5D reverse lookup table: `index_lookup[d1-1][d2-1][d3-1][d4-1][d5-1] = index`.
pub fn build_all_outcomes(ctx: &mut YahtzeeContext) -> Result<(), SolverError> {
    ctx.num_outcomes = 0;
    for a in 1..=6i32 {
        for b in a..=6 {
            for c in b..=6 {
                for d in c..=6 {
                    for e in d..=6 {
                        let idx = ctx.num_outcomes;
                        if idx >= NUM_OUTCOMES {
                            return Err(SolverError::OutcomeCount {
                                expected: NUM_OUTCOMES,
                                actual: idx + 1,
                            });
                        }
                        ctx.all_outcomes[idx] = [a, b, c, d, e];
                        ctx.index_lookup[(a - 1) as usize][(b - 1) as usize][(c - 1) as usize]
                            [(d - 1) as usize][(e - 1) as usize] = idx as u8;
                        ctx.num_outcomes += 1;
                    }
                }
            }
        }
    }
    if ctx.num_outcomes != NUM_OUTCOMES {
        return Err(SolverError::OutcomeCount {
            expected: NUM_OUTCOMES,
            actual: ctx.num_outcomes,
        });
    }
    Ok(())
}

/// Precompute s(r, c) for all r in R_{5,6} and all 13 categories.
pub fn precompute_category_scores(ctx: &mut YahtzeeContext) {
    for i in 0..NUM_OUTCOMES {
        let dice = ctx.all_outcomes[i];
        for cat in 0..CATEGORY_COUNT {
            ctx.precomputed_scores[i][cat] = calculate_category_score(&dice, cat);
        }
    }
}

/// Precompute P(empty -> r) for all r in R_{5,6}; the mass must total 1.
pub fn precompute_outcome_probabilities(ctx: &mut YahtzeeContext) -> Result<(), SolverError> {
    for ds_i in 0..NUM_OUTCOMES {
        ctx.outcome_probabilities[ds_i] =
            compute_probability_of_outcome(&ctx.factorial, &ctx.all_outcomes[ds_i]);
    }
    let sum: f64 = ctx.outcome_probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(SolverError::ProbabilityMass { sum });
    }
    Ok(())
}

/// All distinct sorted sub-multisets of `dice` obtainable by keeping any
/// subset of die positions, deduplicated by value.
///
/// Subsets are visited in bit order (bit `i` set = keep die `i`), so the empty
/// hold comes first and duplicates keep their first-seen position. Five
/// distinct faces give all 32 subsets; five equal faces give 6.
pub fn unique_holds(dice: &[i32; 5]) -> Vec<Vec<i32>> {
    let mut holds: Vec<Vec<i32>> = Vec::with_capacity(MAX_HOLDS_PER_OUTCOME);
    for mask in 0..MAX_HOLDS_PER_OUTCOME {
        let mut hold: Vec<i32> = (0..5)
            .filter(|&i| mask & (1 << i) != 0)
            .map(|i| dice[i])
            .collect();
        hold.sort_unstable();
        if !holds.contains(&hold) {
            holds.push(hold);
        }
    }
    holds
}

/// Distribution over outcomes after keeping `held` and rerolling the other
/// 5 − |held| dice.
///
/// Enumerates all 6^n ordered reroll tuples, canonicalizes each combined roll
/// and adds (1/6)^n to its outcome. Keeping all five is a point mass.
pub fn transition_distribution(ctx: &YahtzeeContext, held: &[i32]) -> [f64; NUM_OUTCOMES] {
    let n = 5 - held.len();
    let weight = (1.0 / 6.0f64).powi(n as i32);
    let mut dist = [0.0f64; NUM_OUTCOMES];
    let mut reroll = [1i32; 5];

    loop {
        let mut dice = [0i32; 5];
        dice[..held.len()].copy_from_slice(held);
        dice[held.len()..].copy_from_slice(&reroll[..n]);
        sort_dice_set(&mut dice);
        dist[find_outcome_index(ctx, &dice)] += weight;

        // Odometer over the rerolled dice.
        let mut pos = 0;
        while pos < n {
            if reroll[pos] < 6 {
                reroll[pos] += 1;
                break;
            }
            reroll[pos] = 1;
            pos += 1;
        }
        if pos == n {
            break;
        }
    }
    dist
}

/// Build the keep-multiset table.
///
/// Three sub-steps:
///
/// **5a.** Enumerate all 462 keep-multisets (0–5 dice from {1..6}) as
/// frequency vectors [f1..f6], with a reverse lookup from frequency key → keep id.
///
/// **5b.** For each keep, compute its reroll distribution with
/// [`transition_distribution`] and append the non-zero entries as one CSR row.
/// Each row must sum to 1.
///
/// **5c.** For each outcome, map all 32 keep subsets to keep ids and record the
/// distinct ones in first-seen order.
pub fn precompute_keep_table(ctx: &mut YahtzeeContext) -> Result<(), SolverError> {
    let mut kt = KeepTable::new();

    // 5a: Enumerate keep-multisets as frequency vectors.
    for f1 in 0..=5i32 {
        for f2 in 0..=(5 - f1) {
            for f3 in 0..=(5 - f1 - f2) {
                for f4 in 0..=(5 - f1 - f2 - f3) {
                    for f5 in 0..=(5 - f1 - f2 - f3 - f4) {
                        for f6 in 0..=(5 - f1 - f2 - f3 - f4 - f5) {
                            let freq = [f1, f2, f3, f4, f5, f6];
                            kt.keep_lookup[KeepTable::freq_key(&freq)] = kt.keep_freq.len() as i32;
                            kt.keep_freq.push(freq);
                            kt.keep_size.push(freq.iter().sum());
                        }
                    }
                }
            }
        }
    }

    // 5b: One sparse row per keep.
    for ki in 0..kt.keep_freq.len() {
        kt.row_start[ki] = kt.vals.len() as i32;
        let held = kt.hold_values(ki);
        let dist = transition_distribution(ctx, &held);

        let sum: f64 = dist.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(SolverError::TransitionMass { hold: held, sum });
        }

        for (ti, &p) in dist.iter().enumerate() {
            if p > 0.0 {
                kt.vals.push(p);
                kt.cols.push(ti as i32);
            }
        }
    }
    kt.row_start[kt.keep_freq.len()] = kt.vals.len() as i32;

    // 5c: Distinct holds per outcome.
    let mut total_unique = 0usize;
    for ds in 0..NUM_OUTCOMES {
        let dice = &ctx.all_outcomes[ds];
        let mut n_unique = 0usize;

        for mask in 0..MAX_HOLDS_PER_OUTCOME {
            let mut kf = [0i32; 6];
            for i in 0..5 {
                if mask & (1 << i) != 0 {
                    kf[(dice[i] - 1) as usize] += 1;
                }
            }
            let kid = kt.keep_lookup[KeepTable::freq_key(&kf)];
            if !kt.unique_keep_ids[ds][..n_unique].contains(&kid) {
                kt.unique_keep_ids[ds][n_unique] = kid;
                n_unique += 1;
            }
        }

        kt.unique_count[ds] = n_unique as i32;
        total_unique += n_unique;
    }

    debug!(
        "Keep-multiset table: {} keeps, {} nnz, avg {:.1} unique/outcome",
        kt.keep_freq.len(),
        kt.vals.len(),
        total_unique as f64 / NUM_OUTCOMES as f64
    );

    ctx.keep_table = kt;
    Ok(())
}

/// Fill the per-category expected values.
pub fn precompute_category_ev(ctx: &mut YahtzeeContext) {
    ctx.category_ev = compute_category_evs(ctx);
    for (c, ev) in ctx.category_ev.iter().enumerate() {
        debug!("Category EV {:<16} {:>8.4}", CATEGORY_NAMES[c], ev);
    }
}

/// Phase 0 orchestrator: build all static lookup tables in dependency order.
pub fn precompute_lookup_tables(ctx: &mut YahtzeeContext) -> Result<(), SolverError> {
    info!("=== Phase 0: Precompute Lookup Tables ===");
    let phase0_start = Instant::now();

    macro_rules! timed {
        ($label:expr, $body:expr) => {{
            let t0 = Instant::now();
            let out = $body;
            let dt = t0.elapsed().as_secs_f64() * 1000.0;
            info!("  {:<42} {:>8.3} ms", $label, dt);
            out
        }};
    }

    timed!("Factorials", precompute_factorials(ctx));
    timed!("Outcomes (252)", build_all_outcomes(ctx)?);
    timed!("Category scores", precompute_category_scores(ctx));
    timed!(
        "Outcome probabilities",
        precompute_outcome_probabilities(ctx)?
    );
    timed!("Keep-multiset table", precompute_keep_table(ctx)?);
    timed!("Category EV", precompute_category_ev(ctx));

    let total = phase0_start.elapsed().as_secs_f64() * 1000.0;
    info!("  {:<42} {:>8.3} ms", "TOTAL Phase 0", total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ctx() -> Box<YahtzeeContext> {
        YahtzeeContext::build().unwrap()
    }

    #[test]
    fn test_context_creation() {
        let ctx = make_ctx();
        assert_eq!(ctx.factorial, [1, 1, 2, 6, 24, 120]);
        assert_eq!(ctx.num_outcomes, 252);
        assert_eq!(ctx.all_outcomes[0], [1, 1, 1, 1, 1]);
        assert_eq!(ctx.all_outcomes[251], [6, 6, 6, 6, 6]);
        assert_eq!(ctx.precomputed_scores[0][CATEGORY_ONES], 5);
        assert_eq!(ctx.precomputed_scores[0][CATEGORY_TWOS], 0);
        assert_eq!(ctx.precomputed_scores[0][CATEGORY_YAHTZEE], 50);
        assert_eq!(ctx.precomputed_scores[251][CATEGORY_SIXES], 30);
        assert_eq!(ctx.keep_table.keep_freq.len(), NUM_KEEP_MULTISETS);
    }

    #[test]
    fn test_252_outcomes() {
        let ctx = make_ctx();
        for i in 0..NUM_OUTCOMES {
            for j in 0..4 {
                assert!(ctx.all_outcomes[i][j] <= ctx.all_outcomes[i][j + 1]);
            }
            assert!(ctx.all_outcomes[i].iter().all(|d| (1..=6).contains(d)));
        }
        for i in 0..NUM_OUTCOMES {
            for j in (i + 1)..NUM_OUTCOMES {
                assert_ne!(ctx.all_outcomes[i], ctx.all_outcomes[j]);
            }
        }
    }

    #[test]
    fn test_probabilities() {
        let ctx = make_ctx();
        let sum: f64 = ctx.outcome_probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-10);
        assert!((ctx.outcome_probabilities[0] - 1.0 / 7776.0).abs() < 1e-15);

        let min = ctx
            .outcome_probabilities
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        assert!((min - 1.0 / 7776.0).abs() < 1e-15);

        let ds = find_outcome_index(&ctx, &[1, 1, 2, 3, 4]);
        assert!((ctx.outcome_probabilities[ds] - 60.0 / 7776.0).abs() < 1e-15);
    }

    #[test]
    fn test_bad_factorials_rejected() {
        let mut ctx = YahtzeeContext::new_boxed();
        precompute_factorials(&mut ctx);
        build_all_outcomes(&mut ctx).unwrap();
        // Doubles every multinomial count, so the mass totals 2.
        ctx.factorial[5] = 240;
        match precompute_outcome_probabilities(&mut ctx) {
            Err(SolverError::ProbabilityMass { sum }) => assert!((sum - 2.0).abs() < 1e-9),
            other => panic!("expected probability mass error, got {:?}", other),
        }
    }

    #[test]
    fn test_unique_holds_counts() {
        assert_eq!(unique_holds(&[1, 2, 3, 4, 5]).len(), 32);
        assert_eq!(unique_holds(&[3, 3, 3, 3, 3]).len(), 6);
        // {1,1}, {2}, {3}, {4}: 3 * 2 * 2 * 2
        assert_eq!(unique_holds(&[1, 1, 2, 3, 4]).len(), 24);

        let holds = unique_holds(&[2, 2, 5, 5, 5]);
        assert_eq!(holds[0], Vec::<i32>::new());
        assert!(holds.contains(&vec![2, 2, 5, 5, 5]));
        assert!(holds.contains(&vec![5, 5, 5]));
        assert_eq!(holds.len(), 3 * 4);
    }

    #[test]
    fn test_keep_table_matches_unique_holds() {
        let ctx = make_ctx();
        let kt = &ctx.keep_table;
        for ds in 0..NUM_OUTCOMES {
            let expected = unique_holds(&ctx.all_outcomes[ds]);
            let got: Vec<Vec<i32>> = kt
                .holds(ds)
                .iter()
                .map(|&kid| kt.hold_values(kid as usize))
                .collect();
            assert_eq!(got, expected, "outcome {:?}", ctx.all_outcomes[ds]);
            assert_eq!(kt.holds(ds)[0] as usize, ctx.empty_keep_id());
        }
    }

    #[test]
    fn test_keep_table_row_sums() {
        let ctx = make_ctx();
        let kt = &ctx.keep_table;
        for ki in 0..NUM_KEEP_MULTISETS {
            let (vals, _) = kt.row(ki);
            let sum: f64 = vals.iter().sum();
            assert!((sum - 1.0).abs() < 1e-10, "row {} sums to {}", ki, sum);
            assert!(vals.iter().all(|&p| p > 0.0));
        }
    }

    #[test]
    fn test_hold_all_is_point_mass() {
        let ctx = make_ctx();
        let kt = &ctx.keep_table;
        for ds in 0..NUM_OUTCOMES {
            let full = *kt.holds(ds).last().unwrap() as usize;
            assert_eq!(kt.keep_size[full], 5);
            let (vals, cols) = kt.row(full);
            assert_eq!(vals, &[1.0]);
            assert_eq!(cols, &[ds as i32]);
        }
    }

    #[test]
    fn test_empty_hold_matches_base_probabilities() {
        let ctx = make_ctx();
        let (vals, cols) = ctx.keep_table.row(ctx.empty_keep_id());
        assert_eq!(cols.len(), NUM_OUTCOMES);
        for (&p, &t) in vals.iter().zip(cols) {
            assert!((p - ctx.outcome_probabilities[t as usize]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_four_held_row() {
        let ctx = make_ctx();
        let kt = &ctx.keep_table;
        let kid = kt.keep_id(&[0, 0, 0, 4, 0, 0]).unwrap();
        let (vals, cols) = kt.row(kid);
        assert_eq!(cols.len(), 6);
        for (&p, &t) in vals.iter().zip(cols) {
            assert!((p - 1.0 / 6.0).abs() < 1e-15);
            let dice = ctx.all_outcomes[t as usize];
            assert!(dice.iter().filter(|&&d| d == 4).count() >= 4);
        }
    }

    #[test]
    fn test_precomputed_scores_match() {
        let ctx = make_ctx();
        for i in 0..NUM_OUTCOMES {
            for c in 0..CATEGORY_COUNT {
                assert_eq!(
                    ctx.precomputed_scores[i][c],
                    calculate_category_score(&ctx.all_outcomes[i], c),
                    "Mismatch at ds={} cat={}",
                    i,
                    c
                );
            }
        }
        let straight = find_outcome_index(&ctx, &[1, 2, 3, 4, 5]);
        assert_eq!(ctx.precomputed_scores[straight][CATEGORY_LARGE_STRAIGHT], 40);
        assert_eq!(ctx.precomputed_scores[straight][CATEGORY_CHANCE], 15);
        for face in 1..=6 {
            let ds = find_outcome_index(&ctx, &[face; 5]);
            assert_eq!(ctx.precomputed_scores[ds][CATEGORY_YAHTZEE], 50);
        }
    }
}
