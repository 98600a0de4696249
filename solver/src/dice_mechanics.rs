//! Dice helpers: face counts, canonical sorting, outcome lookup, and the
//! multinomial probability of an unordered roll.

use crate::types::YahtzeeContext;

/// Count occurrences of each face (1-6) in a 5-dice set.
/// face_count[0] is unused; face_count[f] = count of face f.
pub fn count_faces(dice: &[i32; 5]) -> [i32; 7] {
    let mut face_count = [0i32; 7];
    for &d in dice {
        face_count[d as usize] += 1;
    }
    face_count
}

/// Normalize dice to canonical sorted form (ascending).
pub fn sort_dice_set(arr: &mut [i32; 5]) {
    for i in 0..4 {
        for j in (i + 1)..5 {
            if arr[j] < arr[i] {
                arr.swap(i, j);
            }
        }
    }
}

/// True when every die is a face value 1..=6.
pub fn dice_in_range(dice: &[i32; 5]) -> bool {
    dice.iter().all(|d| (1..=6).contains(d))
}

/// Map a sorted outcome to its index in R_{5,6} (0-251).
///
/// Unsorted input maps to an unrelated index; use [`outcome_index_unsorted`].
#[inline(always)]
pub fn find_outcome_index(ctx: &YahtzeeContext, dice: &[i32; 5]) -> usize {
    debug_assert!(
        dice.windows(2).all(|w| w[0] <= w[1]),
        "outcome lookup needs sorted dice, got {:?}",
        dice
    );
    ctx.index_lookup[(dice[0] - 1) as usize][(dice[1] - 1) as usize][(dice[2] - 1) as usize]
        [(dice[3] - 1) as usize][(dice[4] - 1) as usize] as usize
}

/// Sort a copy of `dice` and map it to its outcome index.
pub fn outcome_index_unsorted(ctx: &YahtzeeContext, dice: &[i32; 5]) -> usize {
    let mut sorted = *dice;
    sort_dice_set(&mut sorted);
    find_outcome_index(ctx, &sorted)
}

/// Compute P(empty -> r): probability of rolling this exact sorted outcome
/// from 5 fresh dice.
///
/// Formula: multinomial(5; face_counts) / 6^5
///        = 5! / (n1! * n2! * ... * n6!) / 6^5
pub fn compute_probability_of_outcome(factorial: &[i32; 6], dice: &[i32; 5]) -> f64 {
    let face_count = count_faces(dice);

    let mut denominator = 1i32;
    for f in 1..=6 {
        denominator *= factorial[face_count[f] as usize];
    }

    let permutations = factorial[5] / denominator;
    permutations as f64 / 6.0f64.powi(5)
}
