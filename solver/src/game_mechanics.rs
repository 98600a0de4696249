//! Yahtzee scoring rules: s(r, c) and its context-aware variant.
//!
//! [`calculate_category_score`] is the pure, history-free evaluator that fills
//! the score table. [`score_in_context`] layers the joker rule on top for a
//! concrete scorecard; the two differ only on five-of-a-kind rolls.

use crate::constants::*;
use crate::dice_mechanics::count_faces;
use crate::types::Scorecard;

/// Compute s(r, c): the score for placing a 5-dice roll in the given category.
///
/// Categories 0–5 are the upper section (Ones through Sixes): score = face_value × count.
/// Categories 6–12 are the lower section (3 of a Kind through Chance).
pub fn calculate_category_score(dice: &[i32; 5], category: usize) -> i32 {
    let face_count = count_faces(dice);
    let sum_all: i32 = dice.iter().sum();

    match category {
        CATEGORY_ONES | CATEGORY_TWOS | CATEGORY_THREES | CATEGORY_FOURS | CATEGORY_FIVES
        | CATEGORY_SIXES => {
            let face = upper_category_face(category);
            face_count[face as usize] * face
        }
        CATEGORY_THREE_OF_A_KIND => n_of_a_kind_score(&face_count, 3, sum_all),
        CATEGORY_FOUR_OF_A_KIND => n_of_a_kind_score(&face_count, 4, sum_all),
        CATEGORY_FULL_HOUSE => {
            let has_three = (1..=6).any(|f| face_count[f] == 3);
            let has_two = (1..=6).any(|f| face_count[f] == 2);
            if has_three && has_two {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        CATEGORY_SMALL_STRAIGHT => {
            if longest_run(&face_count) >= 4 {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        CATEGORY_LARGE_STRAIGHT => {
            if longest_run(&face_count) == 5 {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        CATEGORY_YAHTZEE => {
            if is_five_of_a_kind(&face_count) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        CATEGORY_CHANCE => sum_all,
        _ => 0,
    }
}

/// Scoring helper for N-of-a-kind categories: sum of all dice if any face
/// appears >= n times, else 0.
fn n_of_a_kind_score(face_count: &[i32; 7], n: i32, sum_all: i32) -> i32 {
    if face_count[1..].iter().any(|&c| c >= n) {
        sum_all
    } else {
        0
    }
}

/// Longest run of consecutive faces present at least once.
fn longest_run(face_count: &[i32; 7]) -> i32 {
    let mut best = 0;
    let mut run = 0;
    for f in 1..=6 {
        if face_count[f] > 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

fn is_five_of_a_kind(face_count: &[i32; 7]) -> bool {
    face_count[1..].contains(&5)
}

/// The face of a five-of-a-kind roll, if the dice are one.
pub fn five_of_a_kind_face(dice: &[i32; 5]) -> Option<i32> {
    if dice.iter().all(|&d| d == dice[0]) {
        Some(dice[0])
    } else {
        None
    }
}

/// True when the scorecard already holds a scored (50-point) Yahtzee, so a
/// further five-of-a-kind earns the repeat bonus.
pub fn yahtzee_bonus_eligible(scorecard: &Scorecard) -> bool {
    scorecard.score(CATEGORY_YAHTZEE) == Some(YAHTZEE_SCORE)
}

/// Joker rule: a repeat five-of-a-kind whose matching upper category is
/// already filled may be used as a wildcard in the lower section.
pub fn joker_applies(dice: &[i32; 5], scorecard: &Scorecard) -> bool {
    match five_of_a_kind_face(dice) {
        Some(face) => {
            yahtzee_bonus_eligible(scorecard) && scorecard.is_filled(face as usize - 1)
        }
        None => false,
    }
}

/// Score `dice` in `category` given the scorecard the score would be entered on.
///
/// Identical to [`calculate_category_score`] except under the joker rule, where
/// full house and both straights score their fixed values.
pub fn score_in_context(dice: &[i32; 5], category: usize, scorecard: &Scorecard) -> i32 {
    if joker_applies(dice, scorecard) {
        match category {
            CATEGORY_FULL_HOUSE => return FULL_HOUSE_SCORE,
            CATEGORY_SMALL_STRAIGHT => return SMALL_STRAIGHT_SCORE,
            CATEGORY_LARGE_STRAIGHT => return LARGE_STRAIGHT_SCORE,
            _ => {}
        }
    }
    calculate_category_score(dice, category)
}
