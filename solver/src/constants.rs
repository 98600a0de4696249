//! Game constants and category indexing.
//!
//! Maps the table notation to concrete values:
//! - |C| = [`CATEGORY_COUNT`] = 13 (standard Yahtzee)
//! - |R_{5,6}| = [`NUM_OUTCOMES`] = 252
//! - |R_k| = [`NUM_KEEP_MULTISETS`] = 462
//!
//! Category indices double as bit positions in the filled-categories mask
//! (`filled & (1 << cat)`). The index order is also the tie-break order used
//! by the decision engine.

/// Number of scoring categories (Ones through Chance).
pub const CATEGORY_COUNT: usize = 13;

/// Number of upper-section categories (Ones through Sixes).
pub const UPPER_CATEGORY_COUNT: usize = 6;

/// Mask with every category bit set.
pub const ALL_CATEGORIES_MASK: i32 = (1 << CATEGORY_COUNT) - 1;

/// Number of distinct sorted 5-dice multisets from {1..6}: C(10,5) = 252.
pub const NUM_OUTCOMES: usize = 252;

/// Number of unique keep-multisets for 0-5 dice from {1..6}: 1+6+21+56+126+252 = 462.
pub const NUM_KEEP_MULTISETS: usize = 462;

/// Position subsets of 5 dice; upper bound on distinct holds per outcome.
pub const MAX_HOLDS_PER_OUTCOME: usize = 32;

/// Total ordered 5-dice rolls: 6^5.
pub const TOTAL_ORDERED_ROLLS: u32 = 7776;

/// Tolerance for every probability-mass check at table construction.
pub const PROBABILITY_TOLERANCE: f64 = 1e-10;

/// Upper-section bonus: 35 points once the six face categories reach 63.
pub const UPPER_BONUS: i32 = 35;
pub const UPPER_BONUS_THRESHOLD: i32 = 63;

/// Fixed-score categories.
pub const FULL_HOUSE_SCORE: i32 = 25;
pub const SMALL_STRAIGHT_SCORE: i32 = 30;
pub const LARGE_STRAIGHT_SCORE: i32 = 40;
pub const YAHTZEE_SCORE: i32 = 50;

/// Bonus for each additional five-of-a-kind once the category holds 50.
pub const YAHTZEE_BONUS: i32 = 100;

pub const CATEGORY_ONES: usize = 0;
pub const CATEGORY_TWOS: usize = 1;
pub const CATEGORY_THREES: usize = 2;
pub const CATEGORY_FOURS: usize = 3;
pub const CATEGORY_FIVES: usize = 4;
pub const CATEGORY_SIXES: usize = 5;
pub const CATEGORY_THREE_OF_A_KIND: usize = 6;
pub const CATEGORY_FOUR_OF_A_KIND: usize = 7;
pub const CATEGORY_FULL_HOUSE: usize = 8;
pub const CATEGORY_SMALL_STRAIGHT: usize = 9;
pub const CATEGORY_LARGE_STRAIGHT: usize = 10;
pub const CATEGORY_YAHTZEE: usize = 11;
pub const CATEGORY_CHANCE: usize = 12;

/// Human-readable category names.
pub const CATEGORY_NAMES: [&str; CATEGORY_COUNT] = [
    "Ones",
    "Twos",
    "Threes",
    "Fours",
    "Fives",
    "Sixes",
    "3 of a Kind",
    "4 of a Kind",
    "Full House",
    "Small Straight",
    "Large Straight",
    "Yahtzee",
    "Chance",
];

/// Test whether category `cat` has been filled (bit `cat` is set).
#[inline(always)]
pub fn is_category_filled(filled: i32, cat: usize) -> bool {
    (filled & (1 << cat)) != 0
}

/// Upper-section categories are indexed by face − 1.
#[inline(always)]
pub fn is_upper_category(cat: usize) -> bool {
    cat < UPPER_CATEGORY_COUNT
}

/// Face value scored by an upper-section category.
#[inline(always)]
pub fn upper_category_face(cat: usize) -> i32 {
    debug_assert!(is_upper_category(cat), "category {} is not upper", cat);
    cat as i32 + 1
}
