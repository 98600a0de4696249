//! Core data structures: precomputed context, keep-multiset table, and the
//! game-state view the decision engine reads.
//!
//! The central type is [`YahtzeeContext`], which holds every derived lookup
//! table. It is built once by [`crate::phase0_tables::precompute_lookup_tables`]
//! and then shared immutably (`&YahtzeeContext` or `Arc<YahtzeeContext>`) by
//! any number of concurrent decision requests.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::SolverError;
use crate::game_mechanics::{five_of_a_kind_face, score_in_context, yahtzee_bonus_eligible};

/// Keep-multiset transition table with sparse CSR (Compressed Sparse Row) storage.
///
/// A "keep-multiset" (hold) is the sorted multiset of dice retained before
/// rerolling, stored as a face-frequency vector. Several position subsets of
/// one outcome can produce the same hold (e.g. [1,1,2,3,4] keeping either 1
/// gives {1}); this table collapses those duplicates and stores the reroll
/// distribution P(K→r) once per hold.
///
/// Layout:
/// - `vals[row_start[ki]..row_start[ki+1]]`: probabilities for keep ki
/// - `cols[row_start[ki]..row_start[ki+1]]`: target outcome indices
/// - `unique_keep_ids[ds][0..unique_count[ds]]`: deduplicated keep ids per outcome
pub struct KeepTable {
    /// Face-frequency vector [f1..f6] of every keep id.
    pub keep_freq: Vec<[i32; 6]>,
    /// Number of dice held by every keep id.
    pub keep_size: Vec<i32>,
    /// Frequency key (base 6) → keep id, -1 where unused.
    pub keep_lookup: Vec<i32>,
    /// Sparse probability values for each keep row.
    pub vals: Vec<f64>,
    /// Column indices corresponding to vals entries.
    pub cols: Vec<i32>,
    /// Row boundaries: row_start[ki]..row_start[ki+1] gives range in vals/cols.
    pub row_start: [i32; NUM_KEEP_MULTISETS + 1],
    /// Per outcome: how many distinct holds (empty and full included).
    pub unique_count: [i32; NUM_OUTCOMES],
    /// Keep ids for each distinct hold per outcome, in first-seen subset order.
    pub unique_keep_ids: [[i32; MAX_HOLDS_PER_OUTCOME]; NUM_OUTCOMES],
}

impl Default for KeepTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeepTable {
    pub fn new() -> Self {
        Self {
            keep_freq: Vec::with_capacity(NUM_KEEP_MULTISETS),
            keep_size: Vec::with_capacity(NUM_KEEP_MULTISETS),
            keep_lookup: vec![-1; 46656], // 6^6
            vals: Vec::new(),
            cols: Vec::new(),
            row_start: [0; NUM_KEEP_MULTISETS + 1],
            unique_count: [0; NUM_OUTCOMES],
            unique_keep_ids: [[0; MAX_HOLDS_PER_OUTCOME]; NUM_OUTCOMES],
        }
    }

    /// Base-6 key of a frequency vector (each count is 0..=5).
    #[inline(always)]
    pub fn freq_key(freq: &[i32; 6]) -> usize {
        freq.iter().fold(0, |acc, &f| acc * 6 + f as usize)
    }

    /// Keep id for a frequency vector.
    #[inline]
    pub fn keep_id(&self, freq: &[i32; 6]) -> Option<usize> {
        let kid = self.keep_lookup[Self::freq_key(freq)];
        (kid >= 0).then_some(kid as usize)
    }

    /// Distinct holds of outcome `ds` as keep ids.
    #[inline(always)]
    pub fn holds(&self, ds: usize) -> &[i32] {
        &self.unique_keep_ids[ds][..self.unique_count[ds] as usize]
    }

    /// Transition row for keep `kid`: (probabilities, target outcome indices).
    #[inline(always)]
    pub fn row(&self, kid: usize) -> (&[f64], &[i32]) {
        let start = self.row_start[kid] as usize;
        let end = self.row_start[kid + 1] as usize;
        (&self.vals[start..end], &self.cols[start..end])
    }

    /// Sorted held values of keep `kid`.
    pub fn hold_values(&self, kid: usize) -> Vec<i32> {
        let mut values = Vec::with_capacity(self.keep_size[kid] as usize);
        for (face, &count) in self.keep_freq[kid].iter().enumerate() {
            for _ in 0..count {
                values.push(face as i32 + 1);
            }
        }
        values
    }
}

/// All precomputed tables.
///
/// ~90 KB of arrays plus the keep table; heap-allocate via
/// [`YahtzeeContext::new_boxed`] or [`YahtzeeContext::build`].
///
/// - `all_outcomes` → R_{5,6} (252 sorted 5-dice multisets)
/// - `precomputed_scores` → s(r, c) (context-free score for outcome r in category c)
/// - `outcome_probabilities` → P(⊥ → r) (probability of rolling r from scratch)
/// - `keep_table` → holds per outcome and P(K → r) transition rows
/// - `category_ev` → context-free single-category expected score per turn
pub struct YahtzeeContext {
    /// R_{5,6}: all 252 distinct sorted outcomes, lexicographic order.
    pub all_outcomes: [[i32; 5]; NUM_OUTCOMES],
    /// |R_{5,6}| as enumerated (252 after a successful build).
    pub num_outcomes: usize,
    /// Reverse lookup: sorted dice values -> index in R_{5,6}.
    pub index_lookup: [[[[[u8; 6]; 6]; 6]; 6]; 6],
    /// precomputed_scores[r][c] = s(r, c).
    pub precomputed_scores: [[i32; CATEGORY_COUNT]; NUM_OUTCOMES],
    /// factorial[n] for n in 0..=5.
    pub factorial: [i32; 6],
    /// P(empty -> r): probability of rolling each r from 5 fresh dice.
    pub outcome_probabilities: [f64; NUM_OUTCOMES],
    /// Hold enumeration and transition model.
    pub keep_table: KeepTable,
    /// Expected score of a turn played for one category alone.
    pub category_ev: [f64; CATEGORY_COUNT],
}

impl Default for YahtzeeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl YahtzeeContext {
    pub fn new() -> Self {
        Self {
            all_outcomes: [[0; 5]; NUM_OUTCOMES],
            num_outcomes: 0,
            index_lookup: [[[[[0; 6]; 6]; 6]; 6]; 6],
            precomputed_scores: [[0; CATEGORY_COUNT]; NUM_OUTCOMES],
            factorial: [0; 6],
            outcome_probabilities: [0.0; NUM_OUTCOMES],
            keep_table: KeepTable::new(),
            category_ev: [0.0; CATEGORY_COUNT],
        }
    }

    /// Allocate on the heap directly (avoids stack overflow in debug builds).
    pub fn new_boxed() -> Box<Self> {
        Box::new(Self::new())
    }

    /// Allocate and run every Phase 0 step. Fails on any violated table invariant.
    pub fn build() -> Result<Box<Self>, SolverError> {
        let mut ctx = Self::new_boxed();
        crate::phase0_tables::precompute_lookup_tables(&mut ctx)?;
        Ok(ctx)
    }

    /// Keep id of the empty hold (a fresh roll of all five dice).
    #[inline]
    pub fn empty_keep_id(&self) -> usize {
        self.keep_table.keep_lookup[0] as usize
    }
}

/// One player's scorecard.
///
/// Owned by the game loop; the decision engine only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Score per category, `None` while unfilled.
    pub scores: [Option<i32>; CATEGORY_COUNT],
    /// Repeat five-of-a-kind bonuses earned (100 points each).
    pub yahtzee_bonus_count: i32,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_filled(&self, category: usize) -> bool {
        self.scores[category].is_some()
    }

    #[inline]
    pub fn score(&self, category: usize) -> Option<i32> {
        self.scores[category]
    }

    /// Enter a score; a filled category is left unchanged.
    pub fn set_score(&mut self, category: usize, score: i32) {
        if !self.is_filled(category) {
            self.scores[category] = Some(score);
        }
    }

    /// Bitmask of filled categories (bit `c` set when `c` is filled).
    pub fn filled_mask(&self) -> i32 {
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .fold(0, |mask, (c, _)| mask | (1 << c))
    }

    pub fn is_complete(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }

    /// Running total of the six face categories (uncapped).
    pub fn upper_total(&self) -> i32 {
        self.scores[..UPPER_CATEGORY_COUNT]
            .iter()
            .flatten()
            .sum()
    }

    pub fn upper_bonus(&self) -> i32 {
        if self.upper_total() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    pub fn lower_total(&self) -> i32 {
        self.scores[UPPER_CATEGORY_COUNT..].iter().flatten().sum()
    }

    pub fn grand_total(&self) -> i32 {
        self.upper_total()
            + self.upper_bonus()
            + self.lower_total()
            + self.yahtzee_bonus_count * YAHTZEE_BONUS
    }

    /// Score `dice` into `category` with the joker and repeat-bonus rules
    /// applied. Returns the category score (bonus excluded).
    pub fn record(&mut self, category: usize, dice: &[i32; 5]) -> i32 {
        let score = score_in_context(dice, category, self);
        if five_of_a_kind_face(dice).is_some() && yahtzee_bonus_eligible(self) {
            self.yahtzee_bonus_count += 1;
        }
        self.set_score(category, score);
        score
    }
}

/// Read-only view of the live turn, as exposed by the game loop.
#[derive(Clone, Copy, Debug)]
pub struct TurnView<'a> {
    /// Current face values, in die-position order.
    pub dice: [i32; 5],
    /// Which positions are currently held.
    pub held: [bool; 5],
    /// Rolls taken this turn (0-3).
    pub rolls_used: i32,
    pub scorecard: &'a Scorecard,
}

/// A decision: enter a score, or keep the listed die positions and reroll the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Score { category: usize },
    Reroll { hold: Vec<usize> },
}
