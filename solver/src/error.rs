//! Error types for table construction and decision requests.

use thiserror::Error;

/// Errors raised while building the lookup tables or answering a decision.
///
/// The first three variants are construction-time invariant violations and
/// are fatal: a context that fails to build must not be used. The rest are
/// precondition violations by the caller of [`crate::decision::decide`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The outcome enumeration did not produce C(10,5) entries.
    #[error("enumerated {actual} outcomes, expected {expected}")]
    OutcomeCount { expected: usize, actual: usize },

    /// Outcome probabilities do not sum to 1.
    #[error("outcome probabilities sum to {sum}, expected 1")]
    ProbabilityMass { sum: f64 },

    /// A hold's transition row does not sum to 1.
    #[error("transition for hold {hold:?} sums to {sum}, expected 1")]
    TransitionMass { hold: Vec<i32>, sum: f64 },

    /// Every category is already filled.
    #[error("no unfilled categories remain")]
    ScorecardComplete,

    /// The engine only runs after the mandatory first roll.
    #[error("rolls used must be in 1..=3, got {0}")]
    InvalidRollsUsed(i32),

    /// A die value outside 1..=6.
    #[error("die value {0} out of range 1..=6")]
    InvalidDie(i32),

    /// A strategy produced an action the game cannot apply.
    #[error("illegal action from {strategy}: {reason}")]
    IllegalAction { strategy: String, reason: String },
}
