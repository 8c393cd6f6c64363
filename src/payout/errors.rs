//! Payout error types.

use super::models::PayoutAlgorithm;
use thiserror::Error;

/// Payout resolution and allocation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayoutError {
    /// No authored range covers the final field size
    #[error("no payout range covers a field of {entrant_count} entrants")]
    NoApplicableRange { entrant_count: u32 },

    /// The configuration pays more places than there are entrants
    #[error("payout pays {needed} places but only {have} entrants are standing")]
    InsufficientEntrants { needed: usize, have: usize },

    /// Negative prize pool; a pool of exactly 0 is a valid free-roll
    #[error("prize pool is negative: {0}")]
    EmptyPool(i64),

    /// Algorithm-tagged models carry no implemented formula
    #[error("payout algorithm {0} has no implemented formula")]
    AlgorithmNotImplemented(PayoutAlgorithm),
}

/// Result type for payout operations
pub type PayoutResult<T> = Result<T, PayoutError>;
