//! Settlement error types.

use crate::payout::{PayoutError, ValidationIssue};
use crate::store::{StoreError, TournamentId};
use thiserror::Error;

/// Settlement errors. Resolution and configuration failures block
/// settlement and leave the tournament in progress; they are surfaced to
/// the operator, never retried automatically.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// No Active or Eliminated entrants to settle
    #[error("tournament {0} has no entrants to settle")]
    NoEntrants(TournamentId),

    /// The stored payout model no longer passes validation
    #[error("stored payout model '{}' is invalid ({} error(s))", .name, .issues.len())]
    InvalidModel {
        name: String,
        issues: Vec<ValidationIssue>,
    },

    /// Resolution or allocation failed
    #[error(transparent)]
    Payout(#[from] PayoutError),

    /// The shared store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for settlement operations
pub type SettlementResult<T> = Result<T, SettlementError>;
