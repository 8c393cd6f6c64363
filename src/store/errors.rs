//! Store error types.

use super::models::{EntrantId, TournamentId};
use crate::payout::{PayoutModelId, ValidationIssue};
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A collection file holds unreadable data
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Tournament not found
    #[error("tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// Entrant not found
    #[error("entrant not found: {0}")]
    EntrantNotFound(EntrantId),

    /// Payout model not found
    #[error("payout model not found: {0}")]
    ModelNotFound(PayoutModelId),

    /// Model rejected at save time; warnings alone do not block
    #[error("payout model failed validation with {} error(s)", .issues.len())]
    InvalidModel { issues: Vec<ValidationIssue> },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
