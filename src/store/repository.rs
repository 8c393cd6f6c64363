//! Collaborator trait definitions for testability and dependency injection.
//!
//! The settlement engine only ever sees these traits; the member directory,
//! seating UI, and other flat-CRUD subsystems live behind them. All
//! operations are synchronous — the engine computes over data already
//! materialized in memory and never awaits.

use super::errors::StoreResult;
use super::models::{Entrant, EntrantId, TournamentId, TournamentRecord, TournamentStatus};
use crate::payout::{PayoutModel, PayoutModelId};

/// Read/write access to entrant registrations.
pub trait RegistrationStore: Send + Sync {
    /// All entrants registered for a tournament, in registration order.
    fn entrants(&self, tournament_id: TournamentId) -> StoreResult<Vec<Entrant>>;

    /// Write a settled rank and prize back onto an entrant.
    fn write_result(&self, entrant_id: EntrantId, rank: usize, prize: i64) -> StoreResult<()>;
}

/// Read access to tournaments and their referenced payout models, plus
/// status writeback.
pub trait TournamentStore: Send + Sync {
    /// Fetch one tournament record.
    fn tournament(&self, id: TournamentId) -> StoreResult<TournamentRecord>;

    /// Fetch a payout model by reference.
    fn payout_model(&self, id: PayoutModelId) -> StoreResult<PayoutModel>;

    /// Transition a tournament's status.
    fn set_status(&self, id: TournamentId, status: TournamentStatus) -> StoreResult<()>;
}
