//! Settlement data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{EntrantId, TournamentId};

/// One entrant's settled outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantResult {
    pub entrant_id: EntrantId,
    /// Final rank, 1 = winner
    pub rank: usize,
    /// Prize in the smallest currency unit; 0 outside the paid places
    pub prize: i64,
}

/// Non-fatal findings attached to a settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SettlementWarning {
    /// Chips counted at the tables differ from chips nominally in play
    ChipDiscrepancy { amount: i64 },
    /// An entrant had no recorded final chip count; treated as zero
    MissingChipCount { entrant_id: EntrantId },
    /// An eliminated entrant had no recorded elimination rank
    MissingEliminationRank { entrant_id: EntrantId },
}

impl std::fmt::Display for SettlementWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementWarning::ChipDiscrepancy { amount } => {
                write!(f, "chip count discrepancy of {amount}")
            }
            SettlementWarning::MissingChipCount { entrant_id } => {
                write!(f, "entrant {entrant_id} has no recorded chip count")
            }
            SettlementWarning::MissingEliminationRank { entrant_id } => {
                write!(f, "eliminated entrant {entrant_id} has no recorded rank")
            }
        }
    }
}

/// The final, persisted outcome of reconciling one tournament.
///
/// Created and exclusively written by the settlement reconciler; consumed by
/// presentation layers. Recomputation overwrites the prior result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub tournament_id: TournamentId,
    /// Payable pool: buy-ins and rebuys, fees excluded
    pub total_prize_pool: i64,
    /// Chips nominally in play from buy-ins and rebuys
    pub chips_in_play: i64,
    /// Chips actually counted at settlement time
    pub chips_counted: i64,
    /// `chips_in_play - chips_counted`; non-zero is a warning, not a failure
    pub discrepancy: i64,
    /// Per-entrant outcomes in final rank order
    pub results: Vec<EntrantResult>,
    pub warnings: Vec<SettlementWarning>,
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    /// Look up one entrant's settled outcome.
    pub fn result_for(&self, entrant_id: EntrantId) -> Option<&EntrantResult> {
        self.results.iter().find(|r| r.entrant_id == entrant_id)
    }

    /// Whether the reconciliation found anything an operator should look at.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
