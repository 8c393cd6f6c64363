//! Entity records shared between displays: tournaments and registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_STARTING_STACK;
use crate::payout::PayoutModelId;

/// Tournament ID type
pub type TournamentId = Uuid;

/// Entrant ID type
pub type EntrantId = Uuid;

/// Tournament lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    /// Accepting registrations
    Registering,
    /// Tournament in progress
    Running,
    /// Settled and paid
    Finished,
    /// Tournament cancelled
    Cancelled,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Registering => write!(f, "registering"),
            TournamentStatus::Running => write!(f, "running"),
            TournamentStatus::Finished => write!(f, "finished"),
            TournamentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Entrant lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrantStatus {
    /// Seat held, buy-in not collected
    Reserved,
    /// Playing
    Active,
    /// Busted out; elimination rank recorded
    Eliminated,
    /// Left before the end; buy-in stays in the pool
    CashedOut,
}

impl std::fmt::Display for EntrantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntrantStatus::Reserved => write!(f, "reserved"),
            EntrantStatus::Active => write!(f, "active"),
            EntrantStatus::Eliminated => write!(f, "eliminated"),
            EntrantStatus::CashedOut => write!(f, "cashed_out"),
        }
    }
}

/// One tournament record as persisted in the shared store.
///
/// Money fields are in the smallest currency unit. `buy_in` and `rebuy_cost`
/// go to the prize pool; `fee` is the house's cut per entry and never enters
/// the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    /// Referenced payout model; models are referenced, never copied
    pub payout_model_id: PayoutModelId,
    /// Pool contribution per buy-in
    pub buy_in: i64,
    /// House fee per entry, excluded from the payable pool
    pub fee: i64,
    /// Pool contribution per rebuy
    pub rebuy_cost: i64,
    /// Chips handed out per buy-in
    pub starting_stack: i64,
    /// Chips handed out per rebuy
    pub rebuy_stack: i64,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl TournamentRecord {
    /// Create a tournament with no rebuys.
    pub fn new(
        name: impl Into<String>,
        payout_model_id: PayoutModelId,
        buy_in: i64,
        fee: i64,
        starting_stack: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: TournamentStatus::Registering,
            payout_model_id,
            buy_in,
            fee,
            rebuy_cost: 0,
            starting_stack,
            rebuy_stack: 0,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Enable rebuys at the given cost and stack.
    pub fn with_rebuys(mut self, rebuy_cost: i64, rebuy_stack: i64) -> Self {
        self.rebuy_cost = rebuy_cost;
        self.rebuy_stack = rebuy_stack;
        self
    }
}

/// One entrant's registration in one tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: EntrantId,
    pub tournament_id: TournamentId,
    pub display_name: String,
    pub status: EntrantStatus,
    /// Number of rebuys taken
    pub rebuys: u32,
    /// Counted chips at elimination, or at tournament end for survivors
    pub final_chip_count: Option<i64>,
    /// Elimination rank while playing out; final rank after settlement
    pub rank: Option<usize>,
    /// Prize amount, set by settlement
    pub prize: Option<i64>,
    pub registered_at: DateTime<Utc>,
}

impl Entrant {
    /// Register an entrant; the seat is held until the buy-in is collected.
    pub fn new(tournament_id: TournamentId, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            display_name: display_name.into(),
            status: EntrantStatus::Reserved,
            rebuys: 0,
            final_chip_count: None,
            rank: None,
            prize: None,
            registered_at: Utc::now(),
        }
    }

    /// Buy-in collected; entrant is playing.
    pub fn activate(&mut self) {
        self.status = EntrantStatus::Active;
    }

    /// Record a bust-out with its elimination rank.
    pub fn eliminate(&mut self, rank: usize) {
        self.status = EntrantStatus::Eliminated;
        self.rank = Some(rank);
        self.final_chip_count = Some(0);
    }

    /// Entrant leaves before the end; their buy-in stays in the pool.
    pub fn cash_out(&mut self) {
        self.status = EntrantStatus::CashedOut;
    }

    /// Chips this entrant put into play: starting stack plus rebuy stacks.
    pub fn chip_entitlement(&self, tournament: &TournamentRecord) -> i64 {
        tournament.starting_stack + self.rebuys as i64 * tournament.rebuy_stack
    }

    /// Money this entrant contributed to the payable pool. Fees are the
    /// house's and never enter the pool.
    pub fn pool_contribution(&self, tournament: &TournamentRecord) -> i64 {
        tournament.buy_in + self.rebuys as i64 * tournament.rebuy_cost
    }
}

/// Default tournament for quick club games: no fee, no rebuys.
pub fn quick_tournament(name: impl Into<String>, payout_model_id: PayoutModelId, buy_in: i64) -> TournamentRecord {
    TournamentRecord::new(name, payout_model_id, buy_in, 0, DEFAULT_STARTING_STACK)
}
