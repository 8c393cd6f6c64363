//! # Club Payouts
//!
//! A payout and settlement engine for live club poker tournaments.
//!
//! Several independently running displays (admin console, on-table clock,
//! spectator board) share no server: they agree through a shared
//! last-write-wins store and a lossy broadcast channel. This crate owns the
//! one subsystem with real invariants — deciding who gets paid how much
//! when a tournament ends — and keeps that computation consistent across
//! those displays.
//!
//! ## Architecture
//!
//! Data flows through five pieces, leaves first:
//!
//! - **Validator**: structural checks on authored payout models, run on
//!   every create/edit
//! - **Resolver**: picks the percentage table applicable to a final field
//!   size
//! - **Allocator**: turns a resolved configuration plus standings into
//!   exact amounts per rank (rounding residual to rank 1, never lost)
//! - **Reconciler**: reconciles chip counts, orders standings, allocates
//!   the pool, and writes results back
//! - **Events**: best-effort change notifications other displays treat as
//!   cache-invalidation hints
//!
//! ## Core Modules
//!
//! - [`payout`]: payout model types, validation, resolution, allocation
//! - [`settlement`]: the settlement reconciler and settlement record
//! - [`store`]: collaborator traits and the shared store
//! - [`events`]: the session-local notification channel
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use club_payouts::events::EventBus;
//! use club_payouts::payout::{PayoutModel, PayoutRange};
//! use club_payouts::settlement::SettlementEngine;
//! use club_payouts::store::{Entrant, SharedStore, TournamentRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SharedStore::in_memory());
//!
//! let model = PayoutModel::custom_matrix(
//!     "Winner takes all",
//!     vec![PayoutRange::new(2, 9, vec![100.0])],
//! );
//! store.put_payout_model(model.clone())?;
//!
//! let tournament = TournamentRecord::new("Friday night", model.id, 100, 0, 5_000);
//! store.put_tournament(tournament.clone())?;
//!
//! for (name, chips) in [("alice", 7_000), ("bob", 3_000)] {
//!     let mut entrant = Entrant::new(tournament.id, name);
//!     entrant.activate();
//!     entrant.final_chip_count = Some(chips);
//!     store.put_entrant(entrant)?;
//! }
//!
//! let engine = SettlementEngine::new(store.clone(), store.clone(), EventBus::new());
//! let settlement = engine.settle(tournament.id)?;
//! assert_eq!(settlement.total_prize_pool, 200);
//! assert_eq!(settlement.results[0].prize, 200);
//! # Ok(())
//! # }
//! ```

/// Engine-wide constants and defaults.
pub mod constants;

/// Change propagation between open displays.
pub mod events;
pub use events::{ChangeEvent, EventBus, EventKind, EventSubscriber};

/// Payout model domain: validation, resolution, allocation.
pub mod payout;
pub use payout::{
    allocate, resolve, validate, Allocation, PayoutError, PayoutModel, PayoutRange, Split,
    Standing, ValidationReport,
};

/// Settlement reconciliation.
pub mod settlement;
pub use settlement::{Settlement, SettlementEngine, SettlementError, SettlementWarning};

/// Shared persistence and collaborator traits.
pub mod store;
pub use store::{
    Entrant, EntrantStatus, RegistrationStore, SharedStore, SharedStoreConfig, TournamentRecord,
    TournamentStatus, TournamentStore,
};
