//! Shared persistence: entity records, collaborator traits, and the
//! last-write-wins store every open display reads from.
//!
//! The engine never talks to a server. Each entity kind lives as one
//! serialized collection under a well-known key; every open context (admin
//! console, clock display, floor terminal) reads and rewrites whole
//! collections. Change events on the notification channel are invalidation
//! hints only — ground truth is always re-read from here.

pub mod errors;
pub mod models;
pub mod repository;
pub mod shared;

pub use errors::{StoreError, StoreResult};
pub use models::{
    quick_tournament, Entrant, EntrantId, EntrantStatus, TournamentId, TournamentRecord,
    TournamentStatus,
};
pub use repository::{RegistrationStore, TournamentStore};
pub use shared::{SharedStore, SharedStoreConfig};
