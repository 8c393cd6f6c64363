//! Change event data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of record set changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Entrant registrations changed (registration, elimination, results)
    RegistrationUpdated,
    /// A tournament record changed (status, settlement)
    TournamentUpdated,
    /// A payout model was created, edited, or removed
    StructureUpdated,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::RegistrationUpdated => write!(f, "REGISTRATION_UPDATED"),
            EventKind::TournamentUpdated => write!(f, "TOURNAMENT_UPDATED"),
            EventKind::StructureUpdated => write!(f, "STRUCTURE_UPDATED"),
        }
    }
}

/// A typed change notification published after a state-changing write.
///
/// The payload is minimal on purpose: receivers must treat an event purely
/// as an invalidation signal and re-read ground truth from the store, never
/// trust the payload as authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: EventKind,
    /// Ids of the affected record(s)
    pub affected: Vec<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind, affected: Vec<Uuid>) -> Self {
        Self {
            kind,
            affected,
            timestamp: Utc::now(),
        }
    }
}
