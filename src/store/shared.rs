//! The shared store: one serialized collection per entity kind under a
//! well-known key, shared by every open display on the machine.
//!
//! Every write replaces a whole collection — last-write-wins, with no lock,
//! transaction, or version check. This is an accepted weakness of the
//! deployment model, not a guarantee: the store is the single source of
//! truth and every context re-reads it when a change event arrives.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::errors::{StoreError, StoreResult};
use super::models::{Entrant, EntrantId, TournamentId, TournamentRecord, TournamentStatus};
use super::repository::{RegistrationStore, TournamentStore};
use crate::events::{ChangeEvent, EventBus, EventKind};
use crate::payout::{validate, PayoutModel, PayoutModelId, ValidationReport};

const TOURNAMENTS_KEY: &str = "tournaments";
const REGISTRATIONS_KEY: &str = "registrations";
const PAYOUT_MODELS_KEY: &str = "payout_models";

/// Where the shared store keeps its collections.
#[derive(Debug, Clone, Default)]
pub struct SharedStoreConfig {
    /// Directory holding one `<key>.json` file per entity kind.
    /// `None` keeps all collections in memory (tests, single context).
    pub root: Option<PathBuf>,
}

#[derive(Default)]
struct Collections {
    tournaments: Vec<TournamentRecord>,
    registrations: Vec<Entrant>,
    payout_models: Vec<PayoutModel>,
}

/// The persisted key-value store shared by every open context.
pub struct SharedStore {
    config: SharedStoreConfig,
    cache: Mutex<Collections>,
    events: Option<EventBus>,
}

impl SharedStore {
    /// A store holding its collections in memory only.
    pub fn in_memory() -> Self {
        Self {
            config: SharedStoreConfig::default(),
            cache: Mutex::new(Collections::default()),
            events: None,
        }
    }

    /// Open (or create) a store backed by a directory of collection files.
    ///
    /// With a directory backing, every read loads the collection fresh from
    /// disk so writes from sibling contexts become visible.
    pub fn open(config: SharedStoreConfig) -> StoreResult<Self> {
        if let Some(root) = &config.root {
            std::fs::create_dir_all(root)?;
        }
        Ok(Self {
            config,
            cache: Mutex::new(Collections::default()),
            events: None,
        })
    }

    /// Shorthand for [`SharedStore::open`] with a directory path.
    pub fn at_dir(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(SharedStoreConfig {
            root: Some(root.into()),
        })
    }

    /// Publish a change event after every CRUD write through this handle.
    ///
    /// The settlement engine publishes its own events for the writes it
    /// performs through the collaborator traits.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    fn notify(&self, kind: EventKind, affected: Vec<uuid::Uuid>) {
        if let Some(events) = &self.events {
            events.publish(ChangeEvent::new(kind, affected));
        }
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // A poisoned lock only means another thread panicked mid-write;
        // the collections themselves are always structurally whole.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create or replace a tournament record.
    pub fn put_tournament(&self, tournament: TournamentRecord) -> StoreResult<()> {
        let id = tournament.id;
        self.with_tournaments_mut(|records| {
            upsert(records, tournament, |t| t.id);
            Ok(())
        })?;
        self.notify(EventKind::TournamentUpdated, vec![id]);
        Ok(())
    }

    /// Create or replace an entrant registration.
    pub fn put_entrant(&self, entrant: Entrant) -> StoreResult<()> {
        let id = entrant.id;
        self.with_registrations_mut(|records| {
            upsert(records, entrant, |e| e.id);
            Ok(())
        })?;
        self.notify(EventKind::RegistrationUpdated, vec![id]);
        Ok(())
    }

    /// Create or replace a payout model.
    ///
    /// The model is validated first and refused if the report carries
    /// error-severity issues; the report is returned either way so callers
    /// can surface warnings.
    pub fn put_payout_model(&self, model: PayoutModel) -> StoreResult<ValidationReport> {
        let report = validate(&model);
        if !report.is_valid() {
            return Err(StoreError::InvalidModel {
                issues: report.into_errors(),
            });
        }
        for warning in report.warnings() {
            log::warn!("payout model '{}': {}", model.name, warning.detail);
        }
        let id = model.id;
        self.with_models_mut(|records| {
            upsert(records, model, |m| m.id);
            Ok(())
        })?;
        self.notify(EventKind::StructureUpdated, vec![id]);
        Ok(report)
    }

    /// Delete a payout model.
    pub fn remove_payout_model(&self, id: PayoutModelId) -> StoreResult<()> {
        self.with_models_mut(|records| {
            let before = records.len();
            records.retain(|m| m.id != id);
            if records.len() == before {
                return Err(StoreError::ModelNotFound(id));
            }
            Ok(())
        })?;
        self.notify(EventKind::StructureUpdated, vec![id]);
        Ok(())
    }

    /// All tournaments, freshly read.
    pub fn tournaments(&self) -> StoreResult<Vec<TournamentRecord>> {
        self.read_tournaments()
    }

    /// All payout models, freshly read.
    pub fn payout_models(&self) -> StoreResult<Vec<PayoutModel>> {
        self.read_models()
    }

    /// One entrant by id.
    pub fn entrant(&self, id: EntrantId) -> StoreResult<Entrant> {
        self.read_registrations()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(StoreError::EntrantNotFound(id))
    }

    fn read_tournaments(&self) -> StoreResult<Vec<TournamentRecord>> {
        match &self.config.root {
            Some(root) => load_collection(root, TOURNAMENTS_KEY),
            None => Ok(self.lock().tournaments.clone()),
        }
    }

    fn read_registrations(&self) -> StoreResult<Vec<Entrant>> {
        match &self.config.root {
            Some(root) => load_collection(root, REGISTRATIONS_KEY),
            None => Ok(self.lock().registrations.clone()),
        }
    }

    fn read_models(&self) -> StoreResult<Vec<PayoutModel>> {
        match &self.config.root {
            Some(root) => load_collection(root, PAYOUT_MODELS_KEY),
            None => Ok(self.lock().payout_models.clone()),
        }
    }

    fn with_tournaments_mut<R>(
        &self,
        f: impl FnOnce(&mut Vec<TournamentRecord>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        match &self.config.root {
            Some(root) => {
                let mut records = load_collection(root, TOURNAMENTS_KEY)?;
                let out = f(&mut records)?;
                save_collection(root, TOURNAMENTS_KEY, &records)?;
                Ok(out)
            }
            None => f(&mut self.lock().tournaments),
        }
    }

    fn with_registrations_mut<R>(
        &self,
        f: impl FnOnce(&mut Vec<Entrant>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        match &self.config.root {
            Some(root) => {
                let mut records = load_collection(root, REGISTRATIONS_KEY)?;
                let out = f(&mut records)?;
                save_collection(root, REGISTRATIONS_KEY, &records)?;
                Ok(out)
            }
            None => f(&mut self.lock().registrations),
        }
    }

    fn with_models_mut<R>(
        &self,
        f: impl FnOnce(&mut Vec<PayoutModel>) -> StoreResult<R>,
    ) -> StoreResult<R> {
        match &self.config.root {
            Some(root) => {
                let mut records = load_collection(root, PAYOUT_MODELS_KEY)?;
                let out = f(&mut records)?;
                save_collection(root, PAYOUT_MODELS_KEY, &records)?;
                Ok(out)
            }
            None => f(&mut self.lock().payout_models),
        }
    }
}

impl RegistrationStore for SharedStore {
    fn entrants(&self, tournament_id: TournamentId) -> StoreResult<Vec<Entrant>> {
        let mut entrants: Vec<Entrant> = self
            .read_registrations()?
            .into_iter()
            .filter(|e| e.tournament_id == tournament_id)
            .collect();
        entrants.sort_by(|a, b| a.registered_at.cmp(&b.registered_at).then(a.id.cmp(&b.id)));
        Ok(entrants)
    }

    fn write_result(&self, entrant_id: EntrantId, rank: usize, prize: i64) -> StoreResult<()> {
        self.with_registrations_mut(|records| {
            let entrant = records
                .iter_mut()
                .find(|e| e.id == entrant_id)
                .ok_or(StoreError::EntrantNotFound(entrant_id))?;
            entrant.rank = Some(rank);
            entrant.prize = Some(prize);
            Ok(())
        })
    }
}

impl TournamentStore for SharedStore {
    fn tournament(&self, id: TournamentId) -> StoreResult<TournamentRecord> {
        self.read_tournaments()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::TournamentNotFound(id))
    }

    fn payout_model(&self, id: PayoutModelId) -> StoreResult<PayoutModel> {
        self.read_models()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(StoreError::ModelNotFound(id))
    }

    fn set_status(&self, id: TournamentId, status: TournamentStatus) -> StoreResult<()> {
        self.with_tournaments_mut(|records| {
            let tournament = records
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(StoreError::TournamentNotFound(id))?;
            tournament.status = status;
            if status == TournamentStatus::Finished {
                tournament.finished_at = Some(chrono::Utc::now());
            }
            Ok(())
        })
    }
}

fn upsert<T, K: PartialEq>(records: &mut Vec<T>, record: T, key: impl Fn(&T) -> K) {
    let id = key(&record);
    match records.iter_mut().find(|existing| key(existing) == id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

fn collection_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{key}.json"))
}

fn load_collection<T: DeserializeOwned>(root: &Path, key: &str) -> StoreResult<Vec<T>> {
    match std::fs::read(collection_path(root, key)) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

fn save_collection<T: Serialize>(root: &Path, key: &str, records: &[T]) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    std::fs::write(collection_path(root, key), bytes)?;
    log::debug!("wrote {} record(s) under '{key}'", records.len());
    Ok(())
}
