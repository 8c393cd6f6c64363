//! Settlement reconciliation: chip counts, final standings, allocation,
//! and result writeback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::errors::{SettlementError, SettlementResult};
use super::models::{EntrantResult, Settlement, SettlementWarning};
use crate::events::{ChangeEvent, EventBus, EventKind};
use crate::payout::{allocate, resolve, validate, Standing};
use crate::store::{
    Entrant, EntrantStatus, RegistrationStore, TournamentId, TournamentStatus, TournamentStore,
};

/// Computes settlements and owns the last computed result per tournament.
///
/// All work is synchronous, pure computation over data pulled from the
/// injected stores; settlement either completes or fails with an error.
/// Re-invoking [`SettlementEngine::settle`] recomputes from scratch and
/// overwrites the prior result — the operator re-running it is the only
/// retry mechanism.
pub struct SettlementEngine {
    registrations: Arc<dyn RegistrationStore>,
    tournaments: Arc<dyn TournamentStore>,
    events: EventBus,
    last: Mutex<HashMap<TournamentId, Settlement>>,
}

impl SettlementEngine {
    /// Create an engine over the given collaborators.
    pub fn new(
        registrations: Arc<dyn RegistrationStore>,
        tournaments: Arc<dyn TournamentStore>,
        events: EventBus,
    ) -> Self {
        Self {
            registrations,
            tournaments,
            events,
            last: Mutex::new(HashMap::new()),
        }
    }

    /// Settle a tournament: reconcile chips, rank the field, allocate the
    /// pool, and write results back.
    pub fn settle(&self, tournament_id: TournamentId) -> SettlementResult<Settlement> {
        let tournament = self.tournaments.tournament(tournament_id)?;
        let model = self.tournaments.payout_model(tournament.payout_model_id)?;

        // The model was validated when saved; a stored model that fails now
        // is a configuration error to surface, not to work around.
        let report = validate(&model);
        if !report.is_valid() {
            return Err(SettlementError::InvalidModel {
                name: model.name.clone(),
                issues: report.into_errors(),
            });
        }

        let all_entrants = self.registrations.entrants(tournament_id)?;
        let field: Vec<&Entrant> = all_entrants
            .iter()
            .filter(|e| matches!(e.status, EntrantStatus::Active | EntrantStatus::Eliminated))
            .collect();
        if field.is_empty() {
            return Err(SettlementError::NoEntrants(tournament_id));
        }

        let mut warnings = Vec::new();

        let chips_in_play: i64 = field.iter().map(|e| e.chip_entitlement(&tournament)).sum();
        let chips_counted: i64 = field
            .iter()
            .map(|e| e.final_chip_count.unwrap_or(0))
            .sum();
        for entrant in &field {
            if entrant.final_chip_count.is_none() {
                warnings.push(SettlementWarning::MissingChipCount {
                    entrant_id: entrant.id,
                });
            }
        }

        let discrepancy = chips_in_play - chips_counted;
        if discrepancy != 0 {
            log::warn!(
                "tournament {} chip discrepancy: {} in play, {} counted",
                tournament_id,
                chips_in_play,
                chips_counted
            );
            warnings.push(SettlementWarning::ChipDiscrepancy {
                amount: discrepancy,
            });
        }

        let ordered = order_standings(&field, &mut warnings);

        // Fees stay with the house; cashed-out entrants' money stays in the
        // pool even though they are out of the standings.
        let total_prize_pool: i64 = all_entrants
            .iter()
            .filter(|e| e.status != EntrantStatus::Reserved)
            .map(|e| e.pool_contribution(&tournament))
            .sum();

        let standings: Vec<Standing> = ordered
            .iter()
            .map(|e| Standing {
                entrant_id: e.id,
                chip_count: e.final_chip_count,
            })
            .collect();

        let resolved = resolve(&model, standings.len() as u32)?;
        let allocation = allocate(&resolved, &standings, total_prize_pool)?;

        let results: Vec<EntrantResult> = standings
            .iter()
            .enumerate()
            .map(|(index, standing)| EntrantResult {
                entrant_id: standing.entrant_id,
                rank: index + 1,
                prize: allocation.award_for_rank(index + 1),
            })
            .collect();

        for result in &results {
            self.registrations
                .write_result(result.entrant_id, result.rank, result.prize)?;
        }
        self.tournaments
            .set_status(tournament_id, TournamentStatus::Finished)?;

        let settlement = Settlement {
            tournament_id,
            total_prize_pool,
            chips_in_play,
            chips_counted,
            discrepancy,
            results,
            warnings,
            settled_at: Utc::now(),
        };

        log::info!(
            "settled tournament {} ('{}'): {} entrants, pool {}, discrepancy {}",
            tournament_id,
            tournament.name,
            settlement.results.len(),
            settlement.total_prize_pool,
            settlement.discrepancy
        );

        self.last_mut()
            .insert(tournament_id, settlement.clone());

        self.events.publish(ChangeEvent::new(
            EventKind::RegistrationUpdated,
            settlement.results.iter().map(|r| r.entrant_id).collect(),
        ));
        self.events.publish(ChangeEvent::new(
            EventKind::TournamentUpdated,
            vec![tournament_id],
        ));

        Ok(settlement)
    }

    /// The last settlement computed for a tournament by this engine.
    pub fn last_settlement(&self, tournament_id: TournamentId) -> Option<Settlement> {
        self.last_mut().get(&tournament_id).cloned()
    }

    fn last_mut(&self) -> MutexGuard<'_, HashMap<TournamentId, Settlement>> {
        self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Order the field into final standings.
///
/// Survivors take the top ranks by descending counted chips (ties broken by
/// entrant id so reruns are deterministic); eliminated entrants follow in
/// their recorded elimination order, earliest elimination last. Eliminated
/// entrants with no recorded rank go last and are flagged.
fn order_standings<'a>(
    field: &[&'a Entrant],
    warnings: &mut Vec<SettlementWarning>,
) -> Vec<&'a Entrant> {
    let mut survivors: Vec<&Entrant> = field
        .iter()
        .copied()
        .filter(|e| e.status == EntrantStatus::Active)
        .collect();
    survivors.sort_by(|a, b| {
        let a_chips = a.final_chip_count.unwrap_or(0);
        let b_chips = b.final_chip_count.unwrap_or(0);
        b_chips.cmp(&a_chips).then_with(|| a.id.cmp(&b.id))
    });

    let mut eliminated: Vec<&Entrant> = field
        .iter()
        .copied()
        .filter(|e| e.status == EntrantStatus::Eliminated && e.rank.is_some())
        .collect();
    eliminated.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));

    let mut unranked: Vec<&Entrant> = field
        .iter()
        .copied()
        .filter(|e| e.status == EntrantStatus::Eliminated && e.rank.is_none())
        .collect();
    unranked.sort_by(|a, b| a.id.cmp(&b.id));
    for entrant in &unranked {
        warnings.push(SettlementWarning::MissingEliminationRank {
            entrant_id: entrant.id,
        });
    }

    survivors
        .into_iter()
        .chain(eliminated)
        .chain(unranked)
        .collect()
}
