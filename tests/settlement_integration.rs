//! Integration tests for settlement.
//!
//! These tests run the full path — store, resolver, allocator, reconciler,
//! writeback, events — over a shared store the way open displays would.

use std::sync::{Arc, Mutex};

use club_payouts::events::{EventBus, EventKind};
use club_payouts::payout::{
    PayoutError, PayoutModel, PayoutModelId, PayoutRange, Split, ValidationIssue,
};
use club_payouts::settlement::{SettlementEngine, SettlementError, SettlementWarning};
use club_payouts::store::{
    Entrant, EntrantId, RegistrationStore, SharedStore, StoreResult, TournamentId,
    TournamentRecord, TournamentStatus, TournamentStore,
};

fn standard_model() -> PayoutModel {
    PayoutModel::custom_matrix("Standard", vec![PayoutRange::new(2, 8, vec![70.0, 30.0])])
}

fn engine_over(store: &Arc<SharedStore>) -> SettlementEngine {
    SettlementEngine::new(store.clone(), store.clone(), EventBus::new())
}

fn add_survivor(store: &SharedStore, tournament: &TournamentRecord, name: &str, chips: i64) -> Entrant {
    let mut entrant = Entrant::new(tournament.id, name);
    entrant.activate();
    entrant.final_chip_count = Some(chips);
    store.put_entrant(entrant.clone()).unwrap();
    entrant
}

fn add_eliminated(store: &SharedStore, tournament: &TournamentRecord, name: &str, rank: usize) -> Entrant {
    let mut entrant = Entrant::new(tournament.id, name);
    entrant.activate();
    entrant.eliminate(rank);
    store.put_entrant(entrant.clone()).unwrap();
    entrant
}

#[test]
fn test_settle_single_range_model() {
    // Scenario: one range [2..8] paying 70/30, five entrants, pool 1000.
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();

    let tournament = TournamentRecord::new("Friday SNG", model.id, 200, 20, 20_000);
    store.put_tournament(tournament.clone()).unwrap();

    let chips = [40_000, 30_000, 15_000, 10_000, 5_000];
    let entrants: Vec<Entrant> = chips
        .iter()
        .enumerate()
        .map(|(i, &c)| add_survivor(&store, &tournament, &format!("player{i}"), c))
        .collect();

    let engine = engine_over(&store);
    let settlement = engine.settle(tournament.id).unwrap();

    // Fee of 20 per entry stays with the house.
    assert_eq!(settlement.total_prize_pool, 1_000);
    assert_eq!(settlement.results.len(), 5);
    assert_eq!(settlement.results[0].entrant_id, entrants[0].id);
    assert_eq!(settlement.results[0].prize, 700);
    assert_eq!(settlement.results[1].prize, 300);
    assert!(settlement.results[2..].iter().all(|r| r.prize == 0));

    // Results are written back to the store, not just returned.
    let stored = store.entrant(entrants[0].id).unwrap();
    assert_eq!(stored.rank, Some(1));
    assert_eq!(stored.prize, Some(700));
    assert_eq!(
        store.tournament(tournament.id).unwrap().status,
        TournamentStatus::Finished
    );
}

#[test]
fn test_settle_no_applicable_range() {
    // Scenario: same model, fifty entrants — outside every band.
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Big field", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();

    for i in 0..50 {
        add_survivor(&store, &tournament, &format!("player{i}"), 1_000);
    }

    let engine = engine_over(&store);
    match engine.settle(tournament.id) {
        Err(SettlementError::Payout(PayoutError::NoApplicableRange { entrant_count: 50 })) => {}
        other => panic!("expected NoApplicableRange for 50 entrants, got {other:?}"),
    }
    // Settlement blocked: the tournament stays in progress.
    assert_ne!(
        store.tournament(tournament.id).unwrap().status,
        TournamentStatus::Finished
    );
}

#[test]
fn test_settle_chip_ev_split() {
    // Scenario: chip-EV over three places, pool 300, stacks 500/300/200.
    let store = Arc::new(SharedStore::in_memory());
    let model = PayoutModel::with_splits("Chip count", vec![Split::chip_ev("Chip count", 100.0, 3)]);
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Chip race", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();

    add_survivor(&store, &tournament, "alice", 500);
    add_survivor(&store, &tournament, "bob", 300);
    add_survivor(&store, &tournament, "carol", 200);

    let settlement = engine_over(&store).settle(tournament.id).unwrap();
    let prizes: Vec<i64> = settlement.results.iter().map(|r| r.prize).collect();
    assert_eq!(prizes, vec![150, 90, 60]);
}

#[test]
fn test_settle_reports_discrepancy_and_still_pays() {
    // Scenario: 100_000 chips in play, 99_500 counted.
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Short count", model.id, 200, 0, 20_000);
    store.put_tournament(tournament.clone()).unwrap();

    let chips = [40_000, 30_000, 15_000, 10_000, 4_500];
    for (i, &c) in chips.iter().enumerate() {
        add_survivor(&store, &tournament, &format!("player{i}"), c);
    }

    let settlement = engine_over(&store).settle(tournament.id).unwrap();
    assert_eq!(settlement.chips_in_play, 100_000);
    assert_eq!(settlement.chips_counted, 99_500);
    assert_eq!(settlement.discrepancy, 500);
    assert!(settlement
        .warnings
        .iter()
        .any(|w| matches!(w, SettlementWarning::ChipDiscrepancy { amount: 500 })));
    // The warning does not block payouts.
    assert_eq!(settlement.results[0].prize, 700);
}

#[test]
fn test_settle_is_idempotent() {
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Rerun", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();

    add_survivor(&store, &tournament, "alice", 9_000);
    add_survivor(&store, &tournament, "bob", 6_000);
    add_eliminated(&store, &tournament, "carol", 3);

    let engine = engine_over(&store);
    let first = engine.settle(tournament.id).unwrap();
    let second = engine.settle(tournament.id).unwrap();

    assert_eq!(first.results, second.results);
    assert_eq!(first.total_prize_pool, second.total_prize_pool);
    assert_eq!(first.discrepancy, second.discrepancy);
    assert_eq!(first.warnings, second.warnings);

    // The engine's read accessor returns the latest run.
    let last = engine.last_settlement(tournament.id).unwrap();
    assert_eq!(last.results, second.results);
}

#[test]
fn test_resettle_after_correction_keeps_elimination_ranks() {
    // Scenario: correcting one survivor's chip count moves only derived
    // ranks; recorded elimination ranks stay fixed.
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Correction", model.id, 100, 0, 10_000);
    store.put_tournament(tournament.clone()).unwrap();

    let a = add_survivor(&store, &tournament, "a", 40_000);
    let _b = add_survivor(&store, &tournament, "b", 30_000);
    let _c = add_survivor(&store, &tournament, "c", 20_000);
    let d = add_survivor(&store, &tournament, "d", 10_000);
    let fifth = add_eliminated(&store, &tournament, "e", 5);
    let sixth = add_eliminated(&store, &tournament, "f", 6);

    let engine = engine_over(&store);
    let before = engine.settle(tournament.id).unwrap();
    assert_eq!(before.result_for(d.id).unwrap().rank, 4);
    assert_eq!(before.result_for(fifth.id).unwrap().rank, 5);

    // The floor miscounted d's bag; correct it and re-run.
    let mut corrected = store.entrant(d.id).unwrap();
    corrected.final_chip_count = Some(35_000);
    store.put_entrant(corrected).unwrap();

    let after = engine.settle(tournament.id).unwrap();
    assert_eq!(after.result_for(d.id).unwrap().rank, 2);
    assert_eq!(after.result_for(d.id).unwrap().prize, 180); // 30% of 600
    assert_eq!(after.result_for(a.id).unwrap().rank, 1);
    assert_eq!(after.result_for(fifth.id).unwrap(), before.result_for(fifth.id).unwrap());
    assert_eq!(after.result_for(sixth.id).unwrap(), before.result_for(sixth.id).unwrap());
}

#[test]
fn test_settlement_publishes_invalidation_events() {
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Evented", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();
    add_survivor(&store, &tournament, "alice", 8_000);
    add_survivor(&store, &tournament, "bob", 2_000);

    let bus = EventBus::new();
    let mut display = bus.subscribe();
    let engine = SettlementEngine::new(store.clone(), store.clone(), bus.clone());
    engine.settle(tournament.id).unwrap();

    let events = display.drain();
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&EventKind::RegistrationUpdated));
    assert!(kinds.contains(&EventKind::TournamentUpdated));

    // A display treats the event as an invalidation hint and re-reads the
    // store for ground truth rather than trusting the payload.
    let tournament_event = events
        .iter()
        .find(|e| e.kind == EventKind::TournamentUpdated)
        .unwrap();
    let refreshed = store.tournament(tournament_event.affected[0]).unwrap();
    assert_eq!(refreshed.status, TournamentStatus::Finished);
}

#[test]
fn test_free_roll_settles_with_zero_prizes() {
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Freeroll", model.id, 0, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();
    add_survivor(&store, &tournament, "alice", 6_000);
    add_survivor(&store, &tournament, "bob", 4_000);

    let settlement = engine_over(&store).settle(tournament.id).unwrap();
    assert_eq!(settlement.total_prize_pool, 0);
    assert!(settlement.results.iter().all(|r| r.prize == 0));
    assert_eq!(settlement.results.len(), 2);
}

#[test]
fn test_settle_insufficient_entrants() {
    let store = Arc::new(SharedStore::in_memory());
    let model = PayoutModel::custom_matrix(
        "Three places",
        vec![PayoutRange::new(1, 10, vec![50.0, 30.0, 20.0])],
    );
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Tiny field", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();
    add_survivor(&store, &tournament, "alice", 6_000);
    add_survivor(&store, &tournament, "bob", 4_000);

    match engine_over(&store).settle(tournament.id) {
        Err(SettlementError::Payout(PayoutError::InsufficientEntrants { needed: 3, have: 2 })) => {}
        other => panic!("expected InsufficientEntrants, got {other:?}"),
    }
}

#[test]
fn test_missing_chip_count_flagged_not_fatal() {
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Lost bag", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();

    add_survivor(&store, &tournament, "alice", 9_000);
    let mut unbagged = Entrant::new(tournament.id, "bob");
    unbagged.activate();
    store.put_entrant(unbagged.clone()).unwrap();

    let settlement = engine_over(&store).settle(tournament.id).unwrap();
    assert!(settlement
        .warnings
        .iter()
        .any(|w| matches!(w, SettlementWarning::MissingChipCount { entrant_id } if *entrant_id == unbagged.id)));
    // Treated as zero chips: ranked last among survivors.
    assert_eq!(settlement.result_for(unbagged.id).unwrap().rank, 2);
}

#[test]
fn test_reserved_and_cashed_out_entrants() {
    // Reserved seats contribute nothing; a cash-out leaves the standings
    // but its buy-in stays in the pool.
    let store = Arc::new(SharedStore::in_memory());
    let model = standard_model();
    store.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Mixed field", model.id, 100, 0, 5_000);
    store.put_tournament(tournament.clone()).unwrap();

    add_survivor(&store, &tournament, "alice", 9_000);
    add_survivor(&store, &tournament, "bob", 1_000);
    store.put_entrant(Entrant::new(tournament.id, "no-show")).unwrap();
    let mut quitter = Entrant::new(tournament.id, "quitter");
    quitter.activate();
    quitter.cash_out();
    store.put_entrant(quitter.clone()).unwrap();

    let settlement = engine_over(&store).settle(tournament.id).unwrap();
    assert_eq!(settlement.total_prize_pool, 300);
    assert_eq!(settlement.results.len(), 2);
    assert!(settlement.result_for(quitter.id).is_none());
}

#[test]
fn test_two_displays_share_settlement_through_disk() {
    let root = std::env::temp_dir().join(format!("club_payouts_it_{}", uuid::Uuid::new_v4()));
    let admin = Arc::new(SharedStore::at_dir(&root).unwrap());
    let clock = Arc::new(SharedStore::at_dir(&root).unwrap());

    let model = standard_model();
    admin.put_payout_model(model.clone()).unwrap();
    let tournament = TournamentRecord::new("Two displays", model.id, 100, 0, 5_000);
    admin.put_tournament(tournament.clone()).unwrap();
    let winner = add_survivor(&admin, &tournament, "alice", 7_000);
    add_survivor(&admin, &tournament, "bob", 3_000);

    engine_over(&admin).settle(tournament.id).unwrap();

    // The clock display re-reads ground truth and sees the settled state.
    assert_eq!(
        clock.tournament(tournament.id).unwrap().status,
        TournamentStatus::Finished
    );
    assert_eq!(clock.entrant(winner.id).unwrap().prize, Some(140));

    std::fs::remove_dir_all(&root).ok();
}

/// A tournament store that hands out a model which would never pass
/// validation, simulating a record corrupted behind the validator's back.
struct CorruptedStore {
    tournament: TournamentRecord,
    model: PayoutModel,
    entrants: Mutex<Vec<Entrant>>,
}

impl RegistrationStore for CorruptedStore {
    fn entrants(&self, _tournament_id: TournamentId) -> StoreResult<Vec<Entrant>> {
        Ok(self.entrants.lock().unwrap().clone())
    }

    fn write_result(&self, entrant_id: EntrantId, rank: usize, prize: i64) -> StoreResult<()> {
        let mut entrants = self.entrants.lock().unwrap();
        if let Some(entrant) = entrants.iter_mut().find(|e| e.id == entrant_id) {
            entrant.rank = Some(rank);
            entrant.prize = Some(prize);
        }
        Ok(())
    }
}

impl TournamentStore for CorruptedStore {
    fn tournament(&self, _id: TournamentId) -> StoreResult<TournamentRecord> {
        Ok(self.tournament.clone())
    }

    fn payout_model(&self, _id: PayoutModelId) -> StoreResult<PayoutModel> {
        Ok(self.model.clone())
    }

    fn set_status(&self, _id: TournamentId, _status: TournamentStatus) -> StoreResult<()> {
        Ok(())
    }
}

#[test]
fn test_invalid_stored_model_is_fatal() {
    let model = PayoutModel::custom_matrix("Broken", vec![PayoutRange::new(2, 8, vec![60.0, 30.0])]);
    let tournament = TournamentRecord::new("Corrupted", model.id, 100, 0, 5_000);
    let mut entrant = Entrant::new(tournament.id, "alice");
    entrant.activate();
    entrant.final_chip_count = Some(5_000);

    let store = Arc::new(CorruptedStore {
        tournament: tournament.clone(),
        model,
        entrants: Mutex::new(vec![entrant]),
    });

    let engine = SettlementEngine::new(store.clone(), store.clone(), EventBus::new());
    match engine.settle(tournament.id) {
        Err(SettlementError::InvalidModel { name, issues }) => {
            assert_eq!(name, "Broken");
            let _: &Vec<ValidationIssue> = &issues;
            assert!(!issues.is_empty());
        }
        other => panic!("expected InvalidModel, got {other:?}"),
    }
}
