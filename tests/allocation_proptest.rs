//! Property-based tests for payout validation and allocation using proptest
//!
//! These tests verify the engine's core guarantees across randomly
//! generated models, fields, and pools: money is conserved, chip-EV is
//! scale-invariant, and the validator rejects malformed tables.

use club_payouts::payout::{
    allocate, resolve, validate, IssueKind, PayoutModel, PayoutRange, Split, Standing,
};
use proptest::prelude::*;
use uuid::Uuid;

// Strategy for a valid percentage table: descending and summing to 100.
fn percentage_table_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..=1_000, 1..=6).prop_map(|mut weights| {
        weights.sort_unstable_by(|a, b| b.cmp(a));
        let total: u32 = weights.iter().sum();
        weights
            .iter()
            .map(|&w| w as f64 / total as f64 * 100.0)
            .collect()
    })
}

fn standings_from(chips: &[i64]) -> Vec<Standing> {
    chips
        .iter()
        .map(|&count| Standing {
            entrant_id: Uuid::new_v4(),
            chip_count: Some(count),
        })
        .collect()
}

proptest! {
    #[test]
    fn test_direct_allocation_conserves_pool(
        percentages in percentage_table_strategy(),
        pool in 0i64..=100_000_000,
        extra_entrants in 0usize..=10,
    ) {
        let places = percentages.len();
        let model = PayoutModel::custom_matrix(
            "Generated",
            vec![PayoutRange::new(1, 200, percentages)],
        );
        prop_assert!(validate(&model).is_valid());

        let field = standings_from(&vec![1_000; places + extra_entrants]);
        let resolved = resolve(&model, field.len() as u32).unwrap();
        let allocation = allocate(&resolved, &field, pool).unwrap();

        prop_assert_eq!(allocation.total(), pool);
    }

    #[test]
    fn test_direct_allocation_is_descending_outside_rank_1(
        percentages in percentage_table_strategy(),
        pool in 0i64..=100_000_000,
    ) {
        // Rank 1 absorbs the residual, so only ranks 2.. are guaranteed
        // to be non-increasing.
        let places = percentages.len();
        let model = PayoutModel::custom_matrix(
            "Generated",
            vec![PayoutRange::new(1, 200, percentages)],
        );
        let field = standings_from(&vec![1_000; places]);
        let resolved = resolve(&model, field.len() as u32).unwrap();
        let allocation = allocate(&resolved, &field, pool).unwrap();

        for pair in allocation.awards[1..].windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_chip_ev_is_scale_invariant(
        chips in prop::collection::vec(0i64..=1_000_000, 1..=9),
        scale in 1i64..=1_000,
        pool in 0i64..=10_000_000,
    ) {
        let places = chips.len();
        let model = PayoutModel::with_splits(
            "Chip only",
            vec![Split::chip_ev("Chip only", 100.0, places)],
        );
        let resolved = resolve(&model, places as u32).unwrap();

        let base = allocate(&resolved, &standings_from(&chips), pool).unwrap();
        let scaled_chips: Vec<i64> = chips.iter().map(|c| c * scale).collect();
        let scaled = allocate(&resolved, &standings_from(&scaled_chips), pool).unwrap();

        prop_assert_eq!(base.awards, scaled.awards);
    }

    #[test]
    fn test_chip_ev_conserves_pool(
        chips in prop::collection::vec(0i64..=1_000_000, 1..=9),
        pool in 0i64..=10_000_000,
    ) {
        let places = chips.len();
        let model = PayoutModel::with_splits(
            "Chip only",
            vec![Split::chip_ev("Chip only", 100.0, places)],
        );
        let resolved = resolve(&model, places as u32).unwrap();
        let allocation = allocate(&resolved, &standings_from(&chips), pool).unwrap();

        prop_assert_eq!(allocation.total(), pool);
    }

    #[test]
    fn test_validator_rejects_ascending_tables(
        percentages in percentage_table_strategy(),
        bump_index in any::<prop::sample::Index>(),
    ) {
        prop_assume!(percentages.len() >= 2);
        let mut broken = percentages;
        let index = bump_index.index(broken.len() - 1);
        broken[index + 1] = broken[index] + 1.0;

        let model = PayoutModel::custom_matrix(
            "Ascending",
            vec![PayoutRange::new(1, 200, broken)],
        );
        let report = validate(&model);
        prop_assert!(!report.is_valid());
        prop_assert!(report.issues.iter().any(|i| i.kind == IssueKind::NotDescending));
    }

    #[test]
    fn test_resolver_total_over_contiguous_bands(
        widths in prop::collection::vec(1u32..=20, 1..=8),
        probe in 0u32..=200,
    ) {
        // Build adjacent bands starting at 2; every field size inside the
        // covered span must resolve, everything outside must not.
        let mut ranges = Vec::new();
        let mut lo = 2u32;
        for width in widths {
            let hi = lo + width - 1;
            ranges.push(PayoutRange::new(lo, hi, vec![100.0]));
            lo = hi + 1;
        }
        let covered_max = lo - 1;
        let model = PayoutModel::custom_matrix("Bands", ranges);
        prop_assert!(validate(&model).is_valid());

        let outcome = resolve(&model, probe);
        if (2..=covered_max).contains(&probe) {
            prop_assert!(outcome.is_ok());
        } else {
            prop_assert!(outcome.is_err());
        }
    }
}
