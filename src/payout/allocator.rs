//! Allocation: turning a resolved payout configuration and final standings
//! into concrete amounts per rank.
//!
//! Amounts are in the smallest currency unit. Rounding is an explicit
//! policy, not incidental float behavior: within a table the residual goes
//! to rank 1, and across splits the residual from carving the pool goes to
//! the first split in authored order, so every successful allocation sums
//! to the pool exactly.

use super::errors::{PayoutError, PayoutResult};
use super::resolver::{ResolvedPayout, ResolvedPlan, ResolvedTable};
use uuid::Uuid;

/// One entrant's position in the final standings, rank 1 first.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub entrant_id: Uuid,
    /// Counted chips at settlement; `None` when never recorded
    pub chip_count: Option<i64>,
}

/// Amounts per rank. `awards[0]` is rank 1's payout.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub awards: Vec<i64>,
}

impl Allocation {
    /// Payout for a 1-indexed rank; ranks outside the paid places get 0.
    pub fn award_for_rank(&self, rank: usize) -> i64 {
        if rank == 0 {
            return 0;
        }
        self.awards.get(rank - 1).copied().unwrap_or(0)
    }

    /// Sum of all awards.
    pub fn total(&self) -> i64 {
        self.awards.iter().sum()
    }
}

/// Allocate `total_pool` across the standings per the resolved configuration.
///
/// A pool of exactly 0 is a valid free-roll and yields all-zero awards;
/// a negative pool is an error. Algorithm-tagged configurations are
/// rejected until a real formula exists.
pub fn allocate(
    resolved: &ResolvedPayout,
    standings: &[Standing],
    total_pool: i64,
) -> PayoutResult<Allocation> {
    if total_pool < 0 {
        return Err(PayoutError::EmptyPool(total_pool));
    }

    match resolved {
        ResolvedPayout::Algorithm(algorithm) => {
            Err(PayoutError::AlgorithmNotImplemented(*algorithm))
        }
        ResolvedPayout::Single(table) => {
            let awards = allocate_direct(table, standings.len(), total_pool)?;
            Ok(Allocation { awards })
        }
        ResolvedPayout::Splits(splits) => {
            // Carve the pool into sub-pools first; the rounding residual
            // lands on the first authored split.
            let mut sub_pools: Vec<i64> = splits
                .iter()
                .map(|split| ((split.percent_of_pool / 100.0) * total_pool as f64).round() as i64)
                .collect();
            let residual = total_pool - sub_pools.iter().sum::<i64>();
            if let Some(first) = sub_pools.first_mut() {
                *first += residual;
            }

            let mut awards = vec![0i64; resolved.places_paid()];
            for (split, sub_pool) in splits.iter().zip(sub_pools) {
                let part = match &split.plan {
                    ResolvedPlan::Direct(table) => {
                        allocate_direct(table, standings.len(), sub_pool)?
                    }
                    ResolvedPlan::ChipEv { places_paid } => {
                        allocate_chip_ev(*places_paid, standings, sub_pool)?
                    }
                };
                for (award, amount) in awards.iter_mut().zip(part) {
                    *award += amount;
                }
            }
            Ok(Allocation { awards })
        }
    }
}

/// Fixed-table path: rank r gets `percentages[r-1]` of the sub-pool,
/// rounded to the smallest currency unit, residual to rank 1.
fn allocate_direct(
    table: &ResolvedTable,
    field_size: usize,
    sub_pool: i64,
) -> PayoutResult<Vec<i64>> {
    if table.places_paid > field_size {
        return Err(PayoutError::InsufficientEntrants {
            needed: table.places_paid,
            have: field_size,
        });
    }

    let mut amounts: Vec<i64> = table
        .percentages
        .iter()
        .map(|pct| ((pct / 100.0) * sub_pool as f64).round() as i64)
        .collect();
    let residual = sub_pool - amounts.iter().sum::<i64>();
    if let Some(first) = amounts.first_mut() {
        *first += residual;
    }
    Ok(amounts)
}

/// Chip-proportional path over the top `places_paid` finishers.
///
/// Shares are computed in integer arithmetic so that scaling every chip
/// count by the same constant cannot change the amounts. A payee with zero
/// or unrecorded chips receives 0 and its share flows to the remaining
/// payees; if no payee has chips at all, the sub-pool is divided equally.
fn allocate_chip_ev(
    places_paid: usize,
    standings: &[Standing],
    sub_pool: i64,
) -> PayoutResult<Vec<i64>> {
    if places_paid > standings.len() {
        return Err(PayoutError::InsufficientEntrants {
            needed: places_paid,
            have: standings.len(),
        });
    }

    let payees = &standings[..places_paid];
    let chips: Vec<i64> = payees
        .iter()
        .map(|s| s.chip_count.unwrap_or(0).max(0))
        .collect();
    let total_chips: i64 = chips.iter().sum();

    let mut amounts = if total_chips == 0 {
        // No chips counted for any payee: divide equally rather than drop
        // the sub-pool.
        let base = sub_pool / places_paid as i64;
        vec![base; places_paid]
    } else {
        chips
            .iter()
            .map(|&count| proportional_share(sub_pool, count, total_chips))
            .collect()
    };

    let residual = sub_pool - amounts.iter().sum::<i64>();
    // The residual goes to the best-ranked payee that actually holds chips,
    // so a zero-chip payee still receives exactly 0.
    let target = chips.iter().position(|&c| c > 0).unwrap_or(0);
    if let Some(amount) = amounts.get_mut(target) {
        *amount += residual;
    }
    Ok(amounts)
}

/// `sub_pool * numerator / denominator`, rounded half-up, without
/// intermediate overflow.
fn proportional_share(sub_pool: i64, numerator: i64, denominator: i64) -> i64 {
    let scaled = sub_pool as i128 * numerator as i128;
    ((2 * scaled + denominator as i128) / (2 * denominator as i128)) as i64
}
