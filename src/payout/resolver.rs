//! Range resolution: picking the applicable payout configuration for a
//! final field size.

use super::errors::{PayoutError, PayoutResult};
use super::models::{PayoutAlgorithm, PayoutModel, PayoutModelKind, PayoutRange, SplitRule};

/// A percentage table selected for a concrete field size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub places_paid: usize,
    pub percentages: Vec<f64>,
}

/// One split's resolved allocation plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSplit {
    pub name: String,
    pub percent_of_pool: f64,
    pub plan: ResolvedPlan,
}

/// How a resolved split divides its sub-pool.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPlan {
    Direct(ResolvedTable),
    ChipEv { places_paid: usize },
}

impl ResolvedPlan {
    pub fn places_paid(&self) -> usize {
        match self {
            ResolvedPlan::Direct(table) => table.places_paid,
            ResolvedPlan::ChipEv { places_paid } => *places_paid,
        }
    }
}

/// The payout configuration applicable to one tournament's final field.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedPayout {
    /// A single table covering the whole pool
    Single(ResolvedTable),
    /// Per-split plans, in authored order
    Splits(Vec<ResolvedSplit>),
    /// An algorithm tag; allocation decides what to do with it
    Algorithm(PayoutAlgorithm),
}

impl ResolvedPayout {
    /// Largest rank any part of this configuration pays.
    pub fn places_paid(&self) -> usize {
        match self {
            ResolvedPayout::Single(table) => table.places_paid,
            ResolvedPayout::Splits(splits) => splits
                .iter()
                .map(|s| s.plan.places_paid())
                .max()
                .unwrap_or(0),
            ResolvedPayout::Algorithm(_) => 0,
        }
    }
}

/// Find the payout configuration applicable to `entrant_count`.
///
/// Ranges are pre-validated to be non-overlapping, so at most one is
/// expected to match; if validation was bypassed and several do, the first
/// range in authored order wins. No match is `NoApplicableRange` — the
/// caller surfaces it rather than guessing a default.
pub fn resolve(model: &PayoutModel, entrant_count: u32) -> PayoutResult<ResolvedPayout> {
    match &model.kind {
        PayoutModelKind::Algorithm(algorithm) => Ok(ResolvedPayout::Algorithm(*algorithm)),
        PayoutModelKind::CustomMatrix { ranges, splits } => {
            if splits.is_empty() {
                let table = find_range(ranges, entrant_count)?;
                Ok(ResolvedPayout::Single(table))
            } else {
                let mut resolved = Vec::with_capacity(splits.len());
                for split in splits {
                    let plan = match &split.rule {
                        SplitRule::Direct { ranges } => {
                            ResolvedPlan::Direct(find_range(ranges, entrant_count)?)
                        }
                        SplitRule::ChipEv { places_paid } => ResolvedPlan::ChipEv {
                            places_paid: *places_paid,
                        },
                    };
                    resolved.push(ResolvedSplit {
                        name: split.name.clone(),
                        percent_of_pool: split.percent_of_pool,
                        plan,
                    });
                }
                Ok(ResolvedPayout::Splits(resolved))
            }
        }
    }
}

fn find_range(ranges: &[PayoutRange], entrant_count: u32) -> PayoutResult<ResolvedTable> {
    ranges
        .iter()
        .find(|range| range.contains(entrant_count))
        .map(|range| ResolvedTable {
            places_paid: range.places_paid,
            percentages: range.percentages.clone(),
        })
        .ok_or(PayoutError::NoApplicableRange { entrant_count })
}
