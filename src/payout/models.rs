//! Payout model data types.
//!
//! A payout model describes how a tournament's prize pool is divided once
//! play ends. Models are authored by club operators, validated before they
//! can be saved, and referenced (never copied) by any number of tournaments.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payout model ID type
pub type PayoutModelId = Uuid;

/// A named payout structure referenced by tournaments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutModel {
    /// Model ID (minted by the authoring context)
    pub id: PayoutModelId,
    /// Display name shown in the structure editor and on the clock
    pub name: String,
    /// How amounts are derived
    pub kind: PayoutModelKind,
    /// Optional operator-facing description
    pub description: Option<String>,
}

/// How a payout model derives amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PayoutModelKind {
    /// A symbolic algorithm tag with no stored ranges.
    Algorithm(PayoutAlgorithm),
    /// An authored matrix of percentage tables keyed by field size.
    CustomMatrix {
        /// Ordered payout ranges; used when `splits` is empty
        ranges: Vec<PayoutRange>,
        /// Named sub-allocations of the pool; when non-empty, these govern
        /// allocation and the top-level `ranges` are unused
        splits: Vec<Split>,
    },
}

/// Symbolic payout algorithms.
///
/// These are labels without an implemented formula; allocation rejects them
/// until a real one is agreed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutAlgorithm {
    /// Places paid scale with the size of the field
    ProportionalToField,
    /// Prizes proportional to finishing chip counts
    ChipProportional,
}

impl std::fmt::Display for PayoutAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutAlgorithm::ProportionalToField => write!(f, "proportional_to_field"),
            PayoutAlgorithm::ChipProportional => write!(f, "chip_proportional"),
        }
    }
}

/// A field-size band mapped to a fixed percentage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRange {
    /// Smallest field size this range applies to (inclusive)
    pub min_players: u32,
    /// Largest field size this range applies to (inclusive)
    pub max_players: u32,
    /// Number of places paid
    pub places_paid: usize,
    /// Percentage of the (sub-)pool per place, rank 1 first
    pub percentages: Vec<f64>,
}

impl PayoutRange {
    /// Create a payout range; `places_paid` is derived from the table length.
    pub fn new(min_players: u32, max_players: u32, percentages: Vec<f64>) -> Self {
        Self {
            min_players,
            max_players,
            places_paid: percentages.len(),
            percentages,
        }
    }

    /// Whether this range applies to a field of the given size.
    pub fn contains(&self, entrant_count: u32) -> bool {
        self.min_players <= entrant_count && entrant_count <= self.max_players
    }
}

/// A named sub-allocation of the total pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Display name, e.g. "Main prizes" or "Chip count bonus"
    pub name: String,
    /// Percentage of the total pool routed to this split
    pub percent_of_pool: f64,
    /// How this split's sub-pool is divided
    pub rule: SplitRule,
}

/// How a split divides its sub-pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitRule {
    /// A fixed percentage table of its own, keyed by field size
    Direct {
        /// Ordered payout ranges for this split
        ranges: Vec<PayoutRange>,
    },
    /// Proportional to each payee's counted chips
    ChipEv {
        /// Number of top finishers paid by this split
        places_paid: usize,
    },
}

impl Split {
    /// Create a split with its own fixed percentage tables.
    pub fn direct(name: impl Into<String>, percent_of_pool: f64, ranges: Vec<PayoutRange>) -> Self {
        Self {
            name: name.into(),
            percent_of_pool,
            rule: SplitRule::Direct { ranges },
        }
    }

    /// Create a chip-proportional split over the top `places_paid` finishers.
    pub fn chip_ev(name: impl Into<String>, percent_of_pool: f64, places_paid: usize) -> Self {
        Self {
            name: name.into(),
            percent_of_pool,
            rule: SplitRule::ChipEv { places_paid },
        }
    }
}

impl PayoutModel {
    /// Create a matrix model with a single table of ranges and no splits.
    pub fn custom_matrix(name: impl Into<String>, ranges: Vec<PayoutRange>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: PayoutModelKind::CustomMatrix {
                ranges,
                splits: Vec::new(),
            },
            description: None,
        }
    }

    /// Create a matrix model whose pool is divided between named splits.
    pub fn with_splits(name: impl Into<String>, splits: Vec<Split>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: PayoutModelKind::CustomMatrix {
                ranges: Vec::new(),
                splits,
            },
            description: None,
        }
    }

    /// Create an algorithm-tagged model.
    pub fn algorithm(name: impl Into<String>, algorithm: PayoutAlgorithm) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: PayoutModelKind::Algorithm(algorithm),
            description: None,
        }
    }

    /// Attach an operator-facing description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
