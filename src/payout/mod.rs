//! Payout model domain: authoring types, structural validation, range
//! resolution, and prize allocation.
//!
//! This module implements:
//! - Payout models as fixed percentage matrices keyed by field size,
//!   optionally divided into named splits (fixed-table or chip-proportional)
//! - A pure validator run on every create/edit
//! - Resolution of the applicable configuration for a final field size
//! - Exact allocation of the pool with an explicit rounding policy
//!   (residual to rank 1, never lost)
//!
//! ## Example
//!
//! ```
//! use club_payouts::payout::{allocate, resolve, validate, PayoutModel, PayoutRange, Standing};
//! use uuid::Uuid;
//!
//! let model = PayoutModel::custom_matrix(
//!     "Weekly deepstack",
//!     vec![PayoutRange::new(2, 8, vec![70.0, 30.0])],
//! );
//! assert!(validate(&model).is_valid());
//!
//! let standings: Vec<Standing> = (0..5)
//!     .map(|_| Standing { entrant_id: Uuid::new_v4(), chip_count: Some(1_000) })
//!     .collect();
//! let resolved = resolve(&model, standings.len() as u32).unwrap();
//! let allocation = allocate(&resolved, &standings, 1_000).unwrap();
//! assert_eq!(allocation.awards, vec![700, 300]);
//! ```

pub mod allocator;
pub mod errors;
pub mod models;
pub mod resolver;
pub mod validator;

pub use allocator::{allocate, Allocation, Standing};
pub use errors::{PayoutError, PayoutResult};
pub use models::{
    PayoutAlgorithm, PayoutModel, PayoutModelId, PayoutModelKind, PayoutRange, Split, SplitRule,
};
pub use resolver::{resolve, ResolvedPayout, ResolvedPlan, ResolvedSplit, ResolvedTable};
pub use validator::{validate, IssueKind, Severity, ValidationIssue, ValidationReport};
