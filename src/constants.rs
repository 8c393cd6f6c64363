//! Engine-wide constants and default configuration values.
//!
//! Centralizing these values makes it easier to:
//! - Adjust tolerances for testing
//! - Support future customization per-club or per-tournament

/// Tolerance applied when checking that authored percentage tables sum to 100.
///
/// Percentages are authored by operators as decimals; a table entered as
/// `[33.33, 33.33, 33.34]` must pass.
pub const PERCENT_SUM_TOLERANCE: f64 = 0.01;

/// Capacity of the cross-display notification channel.
///
/// Receivers that fall further behind than this lose events; they are
/// expected to re-read the store rather than replay the channel.
pub const BROADCAST_CHANNEL_CAPACITY: usize = 100;

/// Default starting chip stack handed to each entrant per buy-in.
pub const DEFAULT_STARTING_STACK: i64 = 5_000;

/// Minimum field size a tournament can settle with.
pub const MIN_FIELD_SIZE: u32 = 2;
