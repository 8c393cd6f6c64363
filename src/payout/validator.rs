//! Structural validation of payout models.
//!
//! Validation runs on every create/edit, not at settlement time. Settlement
//! assumes the model it is handed already passed validation and treats an
//! invalid stored model as a fatal configuration error.

use super::models::{PayoutModel, PayoutModelKind, PayoutRange, SplitRule};
use crate::constants::PERCENT_SUM_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Issue severity. Errors block activation; warnings are advisory and the
/// caller decides whether they block a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What a validation issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Model or split has an empty name
    MissingName,
    /// Range has `min_players` of zero
    ZeroMinPlayers,
    /// Range has `min_players` greater than `max_players`
    MinGreaterThanMax,
    /// Percentage table length does not match `places_paid`
    PlacesMismatch,
    /// Percentage table does not sum to 100 within tolerance
    SumNot100,
    /// Percentages are not non-increasing by rank
    NotDescending,
    /// Two ranges' field-size bands overlap
    RangeOverlap,
    /// Consecutive ranges leave field sizes uncovered
    RangeGap,
    /// Split pool percentages do not sum to 100
    SplitPercentNot100,
    /// A table owns no ranges at all
    NoRanges,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IssueKind::MissingName => "missing_name",
            IssueKind::ZeroMinPlayers => "zero_min_players",
            IssueKind::MinGreaterThanMax => "min_greater_than_max",
            IssueKind::PlacesMismatch => "places_mismatch",
            IssueKind::SumNot100 => "sum_not_100",
            IssueKind::NotDescending => "not_descending",
            IssueKind::RangeOverlap => "range_overlap",
            IssueKind::RangeGap => "range_gap",
            IssueKind::SplitPercentNot100 => "split_percent_not_100",
            IssueKind::NoRanges => "no_ranges",
        };
        write!(f, "{name}")
    }
}

/// One finding from validating a payout model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    /// Human-readable context: which table/range, observed values
    pub detail: String,
}

impl ValidationIssue {
    fn error(kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            detail: detail.into(),
        }
    }

    fn warning(kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            detail: detail.into(),
        }
    }
}

/// Outcome of validating a payout model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when no error-severity issues were found. Warnings do not block.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// Error-severity issues only.
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect()
    }

    /// Warning-severity issues only.
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect()
    }

    /// Consume the report, keeping error-severity issues.
    pub fn into_errors(self) -> Vec<ValidationIssue> {
        self.issues
            .into_iter()
            .filter(|i| i.severity == Severity::Error)
            .collect()
    }
}

/// Validate a payout model's structural invariants.
///
/// Pure function, no side effects. Algorithm-tagged models carry no tables
/// and only their name is checked.
pub fn validate(model: &PayoutModel) -> ValidationReport {
    let mut issues = Vec::new();

    if model.name.trim().is_empty() {
        issues.push(ValidationIssue::error(
            IssueKind::MissingName,
            "payout model has no name",
        ));
    }

    match &model.kind {
        PayoutModelKind::Algorithm(_) => {}
        PayoutModelKind::CustomMatrix { ranges, splits } => {
            if splits.is_empty() {
                validate_table("payout table", ranges, &mut issues);
            } else {
                let percent_sum: f64 = splits.iter().map(|s| s.percent_of_pool).sum();
                if (percent_sum - 100.0).abs() > PERCENT_SUM_TOLERANCE {
                    issues.push(ValidationIssue::error(
                        IssueKind::SplitPercentNot100,
                        format!("split pool percentages sum to {percent_sum}, expected 100"),
                    ));
                }

                for split in splits {
                    if split.name.trim().is_empty() {
                        issues.push(ValidationIssue::error(
                            IssueKind::MissingName,
                            "split has no name",
                        ));
                    }
                    match &split.rule {
                        SplitRule::Direct { ranges } => {
                            validate_table(&split.name, ranges, &mut issues);
                        }
                        SplitRule::ChipEv { places_paid } => {
                            if *places_paid == 0 {
                                issues.push(ValidationIssue::error(
                                    IssueKind::PlacesMismatch,
                                    format!("split '{}' pays zero places", split.name),
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    ValidationReport { issues }
}

/// Check a single table of ranges: per-range invariants plus band
/// overlap (error) and band gaps (warning) across the table.
fn validate_table(label: &str, ranges: &[PayoutRange], issues: &mut Vec<ValidationIssue>) {
    if ranges.is_empty() {
        issues.push(ValidationIssue::error(
            IssueKind::NoRanges,
            format!("{label} owns no payout ranges"),
        ));
        return;
    }

    for range in ranges {
        let band = format!("[{}..{}]", range.min_players, range.max_players);

        if range.min_players == 0 {
            issues.push(ValidationIssue::error(
                IssueKind::ZeroMinPlayers,
                format!("{label} {band}: min_players must be at least 1"),
            ));
        }
        if range.min_players > range.max_players {
            issues.push(ValidationIssue::error(
                IssueKind::MinGreaterThanMax,
                format!("{label} {band}: min_players exceeds max_players"),
            ));
        }
        if range.percentages.len() != range.places_paid {
            issues.push(ValidationIssue::error(
                IssueKind::PlacesMismatch,
                format!(
                    "{label} {band}: {} percentages for {} places paid",
                    range.percentages.len(),
                    range.places_paid
                ),
            ));
        }
        if range
            .percentages
            .windows(2)
            .any(|pair| pair[1] > pair[0])
        {
            issues.push(ValidationIssue::error(
                IssueKind::NotDescending,
                format!("{label} {band}: percentages increase between ranks"),
            ));
        }
        let sum: f64 = range.percentages.iter().sum();
        if (sum - 100.0).abs() > PERCENT_SUM_TOLERANCE {
            issues.push(ValidationIssue::error(
                IssueKind::SumNot100,
                format!("{label} {band}: percentages sum to {sum}, expected 100"),
            ));
        }
    }

    // Band overlap/gap checks run over ranges sorted by lower bound; two
    // sorted intervals overlap iff some consecutive pair does.
    let mut sorted: Vec<&PayoutRange> = ranges.iter().collect();
    sorted.sort_by_key(|r| (r.min_players, r.max_players));
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.min_players <= prev.max_players {
            issues.push(ValidationIssue::error(
                IssueKind::RangeOverlap,
                format!(
                    "{label}: [{}..{}] overlaps [{}..{}]",
                    prev.min_players, prev.max_players, next.min_players, next.max_players
                ),
            ));
        } else if next.min_players > prev.max_players + 1 {
            issues.push(ValidationIssue::warning(
                IssueKind::RangeGap,
                format!(
                    "{label}: field sizes {}..{} are not covered",
                    prev.max_players + 1,
                    next.min_players - 1
                ),
            ));
        }
    }
}
