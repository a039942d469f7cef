//! Recalculation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tender_core::{ItemId, PositionId, PositionTotals, PricedItem, TenderError, TenderId, TenderTotals};
use tender_traits::TotalsRecord;

use crate::error::EngineError;

/// Why an item was left out of the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Unknown category tag or negative base amount.
    InvalidInput,
    /// Commercial amount implausibly large, or not computable.
    SanityCheckFailed,
}

impl IssueKind {
    /// Maps an item-level calculation error to its issue kind.
    pub fn from_error(error: &TenderError) -> Self {
        if error.is_input_error() {
            IssueKind::InvalidInput
        } else {
            IssueKind::SanityCheckFailed
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::InvalidInput => write!(f, "invalid input"),
            IssueKind::SanityCheckFailed => write!(f, "sanity check failed"),
        }
    }
}

/// A rejected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemIssue {
    /// The rejected item.
    pub item_id: ItemId,
    /// Its position.
    pub position_id: PositionId,
    /// Classification of the problem.
    pub kind: IssueKind,
    /// Human-readable detail.
    pub message: String,
}

impl ItemIssue {
    /// Builds an issue from the error that rejected an item.
    pub fn from_error(item_id: ItemId, position_id: PositionId, error: &TenderError) -> Self {
        Self {
            item_id,
            position_id,
            kind: IssueKind::from_error(error),
            message: error.to_string(),
        }
    }
}

/// Outcome of recalculating one tender.
///
/// Totals only include items that priced cleanly. The report is complete
/// when no item was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationReport {
    /// Identifies this run in logs.
    pub run_id: Uuid,
    /// Recalculated tender.
    pub tender_id: TenderId,
    /// When the calculation ran.
    pub computed_at: DateTime<Utc>,
    /// Every accepted item with its commercial amount, in input order.
    pub item_results: Vec<PricedItem>,
    /// Per-position totals, ordered by position id.
    pub position_totals: Vec<PositionTotals>,
    /// Tender-wide totals.
    pub tender_totals: TenderTotals,
    /// Rejected items, in input order.
    pub issues: Vec<ItemIssue>,
    /// True when no item was rejected.
    pub complete: bool,
    /// True when the totals were handed to the sink.
    pub persisted: bool,
}

impl RecalculationReport {
    /// Whether every item was priced.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ItemIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Whether two reports carry the same figures, ignoring run id,
    /// timestamp and persistence.
    pub fn same_figures(&self, other: &RecalculationReport) -> bool {
        self.tender_id == other.tender_id
            && self.item_results == other.item_results
            && self.position_totals == other.position_totals
            && self.tender_totals == other.tender_totals
            && self.issues == other.issues
    }

    /// The record handed to a [`TotalsSink`](tender_traits::TotalsSink).
    pub fn to_record(&self) -> TotalsRecord {
        TotalsRecord {
            tender_totals: self.tender_totals.clone(),
            position_totals: self.position_totals.clone(),
            computed_at: self.computed_at,
        }
    }
}

/// Result for one tender of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The tender.
    pub tender_id: TenderId,
    /// Its report, or the error that aborted it.
    pub result: Result<RecalculationReport, EngineError>,
}

/// Result of [`recalculate_all`](crate::RecalculationOrchestrator::recalculate_all).
#[derive(Debug)]
pub struct BatchRecalculation {
    /// One outcome per tender, in source order.
    pub outcomes: Vec<BatchOutcome>,
    /// Tenders that produced a report.
    pub succeeded: usize,
    /// Tenders that failed.
    pub failed: usize,
    /// Total elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

impl BatchRecalculation {
    /// Reports of tenders that succeeded.
    pub fn reports(&self) -> impl Iterator<Item = &RecalculationReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Tenders that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&TenderId, &EngineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.tender_id, e)))
    }
}
