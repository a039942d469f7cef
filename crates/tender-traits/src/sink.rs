//! Output sink.
//!
//! The sink stores recomputed totals. When two recalculations of the same
//! tender race, implementations must keep the record with the latest
//! `computed_at` so stored totals never mix two profile snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tender_core::{PositionTotals, TenderTotals};

use crate::error::TraitError;

/// One persisted recalculation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRecord {
    /// Tender-wide totals.
    pub tender_totals: TenderTotals,
    /// Totals of every position, ordered by position id.
    pub position_totals: Vec<PositionTotals>,
    /// When the recalculation ran.
    pub computed_at: DateTime<Utc>,
}

impl TotalsRecord {
    /// Whether this record should replace `stored`.
    ///
    /// Ties go to the incoming record.
    pub fn supersedes(&self, stored: &TotalsRecord) -> bool {
        self.computed_at >= stored.computed_at
    }
}

/// Durable storage for totals.
#[async_trait]
pub trait TotalsSink: Send + Sync {
    /// Stores a record, keeping the latest one per tender.
    async fn store(&self, record: &TotalsRecord) -> Result<(), TraitError>;
}
