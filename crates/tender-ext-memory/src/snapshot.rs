//! Snapshot documents.
//!
//! A snapshot is the engine's own data model written out as JSON:
//!
//! ```json
//! {
//!   "tenders": [
//!     {
//!       "tenderId": "T-1",
//!       "profile": { "subcontractWorksGrowthPct": "10", "overheadSubcontractPct": "10" },
//!       "items": [
//!         { "id": "I-1", "positionId": "P-1", "category": "sub_work", "baseAmount": "500000" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Profile fields that are left out are zero; a tender without `profile` has
//! no active profile.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tender_core::{MarkupProfile, RawCostItem, TenderId};
use tender_traits::TraitError;

/// One tender inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderData {
    /// Tender identifier.
    pub tender_id: TenderId,
    /// Active markup profile, if any.
    #[serde(default)]
    pub profile: Option<MarkupProfile>,
    /// Line items.
    #[serde(default)]
    pub items: Vec<RawCostItem>,
}

/// A set of tenders with their profiles and items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderSnapshot {
    /// Tenders in document order.
    pub tenders: Vec<TenderData>,
}

impl TenderSnapshot {
    /// Parses a snapshot from JSON text.
    pub fn from_json(content: &str) -> Result<Self, TraitError> {
        serde_json::from_str(content).map_err(|e| TraitError::ParseError(e.to_string()))
    }

    /// Reads a snapshot file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TraitError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Looks up one tender.
    pub fn tender(&self, tender_id: &TenderId) -> Option<&TenderData> {
        self.tenders.iter().find(|t| &t.tender_id == tender_id)
    }
}
