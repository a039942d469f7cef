//! Input sources.
//!
//! These traits define how the engine reads a tender:
//! - [`CostItemSource`]: The tender's line items with their base amounts
//! - [`MarkupProfileSource`]: The single active markup profile
//!
//! Sources deliver raw items; classification and validation happen in the engine.
//! Commercial amounts are never read back from a source.

use async_trait::async_trait;

use tender_core::{MarkupProfile, RawCostItem, TenderId};

use crate::error::TraitError;

/// Source of cost items.
#[async_trait]
pub trait CostItemSource: Send + Sync {
    /// All items of a tender. An unknown tender yields an empty list.
    async fn cost_items(&self, tender_id: &TenderId) -> Result<Vec<RawCostItem>, TraitError>;

    /// Every tender known to the source, for batch recalculation.
    async fn tender_ids(&self) -> Result<Vec<TenderId>, TraitError>;
}

/// Source of markup profiles.
#[async_trait]
pub trait MarkupProfileSource: Send + Sync {
    /// The profile currently active for a tender, if any.
    async fn active_profile(&self, tender_id: &TenderId)
        -> Result<Option<MarkupProfile>, TraitError>;
}
