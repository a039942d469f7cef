//! DashMap-backed collaborator.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use tender_core::{ItemId, MarkupProfile, RawCostItem, TenderId};
use tender_traits::{CostItemSource, MarkupProfileSource, TotalsRecord, TotalsSink, TraitError};

use crate::snapshot::TenderSnapshot;

/// In-memory item source, profile source and totals sink.
///
/// Safe to share between tasks; every map is concurrent. Stored totals follow
/// last-write-wins by `computed_at`: an older record never replaces a newer one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    profiles: DashMap<TenderId, MarkupProfile>,
    items: DashMap<TenderId, Vec<RawCostItem>>,
    totals: DashMap<TenderId, TotalsRecord>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding every tender of a snapshot.
    pub fn from_snapshot(snapshot: TenderSnapshot) -> Self {
        let store = Self::new();
        for tender in snapshot.tenders {
            if let Some(profile) = tender.profile {
                store.set_profile(tender.tender_id.clone(), profile);
            }
            store.put_items(tender.tender_id, tender.items);
        }
        store
    }

    /// Create a store from a snapshot file.
    pub fn load_snapshot_file(path: impl AsRef<Path>) -> Result<Self, TraitError> {
        Ok(Self::from_snapshot(TenderSnapshot::from_file(path)?))
    }

    /// Activates a profile, superseding the previous one.
    pub fn set_profile(&self, tender_id: TenderId, profile: MarkupProfile) {
        self.profiles.insert(tender_id, profile);
    }

    /// Removes the active profile of a tender.
    pub fn clear_profile(&self, tender_id: &TenderId) -> Option<MarkupProfile> {
        self.profiles.remove(tender_id).map(|(_, p)| p)
    }

    /// Replaces all items of a tender.
    pub fn put_items(&self, tender_id: TenderId, items: Vec<RawCostItem>) {
        self.items.insert(tender_id, items);
    }

    /// Inserts an item, or replaces the item with the same id.
    pub fn upsert_item(&self, tender_id: TenderId, item: RawCostItem) {
        let mut items = self.items.entry(tender_id).or_default();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }

    /// Removes an item. Returns false when it did not exist.
    pub fn remove_item(&self, tender_id: &TenderId, item_id: &ItemId) -> bool {
        match self.items.get_mut(tender_id) {
            Some(mut items) => {
                let before = items.len();
                items.retain(|item| &item.id != item_id);
                items.len() != before
            }
            None => false,
        }
    }

    /// The stored totals of a tender.
    pub fn totals(&self, tender_id: &TenderId) -> Option<TotalsRecord> {
        self.totals.get(tender_id).map(|r| r.clone())
    }
}

#[async_trait]
impl CostItemSource for InMemoryStore {
    async fn cost_items(&self, tender_id: &TenderId) -> Result<Vec<RawCostItem>, TraitError> {
        Ok(self
            .items
            .get(tender_id)
            .map(|v| v.clone())
            .unwrap_or_default())
    }

    async fn tender_ids(&self) -> Result<Vec<TenderId>, TraitError> {
        let ids: BTreeSet<TenderId> = self
            .items
            .iter()
            .map(|e| e.key().clone())
            .chain(self.profiles.iter().map(|e| e.key().clone()))
            .collect();
        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl MarkupProfileSource for InMemoryStore {
    async fn active_profile(
        &self,
        tender_id: &TenderId,
    ) -> Result<Option<MarkupProfile>, TraitError> {
        Ok(self.profiles.get(tender_id).map(|p| p.clone()))
    }
}

#[async_trait]
impl TotalsSink for InMemoryStore {
    async fn store(&self, record: &TotalsRecord) -> Result<(), TraitError> {
        let tender_id = record.tender_totals.tender_id.clone();
        let mut entry = self
            .totals
            .entry(tender_id.clone())
            .or_insert_with(|| record.clone());
        if record.supersedes(&entry) {
            *entry = record.clone();
        } else {
            debug!(
                tender_id = %tender_id,
                stored_at = %entry.computed_at,
                incoming_at = %record.computed_at,
                "Ignoring stale totals"
            );
        }
        Ok(())
    }
}
