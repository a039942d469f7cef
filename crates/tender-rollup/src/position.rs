//! Per-position aggregation.
//!
//! Items are grouped by position id. Within a position, base and commercial
//! amounts are summed separately for materials-like items (material,
//! sub_material) and works-like items (work, sub_work).

use std::collections::BTreeMap;

use tender_core::{CostItem, MarkupProfile, PositionId, PositionTotals, PricedItem, TenderResult};

use crate::config::RollupConfig;
use crate::parallel::{maybe_parallel_fold, maybe_parallel_map};

type Grouped = TenderResult<BTreeMap<PositionId, PositionTotals>>;

/// Sums item amounts into [`PositionTotals`].
#[derive(Debug, Clone, Default)]
pub struct PositionAggregator {
    config: RollupConfig,
}

impl PositionAggregator {
    /// Creates an aggregator.
    pub fn new(config: RollupConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &RollupConfig {
        &self.config
    }

    /// Prices every item against `profile`, then groups by position.
    ///
    /// Fails on the first item that cannot be priced. Output is ordered by
    /// position id.
    pub fn aggregate(
        &self,
        items: &[CostItem],
        profile: &MarkupProfile,
    ) -> TenderResult<Vec<PositionTotals>> {
        let priced = self.price_all(items, profile);
        let priced = priced.into_iter().collect::<TenderResult<Vec<_>>>()?;
        self.aggregate_priced(&priced)
    }

    /// Prices every item against `profile`, one result per item, in input order.
    pub fn price_all(
        &self,
        items: &[CostItem],
        profile: &MarkupProfile,
    ) -> Vec<TenderResult<PricedItem>> {
        maybe_parallel_map(items, &self.config, |item| PricedItem::price(item, profile))
    }

    /// Groups already-priced items by position.
    ///
    /// Output is ordered by position id and does not depend on item order.
    pub fn aggregate_priced(&self, priced: &[PricedItem]) -> TenderResult<Vec<PositionTotals>> {
        let grouped = maybe_parallel_fold(
            priced,
            &self.config,
            Ok(BTreeMap::new()),
            |acc: Grouped, item| {
                let mut map = acc?;
                map.entry(item.position_id.clone())
                    .or_insert_with(|| PositionTotals::empty(item.position_id.clone()))
                    .add(item)?;
                Ok(map)
            },
            merge_groups,
        )?;
        Ok(grouped.into_values().collect())
    }
}

fn merge_groups(left: Grouped, right: Grouped) -> Grouped {
    let mut left = left?;
    for (position_id, totals) in right? {
        match left.get_mut(&position_id) {
            Some(existing) => existing.merge(&totals)?,
            None => {
                left.insert(position_id, totals);
            }
        }
    }
    Ok(left)
}
