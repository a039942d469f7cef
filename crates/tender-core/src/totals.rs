//! Derived totals.
//!
//! Both projections are disposable: they are recomputed from priced items and
//! never edited by hand.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TenderError, TenderResult};
use crate::ids::{PositionId, TenderId};
use crate::item::PricedItem;

/// Per-position sums, split into materials-like and works-like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionTotals {
    /// Position these totals belong to.
    pub position_id: PositionId,
    /// Base amount of material and sub_material items.
    pub base_materials: Decimal,
    /// Base amount of work and sub_work items.
    pub base_works: Decimal,
    /// Commercial amount of material and sub_material items.
    pub commercial_materials: Decimal,
    /// Commercial amount of work and sub_work items.
    pub commercial_works: Decimal,
}

impl PositionTotals {
    /// Empty totals for a position.
    pub fn empty(position_id: PositionId) -> Self {
        Self {
            position_id,
            base_materials: Decimal::ZERO,
            base_works: Decimal::ZERO,
            commercial_materials: Decimal::ZERO,
            commercial_works: Decimal::ZERO,
        }
    }

    /// Adds one priced item. The item must belong to this position.
    pub fn add(&mut self, item: &PricedItem) -> TenderResult<()> {
        if item.position_id != self.position_id {
            return Err(TenderError::invalid_input(
                item.id.as_str(),
                format!(
                    "belongs to position {}, not {}",
                    item.position_id, self.position_id
                ),
            ));
        }
        let (base, commercial) = if item.category.is_materials_like() {
            (&mut self.base_materials, &mut self.commercial_materials)
        } else {
            (&mut self.base_works, &mut self.commercial_works)
        };
        *base = checked_sum(*base, item.base_amount)?;
        *commercial = checked_sum(*commercial, item.commercial_amount)?;
        Ok(())
    }

    /// Folds another partial sum of the same position into this one.
    pub fn merge(&mut self, other: &PositionTotals) -> TenderResult<()> {
        self.base_materials = checked_sum(self.base_materials, other.base_materials)?;
        self.base_works = checked_sum(self.base_works, other.base_works)?;
        self.commercial_materials =
            checked_sum(self.commercial_materials, other.commercial_materials)?;
        self.commercial_works = checked_sum(self.commercial_works, other.commercial_works)?;
        Ok(())
    }

    /// Base materials plus base works.
    pub fn base_total(&self) -> Decimal {
        self.base_materials + self.base_works
    }

    /// Commercial materials plus commercial works.
    pub fn commercial_total(&self) -> Decimal {
        self.commercial_materials + self.commercial_works
    }
}

/// Tender-wide sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderTotals {
    /// Tender these totals belong to.
    pub tender_id: TenderId,
    /// Sum of all base amounts.
    pub base_total: Decimal,
    /// Sum of all commercial amounts.
    pub commercial_total: Decimal,
    /// `(commercial − base) / base × 100`, or zero when base is zero.
    pub effective_markup_pct: Decimal,
}

pub(crate) fn checked_sum(a: Decimal, b: Decimal) -> TenderResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| TenderError::arithmetic("overflow summing totals"))
}
