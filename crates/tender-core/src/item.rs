//! Cost items.
//!
//! - [`RawCostItem`]: an item as delivered by the persistence layer, unvalidated
//! - [`CostItem`]: a classified item with a non-negative base amount
//! - [`PricedItem`]: a cost item together with its derived commercial amount

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cascade::commercial_amount;
use crate::category::{classify, CostCategory};
use crate::error::{TenderError, TenderResult};
use crate::ids::{ItemId, PositionId};
use crate::profile::MarkupProfile;

/// A line item as stored, before classification and validation.
///
/// The category is kept as the stored tag so that unrecognized values can be
/// reported per item instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCostItem {
    /// Item identifier.
    pub id: ItemId,
    /// Owning position.
    pub position_id: PositionId,
    /// Category tag.
    pub category: String,
    /// Base amount; `None` when missing or null in storage.
    #[serde(default)]
    pub base_amount: Option<Decimal>,
}

impl RawCostItem {
    /// Creates a raw item.
    pub fn new(
        id: impl Into<ItemId>,
        position_id: impl Into<PositionId>,
        category: impl Into<String>,
        base_amount: Option<Decimal>,
    ) -> Self {
        Self {
            id: id.into(),
            position_id: position_id.into(),
            category: category.into(),
            base_amount,
        }
    }
}

/// A classified line item with a validated base amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    /// Item identifier.
    pub id: ItemId,
    /// Owning position.
    pub position_id: PositionId,
    /// Cost category.
    pub category: CostCategory,
    /// Internal, pre-markup cost. Never negative.
    pub base_amount: Decimal,
}

impl CostItem {
    /// Creates a cost item, rejecting a negative base amount.
    pub fn new(
        id: impl Into<ItemId>,
        position_id: impl Into<PositionId>,
        category: CostCategory,
        base_amount: Decimal,
    ) -> TenderResult<Self> {
        let id = id.into();
        if base_amount < Decimal::ZERO {
            return Err(TenderError::NegativeBaseAmount {
                amount: base_amount,
            }
            .for_item(id.as_str()));
        }
        Ok(Self {
            id,
            position_id: position_id.into(),
            category,
            base_amount,
        })
    }

    /// Classifies and validates a raw item. A missing base amount becomes zero.
    pub fn try_from_raw(raw: &RawCostItem) -> TenderResult<Self> {
        let category = classify(raw)?;
        Self::new(
            raw.id.clone(),
            raw.position_id.clone(),
            category,
            raw.base_amount.unwrap_or(Decimal::ZERO),
        )
    }
}

impl TryFrom<&RawCostItem> for CostItem {
    type Error = TenderError;

    fn try_from(raw: &RawCostItem) -> Result<Self, Self::Error> {
        Self::try_from_raw(raw)
    }
}

/// A cost item with its commercial amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    /// Item identifier.
    pub id: ItemId,
    /// Owning position.
    pub position_id: PositionId,
    /// Cost category.
    pub category: CostCategory,
    /// Base amount the commercial amount was derived from.
    pub base_amount: Decimal,
    /// Client-facing amount after the cascade.
    pub commercial_amount: Decimal,
}

impl PricedItem {
    /// Runs the cascade for one item.
    pub fn price(item: &CostItem, profile: &MarkupProfile) -> TenderResult<Self> {
        let commercial = commercial_amount(item.base_amount, item.category, profile)
            .map_err(|e| e.for_item(item.id.as_str()))?;
        Ok(Self {
            id: item.id.clone(),
            position_id: item.position_id.clone(),
            category: item.category,
            base_amount: item.base_amount,
            commercial_amount: commercial,
        })
    }

    /// Rejects a commercial amount above `factor` times the base.
    ///
    /// Realistic markups stay far below such multiples, so a trip means the
    /// profile or the input is corrupt.
    pub fn check_sanity(&self, factor: Decimal) -> TenderResult<()> {
        let exceeds = match self.base_amount.checked_mul(factor) {
            Some(limit) => self.commercial_amount > limit,
            None => false,
        };
        if exceeds {
            return Err(TenderError::SanityCheckFailed {
                item_id: self.id.to_string(),
                base: self.base_amount,
                commercial: self.commercial_amount,
                factor,
            });
        }
        Ok(())
    }

    /// Commercial amount divided by base, or `None` for a zero base.
    pub fn multiple(&self) -> Option<Decimal> {
        if self.base_amount.is_zero() {
            None
        } else {
            self.commercial_amount.checked_div(self.base_amount)
        }
    }
}
