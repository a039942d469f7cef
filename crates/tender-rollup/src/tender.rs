//! Tender-wide rollup.

use rust_decimal::Decimal;
use tender_core::{PositionTotals, TenderError, TenderId, TenderResult, TenderTotals};

/// Sums position totals into [`TenderTotals`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TenderRollupAggregator;

impl TenderRollupAggregator {
    /// Rolls up all positions of a tender.
    ///
    /// `effective_markup_pct` is `(commercial − base) / base × 100`, or zero
    /// when the base total is zero.
    pub fn aggregate(
        tender_id: &TenderId,
        positions: &[PositionTotals],
    ) -> TenderResult<TenderTotals> {
        let mut base_total = Decimal::ZERO;
        let mut commercial_total = Decimal::ZERO;
        for position in positions {
            base_total = [position.base_materials, position.base_works]
                .into_iter()
                .try_fold(base_total, Decimal::checked_add)
                .ok_or_else(|| TenderError::arithmetic("overflow summing tender base"))?;
            commercial_total = [position.commercial_materials, position.commercial_works]
                .into_iter()
                .try_fold(commercial_total, Decimal::checked_add)
                .ok_or_else(|| TenderError::arithmetic("overflow summing tender commercial"))?;
        }

        Ok(TenderTotals {
            tender_id: tender_id.clone(),
            base_total,
            commercial_total,
            effective_markup_pct: effective_markup_pct(base_total, commercial_total)?,
        })
    }
}

/// `(commercial − base) / base × 100`, zero for a non-positive base.
pub fn effective_markup_pct(base: Decimal, commercial: Decimal) -> TenderResult<Decimal> {
    if base <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    commercial
        .checked_sub(base)
        .and_then(|markup| markup.checked_div(base))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| TenderError::arithmetic("overflow computing effective markup"))
}
