//! The markup cascade.
//!
//! Each [`CostCategory`] maps to a fixed [`Cascade`]: an ordered list of
//! [`Stage`]s interpreted against a running value. Later stages compound on
//! earlier ones, so the order of every table below is significant.
//!
//! ```text
//! material      growth ─ +contingency ─ overhead(own) ─ general costs ─ profit(own)
//! work          primary ─ growth ─ +contingency ─ overhead(own) ─ general costs ─ profit(own)
//! sub_material  growth(sub) ─ overhead(sub) ─ profit(sub)
//! sub_work      growth(sub) ─ overhead(sub) ─ profit(sub)
//! ```
//!
//! Subcontract cascades carry no contingency and no general-costs stage.
//!
//! All arithmetic is `Decimal` with no intermediate rounding. Overflow is
//! reported as [`TenderError::Arithmetic`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::CostCategory;
use crate::error::{TenderError, TenderResult};
use crate::profile::{MarkupField, MarkupProfile};

/// A single step of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum Stage {
    /// `running × (1 + pct/100)`.
    Compound(MarkupField),
    /// `running + base × (1 + pct/100) − base`.
    ///
    /// The delta is taken on the untouched base, never on a marked-up value.
    BaseDelta(MarkupField),
}

impl Stage {
    /// The profile field this stage reads.
    pub fn field(self) -> MarkupField {
        match self {
            Stage::Compound(field) | Stage::BaseDelta(field) => field,
        }
    }

    fn apply(self, running: Decimal, base: Decimal, pct: Decimal) -> TenderResult<Decimal> {
        let factor = growth_factor(pct)?;
        match self {
            Stage::Compound(_) => running
                .checked_mul(factor)
                .ok_or_else(|| overflow(self)),
            Stage::BaseDelta(_) => base
                .checked_mul(factor)
                .and_then(|marked| running.checked_add(marked))
                .and_then(|sum| sum.checked_sub(base))
                .ok_or_else(|| overflow(self)),
        }
    }
}

/// A fixed, ordered stage sequence for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    /// Category this cascade prices.
    pub category: CostCategory,
    /// Stages in application order.
    pub stages: &'static [Stage],
}

const MATERIAL_STAGES: &[Stage] = &[
    Stage::Compound(MarkupField::MaterialsGrowth),
    Stage::BaseDelta(MarkupField::Contingency),
    Stage::Compound(MarkupField::OverheadOwnForces),
    Stage::Compound(MarkupField::GeneralCostsExSubcontract),
    Stage::Compound(MarkupField::ProfitOwnForces),
];

const WORK_STAGES: &[Stage] = &[
    Stage::Compound(MarkupField::WorksPrimaryMarkup),
    Stage::Compound(MarkupField::WorksGrowth),
    Stage::BaseDelta(MarkupField::Contingency),
    Stage::Compound(MarkupField::OverheadOwnForces),
    Stage::Compound(MarkupField::GeneralCostsExSubcontract),
    Stage::Compound(MarkupField::ProfitOwnForces),
];

const SUB_MATERIAL_STAGES: &[Stage] = &[
    Stage::Compound(MarkupField::SubcontractMaterialsGrowth),
    Stage::Compound(MarkupField::OverheadSubcontract),
    Stage::Compound(MarkupField::ProfitSubcontract),
];

const SUB_WORK_STAGES: &[Stage] = &[
    Stage::Compound(MarkupField::SubcontractWorksGrowth),
    Stage::Compound(MarkupField::OverheadSubcontract),
    Stage::Compound(MarkupField::ProfitSubcontract),
];

impl Cascade {
    /// The cascade for a category.
    pub const fn for_category(category: CostCategory) -> Self {
        let stages = match category {
            CostCategory::Material => MATERIAL_STAGES,
            CostCategory::Work => WORK_STAGES,
            CostCategory::SubMaterial => SUB_MATERIAL_STAGES,
            CostCategory::SubWork => SUB_WORK_STAGES,
        };
        Self { category, stages }
    }

    /// Whether any stage of this cascade reads `field`.
    pub fn reads(&self, field: MarkupField) -> bool {
        self.stages.iter().any(|s| s.field() == field)
    }

    fn run(
        &self,
        base: Decimal,
        profile: &MarkupProfile,
        mut steps: Option<&mut Vec<CascadeStep>>,
    ) -> TenderResult<Decimal> {
        let mut running = base;
        for &stage in self.stages {
            let pct = profile.pct(stage.field());
            running = stage.apply(running, base, pct)?;
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(CascadeStep {
                    stage,
                    pct,
                    value: running,
                });
            }
        }
        Ok(running)
    }
}

/// One recorded stage of a [`CascadeTrace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// The stage applied.
    pub stage: Stage,
    /// The percentage read from the profile.
    pub pct: Decimal,
    /// Running value after the stage.
    pub value: Decimal,
}

/// Every intermediate value of one cascade evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeTrace {
    /// Category priced.
    pub category: CostCategory,
    /// Input base amount.
    pub base: Decimal,
    /// Stages in order. Empty for a zero base.
    pub steps: Vec<CascadeStep>,
    /// Final commercial amount.
    pub result: Decimal,
}

/// Computes the commercial amount of `base` for `category`.
///
/// A zero base returns zero without applying any stage. A negative base is
/// rejected.
pub fn commercial_amount(
    base: Decimal,
    category: CostCategory,
    profile: &MarkupProfile,
) -> TenderResult<Decimal> {
    check_base(base)?;
    if base.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Cascade::for_category(category).run(base, profile, None)
}

/// Like [`commercial_amount`], recording every stage.
pub fn trace_cascade(
    base: Decimal,
    category: CostCategory,
    profile: &MarkupProfile,
) -> TenderResult<CascadeTrace> {
    check_base(base)?;
    let mut steps = Vec::new();
    let result = if base.is_zero() {
        Decimal::ZERO
    } else {
        Cascade::for_category(category).run(base, profile, Some(&mut steps))?
    };
    Ok(CascadeTrace {
        category,
        base,
        steps,
        result,
    })
}

/// The multiplier the cascade applies to any base for `category`.
///
/// Every cascade is linear in its base, so this is the commercial amount of a
/// base of one.
pub fn markup_coefficient(category: CostCategory, profile: &MarkupProfile) -> TenderResult<Decimal> {
    Cascade::for_category(category).run(Decimal::ONE, profile, None)
}

fn check_base(base: Decimal) -> TenderResult<()> {
    if base < Decimal::ZERO {
        return Err(TenderError::NegativeBaseAmount { amount: base });
    }
    Ok(())
}

fn growth_factor(pct: Decimal) -> TenderResult<Decimal> {
    pct.checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| Decimal::ONE.checked_add(fraction))
        .ok_or_else(|| TenderError::arithmetic(format!("percentage {pct} out of range")))
}

fn overflow(stage: Stage) -> TenderError {
    TenderError::arithmetic(format!("overflow applying {}", stage.field()))
}
