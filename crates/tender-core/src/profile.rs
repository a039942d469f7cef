//! Markup profiles.
//!
//! A [`MarkupProfile`] is the immutable snapshot of percentages active for one
//! tender. Editing percentages produces a new profile; an existing one is never
//! mutated, so a recalculation always sees one consistent set of values.
//!
//! Percentages are expressed in points (`10` means 10%), are non-negative and
//! have no upper bound. Values above a caller-chosen threshold can be listed
//! with [`MarkupProfile::suspicious_fields`].

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TenderError, TenderResult};

/// One of the eleven percentage parameters of a markup profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkupField {
    /// Leading markup applied to in-house works only.
    WorksPrimaryMarkup,
    /// Growth applied to in-house works.
    WorksGrowth,
    /// Growth applied to in-house materials.
    MaterialsGrowth,
    /// Growth applied to subcontracted works.
    SubcontractWorksGrowth,
    /// Growth applied to subcontracted materials.
    SubcontractMaterialsGrowth,
    /// Contingency, always taken on the untouched base.
    Contingency,
    /// Overhead for own-forces items.
    OverheadOwnForces,
    /// Overhead for subcontracted items.
    OverheadSubcontract,
    /// General costs, excluding subcontracted items.
    GeneralCostsExSubcontract,
    /// Profit on own-forces items.
    ProfitOwnForces,
    /// Profit on subcontracted items.
    ProfitSubcontract,
}

impl MarkupField {
    /// All fields, in declaration order.
    pub const ALL: [MarkupField; 11] = [
        MarkupField::WorksPrimaryMarkup,
        MarkupField::WorksGrowth,
        MarkupField::MaterialsGrowth,
        MarkupField::SubcontractWorksGrowth,
        MarkupField::SubcontractMaterialsGrowth,
        MarkupField::Contingency,
        MarkupField::OverheadOwnForces,
        MarkupField::OverheadSubcontract,
        MarkupField::GeneralCostsExSubcontract,
        MarkupField::ProfitOwnForces,
        MarkupField::ProfitSubcontract,
    ];

    /// The serialized field name of this percentage.
    pub fn name(self) -> &'static str {
        match self {
            MarkupField::WorksPrimaryMarkup => "worksPrimaryMarkupPct",
            MarkupField::WorksGrowth => "worksGrowthPct",
            MarkupField::MaterialsGrowth => "materialsGrowthPct",
            MarkupField::SubcontractWorksGrowth => "subcontractWorksGrowthPct",
            MarkupField::SubcontractMaterialsGrowth => "subcontractMaterialsGrowthPct",
            MarkupField::Contingency => "contingencyPct",
            MarkupField::OverheadOwnForces => "overheadOwnForcesPct",
            MarkupField::OverheadSubcontract => "overheadSubcontractPct",
            MarkupField::GeneralCostsExSubcontract => "generalCostsExSubcontractPct",
            MarkupField::ProfitOwnForces => "profitOwnForcesPct",
            MarkupField::ProfitSubcontract => "profitSubcontractPct",
        }
    }
}

impl fmt::Display for MarkupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw percentage values, as exchanged with the persistence layer.
///
/// This is unvalidated data; [`MarkupProfile::new`] turns it into a profile.
/// Missing fields deserialize as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkupPercentages {
    /// Leading markup on in-house works.
    pub works_primary_markup_pct: Decimal,
    /// Growth on in-house works.
    pub works_growth_pct: Decimal,
    /// Growth on in-house materials.
    pub materials_growth_pct: Decimal,
    /// Growth on subcontracted works.
    pub subcontract_works_growth_pct: Decimal,
    /// Growth on subcontracted materials.
    pub subcontract_materials_growth_pct: Decimal,
    /// Contingency.
    pub contingency_pct: Decimal,
    /// Own-forces overhead.
    pub overhead_own_forces_pct: Decimal,
    /// Subcontract overhead.
    pub overhead_subcontract_pct: Decimal,
    /// General costs excluding subcontracts.
    pub general_costs_ex_subcontract_pct: Decimal,
    /// Own-forces profit.
    pub profit_own_forces_pct: Decimal,
    /// Subcontract profit.
    pub profit_subcontract_pct: Decimal,
}

impl MarkupPercentages {
    /// Returns the value of one field.
    pub fn get(&self, field: MarkupField) -> Decimal {
        match field {
            MarkupField::WorksPrimaryMarkup => self.works_primary_markup_pct,
            MarkupField::WorksGrowth => self.works_growth_pct,
            MarkupField::MaterialsGrowth => self.materials_growth_pct,
            MarkupField::SubcontractWorksGrowth => self.subcontract_works_growth_pct,
            MarkupField::SubcontractMaterialsGrowth => self.subcontract_materials_growth_pct,
            MarkupField::Contingency => self.contingency_pct,
            MarkupField::OverheadOwnForces => self.overhead_own_forces_pct,
            MarkupField::OverheadSubcontract => self.overhead_subcontract_pct,
            MarkupField::GeneralCostsExSubcontract => self.general_costs_ex_subcontract_pct,
            MarkupField::ProfitOwnForces => self.profit_own_forces_pct,
            MarkupField::ProfitSubcontract => self.profit_subcontract_pct,
        }
    }

    fn slot(&mut self, field: MarkupField) -> &mut Decimal {
        match field {
            MarkupField::WorksPrimaryMarkup => &mut self.works_primary_markup_pct,
            MarkupField::WorksGrowth => &mut self.works_growth_pct,
            MarkupField::MaterialsGrowth => &mut self.materials_growth_pct,
            MarkupField::SubcontractWorksGrowth => &mut self.subcontract_works_growth_pct,
            MarkupField::SubcontractMaterialsGrowth => &mut self.subcontract_materials_growth_pct,
            MarkupField::Contingency => &mut self.contingency_pct,
            MarkupField::OverheadOwnForces => &mut self.overhead_own_forces_pct,
            MarkupField::OverheadSubcontract => &mut self.overhead_subcontract_pct,
            MarkupField::GeneralCostsExSubcontract => &mut self.general_costs_ex_subcontract_pct,
            MarkupField::ProfitOwnForces => &mut self.profit_own_forces_pct,
            MarkupField::ProfitSubcontract => &mut self.profit_subcontract_pct,
        }
    }
}

/// The validated, immutable set of markup percentages active for a tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MarkupPercentages", into = "MarkupPercentages")]
pub struct MarkupProfile {
    pcts: MarkupPercentages,
}

impl MarkupProfile {
    /// Validates raw percentages into a profile.
    ///
    /// Every percentage must be non-negative.
    pub fn new(pcts: MarkupPercentages) -> TenderResult<Self> {
        for field in MarkupField::ALL {
            let value = pcts.get(field);
            if value < Decimal::ZERO {
                return Err(TenderError::InvalidProfile {
                    field: field.name().to_string(),
                    value,
                });
            }
        }
        Ok(Self { pcts })
    }

    /// Creates a builder with every percentage at zero.
    #[must_use]
    pub fn builder() -> MarkupProfileBuilder {
        MarkupProfileBuilder::default()
    }

    /// A profile with every percentage at zero (commercial equals base).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            pcts: MarkupPercentages::default(),
        }
    }

    /// Returns one percentage.
    pub fn pct(&self, field: MarkupField) -> Decimal {
        self.pcts.get(field)
    }

    /// Returns the underlying percentages.
    pub fn percentages(&self) -> &MarkupPercentages {
        &self.pcts
    }

    /// Returns a copy of this profile with one percentage replaced.
    ///
    /// The original profile is left untouched.
    pub fn with_pct(&self, field: MarkupField, value: Decimal) -> TenderResult<Self> {
        let mut pcts = self.pcts.clone();
        *pcts.slot(field) = value;
        Self::new(pcts)
    }

    /// Lists the percentages strictly above `threshold`.
    pub fn suspicious_fields(&self, threshold: Decimal) -> Vec<(MarkupField, Decimal)> {
        MarkupField::ALL
            .iter()
            .map(|&field| (field, self.pct(field)))
            .filter(|(_, value)| *value > threshold)
            .collect()
    }
}

impl TryFrom<MarkupPercentages> for MarkupProfile {
    type Error = TenderError;

    fn try_from(pcts: MarkupPercentages) -> Result<Self, Self::Error> {
        Self::new(pcts)
    }
}

impl From<MarkupProfile> for MarkupPercentages {
    fn from(profile: MarkupProfile) -> Self {
        profile.pcts
    }
}

/// Builder for [`MarkupProfile`].
#[derive(Debug, Clone, Default)]
pub struct MarkupProfileBuilder {
    pcts: MarkupPercentages,
}

impl MarkupProfileBuilder {
    /// Sets any percentage by field.
    #[must_use]
    pub fn pct(mut self, field: MarkupField, value: Decimal) -> Self {
        *self.pcts.slot(field) = value;
        self
    }

    /// Sets the leading in-house works markup.
    #[must_use]
    pub fn works_primary_markup_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::WorksPrimaryMarkup, value)
    }

    /// Sets the in-house works growth.
    #[must_use]
    pub fn works_growth_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::WorksGrowth, value)
    }

    /// Sets the in-house materials growth.
    #[must_use]
    pub fn materials_growth_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::MaterialsGrowth, value)
    }

    /// Sets the subcontracted works growth.
    #[must_use]
    pub fn subcontract_works_growth_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::SubcontractWorksGrowth, value)
    }

    /// Sets the subcontracted materials growth.
    #[must_use]
    pub fn subcontract_materials_growth_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::SubcontractMaterialsGrowth, value)
    }

    /// Sets the contingency.
    #[must_use]
    pub fn contingency_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::Contingency, value)
    }

    /// Sets the own-forces overhead.
    #[must_use]
    pub fn overhead_own_forces_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::OverheadOwnForces, value)
    }

    /// Sets the subcontract overhead.
    #[must_use]
    pub fn overhead_subcontract_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::OverheadSubcontract, value)
    }

    /// Sets the general costs (excluding subcontracts).
    #[must_use]
    pub fn general_costs_ex_subcontract_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::GeneralCostsExSubcontract, value)
    }

    /// Sets the own-forces profit.
    #[must_use]
    pub fn profit_own_forces_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::ProfitOwnForces, value)
    }

    /// Sets the subcontract profit.
    #[must_use]
    pub fn profit_subcontract_pct(self, value: Decimal) -> Self {
        self.pct(MarkupField::ProfitSubcontract, value)
    }

    /// Validates and builds the profile.
    pub fn build(self) -> TenderResult<MarkupProfile> {
        MarkupProfile::new(self.pcts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_sets_fields() {
        let profile = MarkupProfile::builder()
            .works_primary_markup_pct(dec!(60))
            .contingency_pct(dec!(3))
            .profit_subcontract_pct(dec!(16))
            .build()
            .unwrap();

        assert_eq!(profile.pct(MarkupField::WorksPrimaryMarkup), dec!(60));
        assert_eq!(profile.pct(MarkupField::Contingency), dec!(3));
        assert_eq!(profile.pct(MarkupField::ProfitSubcontract), dec!(16));
        assert_eq!(profile.pct(MarkupField::WorksGrowth), Decimal::ZERO);
    }

    #[test]
    fn test_negative_percentage_rejected() {
        let err = MarkupProfile::builder()
            .overhead_own_forces_pct(dec!(-1))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            TenderError::InvalidProfile {
                field: "overheadOwnForcesPct".into(),
                value: dec!(-1),
            }
        );
    }

    #[test]
    fn test_with_pct_does_not_mutate_original() {
        let original = MarkupProfile::builder()
            .materials_growth_pct(dec!(5))
            .build()
            .unwrap();
        let edited = original
            .with_pct(MarkupField::MaterialsGrowth, dec!(7))
            .unwrap();

        assert_eq!(original.pct(MarkupField::MaterialsGrowth), dec!(5));
        assert_eq!(edited.pct(MarkupField::MaterialsGrowth), dec!(7));
    }

    #[test]
    fn test_suspicious_fields() {
        let profile = MarkupProfile::builder()
            .works_primary_markup_pct(dec!(650))
            .works_growth_pct(dec!(500))
            .build()
            .unwrap();

        let flagged = profile.suspicious_fields(dec!(500));
        assert_eq!(flagged, vec![(MarkupField::WorksPrimaryMarkup, dec!(650))]);
    }

    #[test]
    fn test_serde_uses_camel_case_and_validates() {
        let json = r#"{
            "worksPrimaryMarkupPct": "60",
            "worksGrowthPct": "10",
            "materialsGrowthPct": "0",
            "subcontractWorksGrowthPct": "10",
            "subcontractMaterialsGrowthPct": "0",
            "contingencyPct": "3",
            "overheadOwnForcesPct": "10",
            "overheadSubcontractPct": "10",
            "generalCostsExSubcontractPct": "20",
            "profitOwnForcesPct": "10",
            "profitSubcontractPct": "16"
        }"#;
        let profile: MarkupProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.pct(MarkupField::GeneralCostsExSubcontract), dec!(20));

        let bad = json.replace("\"contingencyPct\": \"3\"", "\"contingencyPct\": \"-3\"");
        assert!(serde_json::from_str::<MarkupProfile>(&bad).is_err());

        let round = serde_json::to_value(&profile).unwrap();
        assert!(round.get("profitSubcontractPct").is_some());
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<&str> = MarkupField::ALL.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MarkupField::ALL.len());
    }
}
