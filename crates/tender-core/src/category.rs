//! Cost categories and the category classifier.
//!
//! Classification is driven only by the explicit tag carried on each item.
//! Guessing a category from free-text item names is not done here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TenderError, TenderResult};
use crate::item::RawCostItem;

/// The four cost categories, each with its own markup cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    /// Materials supplied by own forces.
    Material,
    /// Works performed by own forces.
    Work,
    /// Materials supplied by a subcontractor.
    SubMaterial,
    /// Works performed by a subcontractor.
    SubWork,
}

impl CostCategory {
    /// All categories.
    pub const ALL: [CostCategory; 4] = [
        CostCategory::Material,
        CostCategory::Work,
        CostCategory::SubMaterial,
        CostCategory::SubWork,
    ];

    /// The wire tag of this category.
    pub fn tag(self) -> &'static str {
        match self {
            CostCategory::Material => "material",
            CostCategory::Work => "work",
            CostCategory::SubMaterial => "sub_material",
            CostCategory::SubWork => "sub_work",
        }
    }

    /// Material or sub_material.
    pub fn is_materials_like(self) -> bool {
        matches!(self, CostCategory::Material | CostCategory::SubMaterial)
    }

    /// Work or sub_work.
    pub fn is_works_like(self) -> bool {
        !self.is_materials_like()
    }

    /// Delegated to a third party.
    pub fn is_subcontract(self) -> bool {
        matches!(self, CostCategory::SubMaterial | CostCategory::SubWork)
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CostCategory {
    type Err = TenderError;

    /// Parses an exact wire tag. Variants in case or spacing are not tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CostCategory::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| TenderError::UnknownCategory {
                tag: s.to_string(),
            })
    }
}

/// Determines the category of a raw item from its tag.
pub fn classify(item: &RawCostItem) -> TenderResult<CostCategory> {
    item.category
        .parse()
        .map_err(|e: TenderError| e.for_item(item.id.as_str()))
}

/// Classifier over raw cost items.
///
/// Stateless; exists so the classifier can be passed around alongside the
/// other pipeline components.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryClassifier;

impl CategoryClassifier {
    /// Creates a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classifies one item.
    pub fn classify(&self, item: &RawCostItem) -> TenderResult<CostCategory> {
        classify(item)
    }
}
