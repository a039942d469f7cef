//! # Tender Core
//!
//! Core types and the cost markup cascade for the Tender engine.
//!
//! This crate provides the foundational building blocks used throughout Tender:
//!
//! - **Markup profiles**: The immutable set of percentages active for one tender
//! - **Cost items**: Line items with an explicit category tag and a base amount
//! - **Cascades**: The four fixed, ordered percentage sequences turning a base
//!   cost into a commercial cost
//! - **Totals**: Position and tender projections derived from priced items
//!
//! ## Design Philosophy
//!
//! - **Base is authoritative**: Commercial amounts are always derived, never stored as inputs
//! - **Explicit profiles**: Every calculation receives its `MarkupProfile` as an argument
//! - **Exact arithmetic**: `Decimal` throughout, rounding only at presentation
//!
//! ## Example
//!
//! ```rust
//! use tender_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let profile = MarkupProfile::builder()
//!     .subcontract_works_growth_pct(dec!(10))
//!     .overhead_subcontract_pct(dec!(10))
//!     .profit_subcontract_pct(dec!(16))
//!     .build()
//!     .unwrap();
//!
//! let commercial = commercial_amount(dec!(500_000), CostCategory::SubWork, &profile).unwrap();
//! assert_eq!(commercial, dec!(701_800));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::uninlined_format_args)]

pub mod cascade;
pub mod category;
pub mod error;
pub mod ids;
pub mod item;
pub mod money;
pub mod profile;
pub mod totals;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cascade::{
        commercial_amount, markup_coefficient, trace_cascade, Cascade, CascadeStep, CascadeTrace,
        Stage,
    };
    pub use crate::category::{classify, CategoryClassifier, CostCategory};
    pub use crate::error::{TenderError, TenderResult};
    pub use crate::ids::{ItemId, PositionId, TenderId};
    pub use crate::item::{CostItem, PricedItem, RawCostItem};
    pub use crate::money::round_money;
    pub use crate::profile::{MarkupField, MarkupPercentages, MarkupProfile, MarkupProfileBuilder};
    pub use crate::totals::{PositionTotals, TenderTotals};
}

// Re-export commonly used types at crate root
pub use cascade::{commercial_amount, trace_cascade};
pub use category::{classify, CostCategory};
pub use error::{TenderError, TenderResult};
pub use ids::{ItemId, PositionId, TenderId};
pub use item::{CostItem, PricedItem, RawCostItem};
pub use profile::{MarkupField, MarkupProfile};
pub use totals::{PositionTotals, TenderTotals};
