//! # Tender Rollup
//!
//! Aggregation of priced cost items into position and tender totals.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: All calculations are stateless with explicit inputs
//! - **Item independence**: Each item's commercial amount depends only on its own base and category
//! - **Config-driven parallelism**: Optional rayon support with threshold-based switching
//!
//! ## Quick Start
//!
//! ```rust
//! use tender_core::prelude::*;
//! use tender_rollup::{PositionAggregator, RollupConfig, TenderRollupAggregator};
//! use rust_decimal_macros::dec;
//!
//! let profile = MarkupProfile::builder().profit_own_forces_pct(dec!(10)).build().unwrap();
//! let items = vec![
//!     CostItem::new("I-1", "P-1", CostCategory::Work, dec!(100)).unwrap(),
//!     CostItem::new("I-2", "P-1", CostCategory::Material, dec!(50)).unwrap(),
//! ];
//!
//! let positions = PositionAggregator::new(RollupConfig::default())
//!     .aggregate(&items, &profile)
//!     .unwrap();
//! let tender = TenderRollupAggregator::aggregate(&TenderId::new("T-1"), &positions).unwrap();
//! assert_eq!(tender.commercial_total, dec!(165));
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel processing for large tenders

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod parallel;
pub mod position;
pub mod tender;

pub use config::RollupConfig;
pub use parallel::{maybe_parallel_fold, maybe_parallel_map};
pub use position::PositionAggregator;
pub use tender::TenderRollupAggregator;
