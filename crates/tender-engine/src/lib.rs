//! # Tender Engine
//!
//! The recalculation engine for Tender.
//!
//! This crate provides:
//! - [`RecalculationOrchestrator`]: Loads a tender, recomputes it and persists the totals
//! - [`recalculate_snapshot`] and [`recalculate_snapshot_at`]: The same calculation over in-memory data
//! - [`RecalculationReport`]: Totals plus the items that were rejected
//! - [`EngineConfig`]: Sanity thresholds, persistence policy and rollup settings
//!
//! ## Architecture
//!
//! ```text
//! MarkupProfileSource ─┐
//!                      ├─> classify ─> cascade ─> sanity check ─┬─> PositionAggregator
//! CostItemSource ──────┘                                       │        │
//!                                                              │        v
//!                                                              │   TenderRollupAggregator
//!                                                              v        │
//!                                                         ItemIssues    v
//!                                                                  TotalsSink
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use tender_core::{MarkupProfile, RawCostItem, TenderId};
//! use tender_engine::{recalculate_snapshot, EngineConfig};
//!
//! let profile = MarkupProfile::builder()
//!     .subcontract_works_growth_pct(dec!(10))
//!     .overhead_subcontract_pct(dec!(10))
//!     .profit_subcontract_pct(dec!(16))
//!     .build()
//!     .unwrap();
//! let items = vec![RawCostItem::new("I-1", "P-1", "sub_work", Some(dec!(500000)))];
//!
//! let report =
//!     recalculate_snapshot(&EngineConfig::default(), &TenderId::new("T-1"), &profile, &items)
//!         .unwrap();
//! assert!(report.complete);
//! assert_eq!(report.tender_totals.commercial_total, dec!(701800));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;

// Re-exports
pub use builder::RecalculationOrchestratorBuilder;
pub use config::{EngineConfig, PersistPolicy};
pub use error::EngineError;
pub use orchestrator::{recalculate_snapshot, recalculate_snapshot_at, RecalculationOrchestrator};
pub use report::{BatchOutcome, BatchRecalculation, IssueKind, ItemIssue, RecalculationReport};
