//! # Tender Traits
//!
//! Trait definitions for the collaborators of the recalculation engine.
//!
//! This crate contains ONLY trait definitions and the records they exchange.
//! Implementations live in separate extension crates.
//!
//! ## Module Structure
//!
//! - [`source`]: Where cost items and the active markup profile come from
//! - [`sink`]: Where recomputed totals go
//!
//! ## Dependency Injection
//!
//! The orchestrator receives its collaborators explicitly:
//!
//! ```ignore
//! RecalculationOrchestrator::new(items_source, profile_source, totals_sink, config)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use error::TraitError;
pub use sink::{TotalsRecord, TotalsSink};
pub use source::{CostItemSource, MarkupProfileSource};
