//! # Tender Ext Memory
//!
//! In-memory collaborators for the Tender recalculation engine.
//!
//! This crate provides default implementations for tests, the CLI and
//! one-off recalculations:
//! - [`InMemoryStore`]: item source, profile source and totals sink in one
//! - [`TenderSnapshot`]: the JSON document an [`InMemoryStore`] can be loaded from
//!
//! For durable storage, implement the `tender-traits` contracts over a database.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod snapshot;
mod store;

pub use snapshot::*;
pub use store::*;
