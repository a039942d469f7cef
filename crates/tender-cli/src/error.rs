//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Tender not present in the snapshot.
    #[error("Tender '{0}' not found in snapshot")]
    TenderNotFound(String),

    /// Item not present in the tender.
    #[error("Item '{item}' not found in tender '{tender}'")]
    ItemNotFound {
        /// Tender searched.
        tender: String,
        /// Item requested.
        item: String,
    },

    /// Tender has no active profile.
    #[error("Tender '{0}' has no active markup profile")]
    NoProfile(String),

    /// Some tenders could not be recalculated.
    #[error("{failed} of {total} tenders failed")]
    BatchFailed {
        /// Failed tenders.
        failed: usize,
        /// All tenders.
        total: usize,
    },
}
