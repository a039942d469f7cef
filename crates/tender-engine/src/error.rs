//! Engine error types.

use tender_core::{TenderError, TenderId};
use tender_traits::TraitError;
use thiserror::Error;

/// Engine error type.
///
/// Every variant aborts the whole recalculation; per-item problems are
/// reported in the [`RecalculationReport`](crate::RecalculationReport) instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No active markup profile for the tender
    #[error("no active markup profile for tender {tender_id}")]
    ConfigurationMissing {
        /// Tender that was requested.
        tender_id: TenderId,
    },

    /// Reading items or the profile failed
    #[error("source error: {0}")]
    Source(TraitError),

    /// Persisting totals failed
    #[error("sink error: {0}")]
    Sink(TraitError),

    /// Aggregation failed
    #[error("calculation error: {0}")]
    Calculation(#[from] TenderError),

    /// Engine configuration is invalid or unreadable
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl EngineError {
    /// Returns true when the tender has no active profile.
    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, EngineError::ConfigurationMissing { .. })
    }
}
