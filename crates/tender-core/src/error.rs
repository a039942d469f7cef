//! Error types for the Tender library.
//!
//! This module defines the error types raised by the pure calculation path:
//! item validation, profile validation, the magnitude sanity check and
//! decimal overflow.

use rust_decimal::Decimal;
use thiserror::Error;

/// A specialized Result type for Tender operations.
pub type TenderResult<T> = Result<T, TenderError>;

/// The main error type for Tender calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TenderError {
    /// A category tag outside the four recognized values.
    #[error("Unknown cost category: '{tag}'")]
    UnknownCategory {
        /// The tag as supplied.
        tag: String,
    },

    /// A negative base amount.
    #[error("Negative base amount: {amount}")]
    NegativeBaseAmount {
        /// The offending amount.
        amount: Decimal,
    },

    /// An item failed validation.
    #[error("Invalid item '{item_id}': {reason}")]
    InvalidInput {
        /// Identifier of the rejected item.
        item_id: String,
        /// Why the item was rejected.
        reason: String,
    },

    /// A commercial amount exceeded the allowed multiple of its base.
    #[error(
        "Sanity check failed for item '{item_id}': commercial {commercial} exceeds {factor}x base {base}"
    )]
    SanityCheckFailed {
        /// Identifier of the item.
        item_id: String,
        /// Base amount of the item.
        base: Decimal,
        /// The rejected commercial amount.
        commercial: Decimal,
        /// The configured maximum multiple.
        factor: Decimal,
    },

    /// A markup percentage failed validation.
    #[error("Invalid markup profile: {field} = {value}")]
    InvalidProfile {
        /// Field name (camelCase, as serialized).
        field: String,
        /// The rejected value.
        value: Decimal,
    },

    /// Decimal overflow or division failure.
    #[error("Arithmetic error: {reason}")]
    Arithmetic {
        /// Description of the failure.
        reason: String,
    },
}

impl TenderError {
    /// Creates an invalid input error for an item.
    #[must_use]
    pub fn invalid_input(item_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            item_id: item_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an arithmetic error.
    #[must_use]
    pub fn arithmetic(reason: impl Into<String>) -> Self {
        Self::Arithmetic {
            reason: reason.into(),
        }
    }

    /// Attaches an item identifier to an item-level input error.
    ///
    /// Errors that already carry an item id, and non-input errors, are returned unchanged.
    #[must_use]
    pub fn for_item(self, item_id: &str) -> Self {
        match self {
            Self::UnknownCategory { tag } => {
                Self::invalid_input(item_id, format!("unknown category '{tag}'"))
            }
            Self::NegativeBaseAmount { amount } => {
                Self::invalid_input(item_id, format!("negative base amount {amount}"))
            }
            other => other,
        }
    }

    /// Returns true for errors caused by the item's own data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCategory { .. } | Self::NegativeBaseAmount { .. } | Self::InvalidInput { .. }
        )
    }
}
