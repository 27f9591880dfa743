//! # Error Types
//!
//! Structured error types for quote_core. Every error is serializable so the
//! caller (UI, document renderer, CLI) can show it as-is or act on it
//! programmatically.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn validate_width(width_mm: f64) -> QuoteResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(QuoteError::InvalidInput {
//!             field: "width_mm".to_string(),
//!             value: width_mm.to_string(),
//!             reason: "Width must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for cutting and pricing operations.
///
/// Every variant is recovered at the call boundary: a bad line is rejected,
/// the rest of the quote is untouched.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (out of range, wrong combination, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required measurement or selection is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Catalog lookup returned nothing for the identifier
    #[error("Catalog item not found: {item_id}")]
    CatalogItemNotFound { item_id: String },

    /// Catalog item exists but is priced by another unit than the one needed
    #[error("Catalog item '{item_id}' is priced by {found}, expected {expected}")]
    UnitMismatch {
        item_id: String,
        expected: String,
        found: String,
    },

    /// No cutting strategy is known for the family/panel-count combination
    #[error("No cutting rule for {family} with {panel_count} panel(s)")]
    UnresolvableTopology { family: String, panel_count: u8 },

    /// The formula string could not be tokenized, parsed or evaluated
    #[error("Malformed formula '{formula}': {reason}")]
    MalformedFormula { formula: String, reason: String },

    /// A structural offset is larger than the opening
    #[error("Negative {dimension} for {panel} panel: {value_mm} mm")]
    NegativeDimension {
        panel: String,
        dimension: String,
        value_mm: f64,
    },

    /// Quote line id is not part of the quote
    #[error("Quote line not found: {line_id}")]
    LineNotFound { line_id: String },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        QuoteError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CatalogItemNotFound error
    pub fn catalog_item_not_found(item_id: impl Into<String>) -> Self {
        QuoteError::CatalogItemNotFound {
            item_id: item_id.into(),
        }
    }

    /// Create a UnitMismatch error
    pub fn unit_mismatch(item_id: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        QuoteError::UnitMismatch {
            item_id: item_id.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an UnresolvableTopology error
    pub fn unresolvable_topology(family: impl Into<String>, panel_count: u8) -> Self {
        QuoteError::UnresolvableTopology {
            family: family.into(),
            panel_count,
        }
    }

    /// Create a MalformedFormula error
    pub fn malformed_formula(formula: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::MalformedFormula {
            formula: formula.into(),
            reason: reason.into(),
        }
    }

    /// Create a NegativeDimension error
    pub fn negative_dimension(panel: impl Into<String>, dimension: impl Into<String>, value_mm: f64) -> Self {
        QuoteError::NegativeDimension {
            panel: panel.into(),
            dimension: dimension.into(),
            value_mm,
        }
    }

    /// Create a LineNotFound error
    pub fn line_not_found(line_id: impl Into<String>) -> Self {
        QuoteError::LineNotFound {
            line_id: line_id.into(),
        }
    }

    /// Whether the caller must refuse to add/keep the line in the quote.
    ///
    /// Only a missing line id is an error about the quote itself rather
    /// than about the line being computed.
    pub fn blocks_line(&self) -> bool {
        !matches!(self, QuoteError::LineNotFound { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::MissingField { .. } => "MISSING_FIELD",
            QuoteError::CatalogItemNotFound { .. } => "CATALOG_ITEM_NOT_FOUND",
            QuoteError::UnitMismatch { .. } => "UNIT_MISMATCH",
            QuoteError::UnresolvableTopology { .. } => "UNRESOLVABLE_TOPOLOGY",
            QuoteError::MalformedFormula { .. } => "MALFORMED_FORMULA",
            QuoteError::NegativeDimension { .. } => "NEGATIVE_DIMENSION",
            QuoteError::LineNotFound { .. } => "LINE_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = QuoteError::negative_dimension("fixed", "height", -20.0);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("NegativeDimension"));
        let roundtrip: QuoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(QuoteError::missing_field("width_mm").error_code(), "MISSING_FIELD");
        assert_eq!(
            QuoteError::malformed_formula("L_TOTAL * FOO", "unknown identifier").error_code(),
            "MALFORMED_FORMULA"
        );
        assert_eq!(QuoteError::unresolvable_topology("Mirror", 3).error_code(), "UNRESOLVABLE_TOPOLOGY");
    }

    #[test]
    fn test_blocks_line() {
        assert!(QuoteError::catalog_item_not_found("vidro-8mm").blocks_line());
        assert!(QuoteError::unresolvable_topology("ShowerBox", 6).blocks_line());
        assert!(!QuoteError::line_not_found("abc").blocks_line());
    }

    #[test]
    fn test_display_message() {
        let error = QuoteError::unresolvable_topology("Sliding window", 6);
        assert_eq!(error.to_string(), "No cutting rule for Sliding window with 6 panel(s)");
    }
}
