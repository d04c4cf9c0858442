//! # Error Types
//!
//! Domain-specific error types for counter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  counter-core errors (this file)                                       │
//! │  ├── CoreError        - Row addressing and sale gate failures          │
//! │  └── ValidationError  - Field validity findings                        │
//! │                                                                         │
//! │  counter-client errors (separate crate)                                │
//! │  └── ClientError      - Backend call failures                          │
//! │                                                                         │
//! │  counter-form errors (separate crate)                                  │
//! │  └── FormError        - What the hosting UI sees                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A row index does not address an existing row.
    ///
    /// ## When This Occurs
    /// - The UI sends an event for a row that was already removed
    /// - An async lookup completes after its row disappeared
    #[error("Row {index} out of range (form has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Quantity was edited before a product was chosen for the row.
    #[error("Quantity of row {index} is disabled until a product is selected")]
    QuantityDisabled { index: usize },

    /// The sale contains products past their expiry date.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Save"
    ///      │
    ///      ▼
    /// Scan rows: "Napa" expired 2024-01-01
    ///      │
    ///      ▼
    /// ExpiredProducts { names: ["Napa"] }
    ///      │
    ///      ▼
    /// UI alert: "Cannot sell expired products: Napa"
    /// ```
    #[error("Cannot sell expired products:\n{}", .names.join(", "))]
    ExpiredProducts { names: Vec<String> },

    /// An edit was refused, e.g. a quantity above the per-item maximum.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation findings.
///
/// Field names follow the form layout, e.g. `products[1].quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Too many rows in the form.
    #[error("A sale cannot have more than {max} items")]
    TooManyItems { max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
