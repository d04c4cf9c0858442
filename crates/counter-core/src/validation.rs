//! # Validation Module
//!
//! Field validity checks for the sale form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end                                                    │
//! │  └── Marks invalid inputs, disables "Save" using validate_form()       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit gate (sale::check_expiry)                             │
//! │  └── The only check that blocks create_sale                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Owns persistence constraints                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Findings are reported, never enforced: submission is gated only by the
//! expiry check.

use crate::error::ValidationError;
use crate::line_items::{LineItem, LineItems};
use crate::money::Money;
use crate::sale::SaleHeader;
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates the customer name.
///
/// ## Example
/// ```rust
/// use counter_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Rahim Uddin").is_ok());
/// assert!(validate_customer_name("   ").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customerName".to_string(),
        });
    }
    Ok(())
}

/// Validates a row quantity.
///
/// ## Rules
/// - Must be present
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(field: &str, quantity: Option<i64>) -> ValidationResult<i64> {
    let Some(quantity) = quantity else {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    };

    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(quantity)
}

/// Validates the discount.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }
    Ok(())
}

/// Checks one row; field names are prefixed `products[index]`.
pub fn validate_row(index: usize, item: &LineItem) -> Vec<ValidationError> {
    let prefix = format!("products[{}]", index);
    let mut errors = Vec::new();

    if item.category.as_ref().map_or(true, |c| c.is_blank()) {
        errors.push(ValidationError::Required {
            field: format!("{}.category", prefix),
        });
    }

    if item.name.trim().is_empty() {
        errors.push(ValidationError::Required {
            field: format!("{}.name", prefix),
        });
    }

    if let Err(e) = validate_quantity(&format!("{}.quantity", prefix), item.quantity) {
        errors.push(e);
    }

    errors
}

/// Checks the whole form and returns every finding.
pub fn validate_form(header: &SaleHeader, rows: &LineItems) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = validate_customer_name(&header.customer_name) {
        errors.push(e);
    }

    if let Err(e) = validate_discount(header.discount) {
        errors.push(e);
    }

    if rows.len() > MAX_LINE_ITEMS {
        errors.push(ValidationError::TooManyItems {
            max: MAX_LINE_ITEMS,
        });
    }

    for (index, item) in rows.items().enumerate() {
        errors.extend(validate_row(index, item));
    }

    errors
}
