//! # counter-core: Pure Business Logic for the Sale Form
//!
//! Everything the sale-creation form computes, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Counter POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web front-end (sale form page)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ field events                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             counter-form (controller, debounce)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ counter-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ line_items│  │  pricing  │  │   sale    │  │   │
//! │  │   │  Product  │  │  LineRow  │  │  totals   │  │  expiry   │  │   │
//! │  │   │   Sale    │  │  LineItem │  │           │  │  payload  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Reference data and the sale payload
//! - [`money`] - Money type with integer arithmetic
//! - [`line_items`] - Ordered rows with their candidate product lists
//! - [`pricing`] - Total calculation
//! - [`sale`] - Expiry gate and sale assembly
//! - [`validation`] - Field validity report
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use counter_core::line_items::LineItems;
//! use counter_core::money::Money;
//!
//! let mut rows = LineItems::new();
//! let index = rows.add_row();
//! let row = rows.get_mut(index).unwrap();
//! row.item.quantity = Some(2);
//! row.item.unit_price = Some(Money::from_cents(1000));
//!
//! assert_eq!(rows.total().cents(), 2000);
//! ```

pub mod error;
pub mod line_items;
pub mod money;
pub mod pricing;
pub mod sale;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use line_items::{LineItem, LineItems, LineRow};
pub use money::Money;
pub use types::*;

/// Maximum rows a single sale form is expected to hold.
///
/// Only reported by the validity check; adding rows is never refused.
pub const MAX_LINE_ITEMS: usize = 100;

/// Maximum quantity of a single row.
pub const MAX_ITEM_QUANTITY: i64 = 999;
