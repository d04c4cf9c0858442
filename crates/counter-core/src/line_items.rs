//! # Line Items
//!
//! The ordered, growable list of product rows on the sale form.
//!
//! ## Row Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Row Lifecycle                                   │
//! │                                                                         │
//! │  add_row() ──► [empty, qty disabled]                                   │
//! │                     │                                                   │
//! │        category picked + lookup done                                    │
//! │                     ▼                                                   │
//! │  set_candidates() ──► [candidates loaded, selection reset]             │
//! │                     │                                                   │
//! │        name picked from candidates                                      │
//! │                     ▼                                                   │
//! │  select_product() ──► [id/price/stock/expiry filled, qty enabled]      │
//! │                     │                                                   │
//! │  remove_row() ──► row and its candidates leave together                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Alignment
//! Each [`LineRow`] owns its candidate list, so the "filtered products at
//! index i" always belong to row i. Removing a row shifts both at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing;
use crate::types::{Category, Product};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Line Item
// =============================================================================

/// The editable fields of one row.
///
/// Blank numeric inputs are `None` and count as zero in totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Stable key for list rendering; survives removal of other rows.
    pub key: String,

    /// Id of the resolved product.
    pub product_id: Option<i64>,

    pub category: Option<Category>,

    /// Selected product name.
    pub name: String,

    pub quantity: Option<i64>,

    /// Quantity input is only editable once a product is resolved.
    pub quantity_enabled: bool,

    pub unit_price: Option<Money>,

    /// Stock of the selected product, shown read-only.
    pub stock: Option<i64>,

    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

impl LineItem {
    /// Creates an empty row with quantity disabled.
    pub fn new() -> Self {
        LineItem {
            key: Uuid::new_v4().to_string(),
            product_id: None,
            category: None,
            name: String::new(),
            quantity: None,
            quantity_enabled: false,
            unit_price: None,
            stock: None,
            expiry_date: None,
        }
    }

    /// Returns quantity × unit price with blanks as zero.
    pub fn line_total(&self) -> Money {
        self.unit_price
            .unwrap_or_default()
            .multiply_quantity(self.quantity.unwrap_or(0))
    }

    /// True when the row's product expires on or before `today`.
    ///
    /// The expiry date is the first day the product may no longer be sold.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|date| date <= today)
    }

    /// Copies the product's details into the row and enables quantity.
    pub fn apply_product(&mut self, product: &Product) {
        self.product_id = Some(product.id);
        self.unit_price = Some(product.unit_price);
        self.stock = Some(product.stock);
        self.expiry_date = product.expiry_date;
        self.quantity_enabled = true;
    }

    /// Clears the selection after a category change.
    ///
    /// `product_id` and `category` are left as they are.
    pub fn reset_selection(&mut self) {
        self.name.clear();
        self.unit_price = None;
        self.stock = None;
        self.quantity = Some(0);
        self.quantity_enabled = false;
        self.expiry_date = None;
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Line Row
// =============================================================================

/// A row and the category-filtered products its name picker offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineRow {
    pub item: LineItem,
    pub candidates: Vec<Product>,
}

// =============================================================================
// Line Items
// =============================================================================

/// All rows of the form, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItems {
    rows: Vec<LineRow>,
}

impl LineItems {
    /// Creates an empty list.
    pub fn new() -> Self {
        LineItems { rows: Vec::new() }
    }

    /// Appends an empty row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(LineRow::default());
        self.rows.len() - 1
    }

    /// Removes the row at `index` together with its candidate list.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<LineRow> {
        self.check_index(index)?;
        Ok(self.rows.remove(index))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LineRow> {
        self.rows.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut LineRow> {
        self.rows.get_mut(index)
    }

    /// Like [`get_mut`](Self::get_mut) but reports a missing row as an error.
    pub fn row_mut(&mut self, index: usize) -> CoreResult<&mut LineRow> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(CoreError::RowOutOfRange { index, len })
    }

    /// Iterates over rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = &LineRow> {
        self.rows.iter()
    }

    /// Iterates over the editable fields of every row.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.rows.iter().map(|row| &row.item)
    }

    /// Candidate products for a row; empty when none were loaded or the row
    /// does not exist.
    pub fn candidates(&self, index: usize) -> &[Product] {
        self.rows
            .get(index)
            .map(|row| row.candidates.as_slice())
            .unwrap_or(&[])
    }

    /// Stores a row's filtered candidates and resets its selection.
    pub fn set_candidates(&mut self, index: usize, candidates: Vec<Product>) -> CoreResult<()> {
        let row = self.row_mut(index)?;
        row.candidates = candidates;
        row.item.reset_selection();
        Ok(())
    }

    /// Sets a row's product name and resolves it against the row's own
    /// candidates.
    ///
    /// ## Returns
    /// - `Ok(true)` when a candidate matched and the row was filled in
    /// - `Ok(false)` when no candidate carries that name (row keeps its
    ///   previous id/price/stock/expiry)
    pub fn select_product(&mut self, index: usize, name: &str) -> CoreResult<bool> {
        let row = self.row_mut(index)?;
        row.item.name = name.to_string();

        match row.candidates.iter().find(|p| p.name == name) {
            Some(product) => {
                row.item.apply_product(product);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Sets a row's quantity. `None` clears the input.
    ///
    /// ## Errors
    /// - [`CoreError::QuantityDisabled`] until a product has been resolved
    ///   for the row
    /// - [`CoreError::Validation`] for a negative quantity or one above
    ///   [`MAX_ITEM_QUANTITY`]; the row keeps its previous quantity
    pub fn set_quantity(&mut self, index: usize, quantity: Option<i64>) -> CoreResult<()> {
        let row = self.row_mut(index)?;
        if !row.item.quantity_enabled {
            return Err(CoreError::QuantityDisabled { index });
        }

        if let Some(qty) = quantity {
            let field = format!("products[{}].quantity", index);
            if qty < 0 {
                return Err(ValidationError::MustNotBeNegative { field }.into());
            }
            if qty > MAX_ITEM_QUANTITY {
                return Err(ValidationError::OutOfRange {
                    field,
                    min: 0,
                    max: MAX_ITEM_QUANTITY,
                }
                .into());
            }
        }

        row.item.quantity = quantity;
        Ok(())
    }

    /// Current index of the row with the given key.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.item.key == key)
    }

    /// Sum of quantity × unit price over all rows.
    pub fn total(&self) -> Money {
        pricing::compute_total(self.items())
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(CoreError::RowOutOfRange {
                index,
                len: self.rows.len(),
            })
        }
    }
}
