//! # Sale Form State
//!
//! Everything the sale page shows, behind one lock.
//!
//! ## Thread Safety
//! The form is wrapped in `Arc<Mutex<T>>` because the controller's field
//! handlers, the debounced total watcher and in-flight category lookups all
//! touch it. Every access is a short synchronous closure; the lock is never
//! held across an `.await`.
//!
//! ## State Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Form State Operations                           │
//! │                                                                         │
//! │  UI Event                Controller                 State Change        │
//! │  ────────                ──────────                 ────────────        │
//! │                                                                         │
//! │  Click "Add" ──────────► add_row() ──────────────► rows.push(row)      │
//! │                                                                         │
//! │  Pick category ────────► on_category_change() ───► rows[i].candidates  │
//! │                                                                         │
//! │  Pick name ────────────► select_product() ───────► rows[i] resolved    │
//! │                                                                         │
//! │  Click "Remove" ───────► remove_row() ───────────► rows.remove(i)      │
//! │                                                     total recomputed   │
//! │                                                                         │
//! │  (300ms quiet) ────────► total watcher ──────────► total recomputed    │
//! │                                                                         │
//! │  Submit ───────────────► create_sale() ──────────► products[*].stock   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use counter_core::sale::SaleHeader;
use counter_core::validation::validate_form;
use counter_core::{Category, LineItems, Money, Product, ValidationError};
use serde::{Deserialize, Serialize};

/// The sale form.
///
/// ## Invariants
/// - `rows[i].candidates` always belongs to `rows[i]`
/// - `total` is only as fresh as the last recomputation; edits between
///   recomputations leave it stale until the watcher fires
/// - `products` is the branch product cache; submission decrements it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleForm {
    pub header: SaleHeader,

    pub rows: LineItems,

    /// Last computed sum of quantity × unit price.
    pub total: Money,

    /// Whether the total field is editable; only set by submission.
    pub total_enabled: bool,

    /// Category picker contents.
    pub categories: Vec<Category>,

    /// Products stocked at the configured branch.
    pub products: Vec<Product>,
}

impl SaleForm {
    /// An empty form dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        SaleForm {
            header: SaleHeader::new(today),
            rows: LineItems::new(),
            total: Money::zero(),
            total_enabled: false,
            categories: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Recomputes `total` from the rows and returns it.
    pub fn recalculate_total(&mut self) -> Money {
        self.total = self.rows.total();
        self.total
    }

    /// Field validity report.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        validate_form(&self.header, &self.rows)
    }
}

/// Shared handle to the form.
#[derive(Debug, Clone)]
pub struct FormState {
    form: Arc<Mutex<SaleForm>>,
}

impl FormState {
    pub fn new(form: SaleForm) -> Self {
        FormState {
            form: Arc::new(Mutex::new(form)),
        }
    }

    /// Executes a function with read access to the form.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = state.with_form(|form| form.total);
    /// ```
    pub fn with_form<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SaleForm) -> R,
    {
        let form = self.form.lock().expect("Form mutex poisoned");
        f(&form)
    }

    /// Executes a function with write access to the form.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_form_mut(|form| form.rows.add_row());
    /// ```
    pub fn with_form_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SaleForm) -> R,
    {
        let mut form = self.form.lock().expect("Form mutex poisoned");
        f(&mut form)
    }
}
