//! # Sale Assembly
//!
//! The pure half of submitting the form: the expiry gate and turning rows
//! into a [`Sale`] payload against the local product cache.
//!
//! ## Submit Pipeline (pure steps)
//! ```text
//! rows ──► check_expiry(today) ──► assemble_sale(header, rows, total, cache)
//!               │                            │
//!               ▼                            ▼
//!     ExpiredProducts{names}        Sale { items: resolved rows only }
//!     (nothing else happens)        cache stock decremented per row
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::line_items::LineItem;
use crate::money::Money;
use crate::types::{Product, Sale, SaleLine};

/// The form fields outside the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleHeader {
    pub customer_name: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub discount: Money,
}

impl SaleHeader {
    /// A blank header dated `today` with no discount.
    pub fn new(today: NaiveDate) -> Self {
        SaleHeader {
            customer_name: String::new(),
            date: today,
            discount: Money::zero(),
        }
    }
}

/// Names of the rows expiring on or before `today`, in row order.
pub fn expired_product_names<'a, I>(items: I, today: NaiveDate) -> Vec<String>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items
        .into_iter()
        .filter(|item| item.is_expired_on(today))
        .map(|item| item.name.clone())
        .collect()
}

/// Fails with [`CoreError::ExpiredProducts`] when any row is expired.
pub fn check_expiry<'a, I>(items: I, today: NaiveDate) -> CoreResult<()>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let names = expired_product_names(items, today);
    if names.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ExpiredProducts { names })
    }
}

/// Builds the sale payload and applies in-memory stock decrements.
///
/// ## Behavior
/// - Each row is matched to the cached product with the same id
/// - A matched product's cached stock drops by the row quantity, and the
///   sale line carries the product as it stands after that decrement
/// - Rows without a matching cached product are left out
/// - The same product on two rows is decremented twice
pub fn assemble_sale<'a, I>(
    header: &SaleHeader,
    items: I,
    total_price: Money,
    catalogue: &mut [Product],
) -> Sale
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut lines = Vec::new();

    for item in items {
        let Some(product_id) = item.product_id else {
            continue;
        };
        let Some(cached) = catalogue.iter_mut().find(|p| p.id == product_id) else {
            continue;
        };

        let quantity = item.quantity.unwrap_or(0);
        cached.stock = cached.stock.saturating_sub(quantity);
        lines.push(SaleLine {
            product: cached.clone(),
            quantity,
        });
    }

    Sale {
        customer_name: header.customer_name.clone(),
        date: header.date,
        items: lines,
        total_price,
        discount: header.discount,
    }
}
