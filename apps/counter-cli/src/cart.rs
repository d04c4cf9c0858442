//! Cart file: the rows and header a counter session would have typed in.
//!
//! ```json
//! {
//!   "customerName": "Rahim Uddin",
//!   "date": "2026-10-18",
//!   "discount": 500,
//!   "items": [
//!     { "category": "Analgesic", "product": "Napa 500mg", "quantity": 2 }
//!   ]
//! }
//! ```
//! `date` defaults to today and `discount` (cents) to zero.

use std::path::Path;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use counter_core::{Category, Money};
use counter_form::SaleFormController;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFile {
    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub discount: Money,

    pub items: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub category: String,
    pub product: String,
    pub quantity: i64,
}

impl CartFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading cart file {}", path.display()))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let cart: CartFile = serde_json::from_str(contents).context("parsing cart file")?;
        if cart.items.is_empty() {
            bail!("cart file has no items");
        }
        Ok(cart)
    }

    /// Enters the cart into the form the way a cashier would.
    ///
    /// Lines whose product is not offered for their category are skipped
    /// with a warning; the row stays on the form unresolved.
    pub async fn fill(&self, controller: &SaleFormController) -> anyhow::Result<()> {
        controller.set_customer_name(self.customer_name.clone());
        if let Some(date) = self.date {
            controller.set_date(date);
        }
        controller.set_discount(self.discount);

        for (position, line) in self.items.iter().enumerate() {
            let index = if position < controller.row_count() {
                position
            } else {
                controller.add_row()
            };

            controller.set_category(index, Some(Category::new(line.category.clone())))?;
            controller.on_category_change(index).await?;

            if !controller.select_product(index, &line.product)? {
                warn!(
                    index,
                    product = %line.product,
                    category = %line.category,
                    "Product not offered for category, leaving row unresolved"
                );
                continue;
            }

            controller.set_quantity(index, Some(line.quantity))?;
            debug!(index, product = %line.product, quantity = line.quantity, "Cart line entered");
        }

        Ok(())
    }
}
