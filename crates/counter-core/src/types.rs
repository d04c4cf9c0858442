//! # Domain Types
//!
//! Reference data and the sale payload exchanged with the backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │     Product     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  id             │   │  customer_name  │       │
//! │  └─────────────────┘   │  name           │   │  date           │       │
//! │                        │  unit_price     │   │  items ─────────┼──┐    │
//! │  ┌─────────────────┐   │  stock          │   │  total_price    │  │    │
//! │  │     Branch      │   │  expiry_date    │   │  discount       │  │    │
//! │  │  ─────────────  │◄──┤  branch         │   └─────────────────┘  │    │
//! │  │  name           │   │  category       │   ┌─────────────────┐  │    │
//! │  └─────────────────┘   └─────────────────┘   │    SaleLine     │◄─┘    │
//! │                                              │  Product + qty  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire format: camelCase JSON, money as integer minor units, dates as
//! `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Reference Data
// =============================================================================

/// A product category shown in the row's category picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category { name: name.into() }
    }

    /// A category with a blank name counts as "not selected".
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// A physical store location scoping product availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Branch { name: name.into() }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as owned by the backend.
///
/// The form keeps a local copy of the branch catalogue; `stock` on that copy
/// is decremented in memory when a sale is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,

    /// Display name, also the value the row's name picker selects by.
    pub name: String,

    /// Price per unit in minor units.
    pub unit_price: Money,

    /// Units on hand.
    pub stock: i64,

    /// Day the product stops being sellable.
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,

    #[serde(default)]
    pub branch: Option<Branch>,

    #[serde(default)]
    pub category: Option<Category>,
}

impl Product {
    /// True when the product is stocked at the branch called `branch_name`.
    pub fn is_in_branch(&self, branch_name: &str) -> bool {
        self.branch
            .as_ref()
            .is_some_and(|branch| branch.name == branch_name)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One line of a submitted sale.
///
/// Snapshot pattern: the product as it stood in the local cache at
/// submission (stock already decremented), plus the quantity sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    #[serde(flatten)]
    pub product: Product,

    pub quantity: i64,
}

/// The sale record sent to the backend and handed to the invoice view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub customer_name: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub items: Vec<SaleLine>,

    pub total_price: Money,

    pub discount: Money,
}

impl Sale {
    /// Serializes the sale for the invoice route parameter.
    pub fn to_invoice_param(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
