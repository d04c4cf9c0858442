//! # Collaborator Traits
//!
//! What the sale form needs from the backend. The form only ever holds
//! `Arc<dyn …>` handles, so tests swap in in-memory fakes.

use async_trait::async_trait;
use counter_core::{Category, Product, Sale};

use crate::error::ClientResult;

/// Source of the category picker contents.
#[async_trait]
pub trait CategoryProvider: Send + Sync {
    /// Returns every category.
    async fn get_all(&self) -> ClientResult<Vec<Category>>;
}

/// Product lookups and stock persistence.
#[async_trait]
pub trait ProductProvider: Send + Sync {
    /// Returns the products stocked at a branch.
    async fn get_all_for_branch(&self, branch_id: i64) -> ClientResult<Vec<Product>>;

    /// Returns the products filed under a category name.
    async fn find_by_category_name(&self, name: &str) -> ClientResult<Vec<Product>>;

    /// Persists a product, including its stock level.
    async fn update(&self, product: &Product) -> ClientResult<()>;
}

/// Persists sale records.
#[async_trait]
pub trait SaleRecorder: Send + Sync {
    async fn create(&self, sale: &Sale) -> ClientResult<()>;
}
