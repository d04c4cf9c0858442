//! In-memory collaborators for controller tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use counter_client::{CategoryProvider, ClientError, ClientResult, ProductProvider, SaleRecorder};
use counter_core::{Branch, Category, Money, Product, Sale};
use tokio::sync::Notify;

use crate::controller::Collaborators;
use crate::ui::{Navigator, Notifier};

pub fn product(id: i64, name: &str, price_cents: i64, stock: i64, branch: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        unit_price: Money::from_cents(price_cents),
        stock,
        expiry_date: None,
        branch: Some(Branch::new(branch)),
        category: Some(Category::new("Analgesic")),
    }
}

pub fn expiring(mut product: Product, date: NaiveDate) -> Product {
    product.expiry_date = Some(date);
    product
}

fn backend_down() -> ClientError {
    ClientError::Status {
        status: 503,
        body: "backend down".to_string(),
    }
}

/// Calls observed by [`FakeBackend`].
#[derive(Debug, Default)]
pub struct Calls {
    pub branch_ids: Vec<i64>,
    pub lookups: Vec<String>,
    pub sales: Vec<Sale>,
    pub updates: Vec<Product>,
}

/// Recording backend with switchable failures.
#[derive(Default)]
pub struct FakeBackend {
    pub categories: Vec<Category>,
    pub branch_products: Vec<Product>,
    pub lookup_results: Vec<Product>,

    pub fail_categories: bool,
    pub fail_branch_products: bool,
    pub fail_lookup: bool,
    pub fail_create: bool,
    pub fail_update: bool,

    /// When set, lookups wait for a permit before answering.
    pub lookup_gate: Option<Arc<Notify>>,

    pub calls: Mutex<Calls>,
}

impl FakeBackend {
    pub fn with_catalogue(catalogue: Vec<Product>) -> Self {
        FakeBackend {
            categories: vec![Category::new("Analgesic"), Category::new("Antacid")],
            branch_products: catalogue.clone(),
            lookup_results: catalogue,
            ..Default::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.calls.lock().unwrap().lookups.clone()
    }

    pub fn sales(&self) -> Vec<Sale> {
        self.calls.lock().unwrap().sales.clone()
    }

    pub fn updates(&self) -> Vec<Product> {
        self.calls.lock().unwrap().updates.clone()
    }
}

#[async_trait]
impl CategoryProvider for FakeBackend {
    async fn get_all(&self) -> ClientResult<Vec<Category>> {
        if self.fail_categories {
            return Err(backend_down());
        }
        Ok(self.categories.clone())
    }
}

#[async_trait]
impl ProductProvider for FakeBackend {
    async fn get_all_for_branch(&self, branch_id: i64) -> ClientResult<Vec<Product>> {
        self.calls.lock().unwrap().branch_ids.push(branch_id);
        if self.fail_branch_products {
            return Err(backend_down());
        }
        Ok(self.branch_products.clone())
    }

    async fn find_by_category_name(&self, name: &str) -> ClientResult<Vec<Product>> {
        self.calls.lock().unwrap().lookups.push(name.to_string());
        if let Some(gate) = &self.lookup_gate {
            gate.notified().await;
        }
        if self.fail_lookup {
            return Err(backend_down());
        }
        Ok(self.lookup_results.clone())
    }

    async fn update(&self, product: &Product) -> ClientResult<()> {
        self.calls.lock().unwrap().updates.push(product.clone());
        if self.fail_update {
            return Err(ClientError::NotFound(format!("product {}", product.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl SaleRecorder for FakeBackend {
    async fn create(&self, sale: &Sale) -> ClientResult<()> {
        self.calls.lock().unwrap().sales.push(sale.clone());
        if self.fail_create {
            return Err(backend_down());
        }
        Ok(())
    }
}

/// Records navigations and alerts.
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub navigations: Mutex<Vec<(String, Vec<(String, String)>)>>,
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn navigations(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Navigator for RecordingUi {
    fn go_to(&self, route: &str, params: &[(String, String)]) {
        self.navigations
            .lock()
            .unwrap()
            .push((route.to_string(), params.to_vec()));
    }
}

impl Notifier for RecordingUi {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

pub fn collaborators(backend: &Arc<FakeBackend>, ui: &Arc<RecordingUi>) -> Collaborators {
    Collaborators {
        categories: backend.clone(),
        products: backend.clone(),
        sales: backend.clone(),
        navigator: ui.clone(),
        notifier: ui.clone(),
    }
}
