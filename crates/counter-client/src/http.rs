//! HTTP implementation of the backend collaborators

use std::time::Duration;

use async_trait::async_trait;
use counter_core::{Category, Product, Sale};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::{ClientError, ClientResult};
use crate::provider::{CategoryProvider, ProductProvider, SaleRecorder};

/// JSON-over-REST client for the sales backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a client from validated configuration.
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Joins `path` onto the base URL.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::handle_json(response).await
    }

    /// Maps a non-success status to an error, draining the body for context.
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await?;
        Err(status_error(status, body))
    }

    async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        response.json().await.map_err(Into::into)
    }
}

/// Classifies a non-success status.
fn status_error(status: StatusCode, body: String) -> ClientError {
    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(body),
        other => ClientError::Status {
            status: other.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl CategoryProvider for HttpBackend {
    async fn get_all(&self) -> ClientResult<Vec<Category>> {
        self.get("category").await
    }
}

#[async_trait]
impl ProductProvider for HttpBackend {
    async fn get_all_for_branch(&self, branch_id: i64) -> ClientResult<Vec<Product>> {
        self.get(&format!("product/branch/{}", branch_id)).await
    }

    async fn find_by_category_name(&self, name: &str) -> ClientResult<Vec<Product>> {
        let url = self.url("product/category");
        debug!(%url, name, "GET by category");
        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .send()
            .await?;
        Self::handle_json(response).await
    }

    async fn update(&self, product: &Product) -> ClientResult<()> {
        let url = self.url(&format!("product/{}", product.id));
        debug!(%url, stock = product.stock, "PUT product");
        let response = self.client.put(&url).json(product).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SaleRecorder for HttpBackend {
    async fn create(&self, sale: &Sale) -> ClientResult<()> {
        let url = self.url("sales");
        debug!(%url, items = sale.items.len(), "POST sale");
        let response = self.client.post(&url).json(sale).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
