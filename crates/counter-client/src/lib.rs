//! # counter-client: Backend Collaborators
//!
//! The seams between the sale form and the sales backend.
//!
//! ## Module Organization
//! ```text
//! counter_client/
//! ├── lib.rs       ◄─── You are here
//! ├── provider.rs  ◄─── CategoryProvider, ProductProvider, SaleRecorder
//! ├── http.rs      ◄─── HttpBackend: reqwest implementation of all three
//! ├── config.rs    ◄─── BackendConfig (base URL, timeout)
//! └── error.rs     ◄─── ClientError
//! ```
//!
//! ## Endpoints
//! ```text
//! GET  /category                      → Vec<Category>
//! GET  /product/branch/{branchId}     → Vec<Product>
//! GET  /product/category?name={name}  → Vec<Product>
//! PUT  /product/{id}                  ← Product
//! POST /sales                         ← Sale
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod provider;

pub use config::BackendConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use provider::{CategoryProvider, ProductProvider, SaleRecorder};
