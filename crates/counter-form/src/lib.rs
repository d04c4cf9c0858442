//! # counter-form: Sale Form Controller
//!
//! Owns the sale-creation form and everything that happens to it between
//! page load and the invoice view.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          counter-form                                   │
//! │                                                                         │
//! │   ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐  │
//! │   │   controller    │──►│      form       │◄──│      debounce       │  │
//! │   │ SaleForm-       │   │ FormState       │   │ TotalWatcher        │  │
//! │   │ Controller      │   │ Arc<Mutex<..>>  │   │ (timer reset task)  │  │
//! │   └───────┬─────────┘   └─────────────────┘   └─────────────────────┘  │
//! │           │                                                             │
//! │           ├──► counter-client providers (categories, products, sales)  │
//! │           └──► ui::Navigator / ui::Notifier                            │
//! │                                                                         │
//! │   config: FormConfig (TOML + COUNTER_* env)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,ignore
//! let config = FormConfig::load(None)?;
//! let backend = HttpBackend::new(&config.backend)?;
//! let ui = Arc::new(NoOpUi);
//! let controller =
//!     SaleFormController::init(config, Collaborators::http(backend, ui.clone(), ui)).await;
//!
//! controller.set_category(0, Some(Category::new("Analgesic")))?;
//! controller.on_category_change(0).await?;
//! controller.select_product(0, "Napa 500mg")?;
//! controller.set_quantity(0, Some(2))?;
//! let outcome = controller.create_sale().await?;
//! ```

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod form;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use config::FormConfig;
pub use controller::{Collaborators, SaleFormController, StockUpdates, SubmitOutcome};
pub use error::{FormError, FormResult};
pub use form::{FormState, SaleForm};
pub use ui::{Navigator, NoOpUi, Notifier};
