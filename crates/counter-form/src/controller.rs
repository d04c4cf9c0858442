//! # Sale Form Controller
//!
//! Drives the sale-creation form: loads reference data, edits rows, keeps
//! the total current and submits the sale.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SaleFormController                                 │
//! │                                                                         │
//! │   Host UI ──► add_row / set_category / on_category_change /            │
//! │               select_product / set_quantity / remove_row / create_sale │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │   ┌──────────────────────────┐      notify_changed()                   │
//! │   │ FormState                │◄──────────────────┐                     │
//! │   │ Arc<Mutex<SaleForm>>     │                   │                     │
//! │   └──────────┬───────────────┘         ┌─────────┴────────┐            │
//! │              │ recalculate_total()     │  TotalWatcher    │            │
//! │              └─────────────────────────│  (300ms quiet)   │            │
//! │                                        └──────────────────┘            │
//! │                                                                         │
//! │   Collaborators (Arc<dyn …>)                                           │
//! │   ─────────────────────────                                            │
//! │   CategoryProvider  ProductProvider  SaleRecorder  Navigator  Notifier │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Containment
//! Backend failures never escape the controller. Loads and lookups log and
//! leave state as it was; a rejected sale is logged and reported through
//! [`SubmitOutcome::NotRecorded`]; stock updates log per item. Only caller
//! mistakes (bad row index, editing a locked quantity) return `Err`.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use counter_client::{CategoryProvider, HttpBackend, ProductProvider, SaleRecorder};
use counter_core::{sale, Category, CoreError, CoreResult, Money, Product, Sale, ValidationError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::FormConfig;
use crate::debounce::{TotalWatcher, TotalWatcherHandle};
use crate::error::FormResult;
use crate::form::{FormState, SaleForm};
use crate::ui::{Navigator, Notifier};

/// Query parameter carrying the serialized sale on the invoice route.
pub const SALE_PARAM: &str = "sale";

// =============================================================================
// Collaborators
// =============================================================================

/// Everything the controller talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub categories: Arc<dyn CategoryProvider>,
    pub products: Arc<dyn ProductProvider>,
    pub sales: Arc<dyn SaleRecorder>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Uses one HTTP backend for all three providers.
    pub fn http(
        backend: HttpBackend,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let backend = Arc::new(backend);
        Collaborators {
            categories: backend.clone(),
            products: backend.clone(),
            sales: backend,
            navigator,
            notifier,
        }
    }
}

// =============================================================================
// Submit Outcome
// =============================================================================

/// In-flight stock update requests started by a successful submission.
///
/// Dropping this detaches the requests; they still run to completion.
#[derive(Debug, Default)]
pub struct StockUpdates {
    handles: Vec<JoinHandle<()>>,
}

impl StockUpdates {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every request to finish. Individual failures were already
    /// logged by the request itself.
    pub async fn join_all(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Stock update task did not complete");
            }
        }
    }
}

/// What `create_sale` did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Expired rows were found; nothing was sent.
    Blocked { expired: Vec<String> },

    /// The sale was recorded and the invoice view opened.
    Submitted { sale: Sale, stock_updates: StockUpdates },

    /// The backend rejected the sale. Cached stock stays decremented.
    NotRecorded { sale: Sale },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted { .. })
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Controller for one sale form.
///
/// Field handlers take `&self`; the form lives behind [`FormState`], so the
/// controller can be shared (`Arc<SaleFormController>`) with the UI layer.
pub struct SaleFormController {
    config: FormConfig,
    collaborators: Collaborators,
    state: FormState,
    watcher: Option<TotalWatcherHandle>,
}

impl SaleFormController {
    /// Creates an empty form and starts its total watcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: FormConfig, collaborators: Collaborators) -> Self {
        let state = FormState::new(SaleForm::new(Local::now().date_naive()));
        let watcher = TotalWatcher::new(state.clone(), config.debounce()).start();

        info!(
            branch_id = config.branch.id,
            branch = %config.branch.name,
            "Sale form created"
        );

        SaleFormController {
            config,
            collaborators,
            state,
            watcher: Some(watcher),
        }
    }

    /// Creates the form, adds the first row and loads reference data.
    pub async fn init(config: FormConfig, collaborators: Collaborators) -> Self {
        let controller = Self::new(config, collaborators);
        controller.add_row();
        controller.load_reference_data().await;
        controller
    }

    /// Fetches categories and branch products concurrently.
    ///
    /// Each list is replaced on success; on failure it keeps its previous
    /// contents and the error is logged.
    pub async fn load_reference_data(&self) {
        let (categories, products) = tokio::join!(
            self.collaborators.categories.get_all(),
            self.collaborators
                .products
                .get_all_for_branch(self.config.branch.id),
        );

        match categories {
            Ok(list) => {
                info!(count = list.len(), "Categories loaded");
                self.state.with_form_mut(|form| form.categories = list);
            }
            Err(e) => error!(error = %e, "Failed to load categories"),
        }

        match products {
            Ok(list) => {
                info!(
                    count = list.len(),
                    branch_id = self.config.branch.id,
                    "Branch products loaded"
                );
                self.state.with_form_mut(|form| form.products = list);
            }
            Err(e) => error!(
                error = %e,
                branch_id = self.config.branch.id,
                "Failed to load branch products"
            ),
        }
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Appends an empty row and returns its index.
    pub fn add_row(&self) -> usize {
        let index = self.state.with_form_mut(|form| form.rows.add_row());
        debug!(index, "Row added");
        self.notify_changed();
        index
    }

    /// Removes a row with its candidates and recomputes the total at once.
    pub fn remove_row(&self, index: usize) -> FormResult<()> {
        let total = self.state.with_form_mut(|form| -> CoreResult<Money> {
            form.rows.remove_row(index)?;
            Ok(form.recalculate_total())
        })?;

        debug!(index, total_cents = total.cents(), "Row removed");
        self.notify_changed();
        Ok(())
    }

    /// Sets a row's category without fetching candidates.
    pub fn set_category(&self, index: usize, category: Option<Category>) -> FormResult<()> {
        self.state
            .with_form_mut(|form| form.rows.row_mut(index).map(|row| row.item.category = category))?;
        self.notify_changed();
        Ok(())
    }

    /// Loads candidates for a row after its category changed.
    ///
    /// ## Behavior
    /// - No-op when the row has no category
    /// - Queries products with the configured lookup term and keeps those
    ///   stocked at the configured branch
    /// - Stores them on the row and resets its selection
    /// - A failed lookup is logged and leaves the row untouched
    ///
    /// The row is tracked by key across the lookup, so removing other rows
    /// meanwhile does not misplace the result. If the row itself was removed
    /// the result is discarded.
    pub async fn on_category_change(&self, index: usize) -> FormResult<()> {
        let (key, category) = self.state.with_form_mut(|form| {
            form.rows
                .row_mut(index)
                .map(|row| (row.item.key.clone(), row.item.category.clone()))
        })?;

        if category.as_ref().map_or(true, |c| c.is_blank()) {
            debug!(index, "Category cleared, skipping product lookup");
            return Ok(());
        }

        let term = &self.config.lookup.category_term;
        let products = match self.collaborators.products.find_by_category_name(term).await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, index, term = %term, "Failed to look up products by category");
                return Ok(());
            }
        };

        let branch = &self.config.branch.name;
        let fetched = products.len();
        let candidates: Vec<Product> = products
            .into_iter()
            .filter(|p| p.is_in_branch(branch))
            .collect();

        let stored = self.state.with_form_mut(|form| {
            let current = form.rows.index_of(&key)?;
            let count = candidates.len();
            form.rows.set_candidates(current, candidates).ok()?;
            Some((current, count))
        });

        match stored {
            Some((current, count)) => {
                debug!(index = current, fetched, kept = count, branch = %branch, "Row candidates loaded");
                self.notify_changed();
            }
            None => warn!(key = %key, "Row removed during product lookup, discarding candidates"),
        }

        Ok(())
    }

    /// Sets a row's product name and resolves it against the row's
    /// candidates. Returns whether a candidate matched.
    pub fn select_product(&self, index: usize, name: &str) -> FormResult<bool> {
        let resolved = self
            .state
            .with_form_mut(|form| form.rows.select_product(index, name))?;

        if resolved {
            debug!(index, name, "Product selected");
        } else {
            debug!(index, name, "No candidate with that name");
        }
        self.notify_changed();
        Ok(resolved)
    }

    /// Sets a row's quantity; only allowed once its product is resolved.
    pub fn set_quantity(&self, index: usize, quantity: Option<i64>) -> FormResult<()> {
        self.state
            .with_form_mut(|form| form.rows.set_quantity(index, quantity))?;
        self.notify_changed();
        Ok(())
    }

    // =========================================================================
    // Header
    // =========================================================================

    /// Sets the customer name typed into the header.
    pub fn set_customer_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state.with_form_mut(|form| form.header.customer_name = name);
    }

    /// Sets the sale date (defaults to the day the form was opened).
    pub fn set_date(&self, date: NaiveDate) {
        self.state.with_form_mut(|form| form.header.date = date);
    }

    /// Sets the discount carried on the sale; the total ignores it.
    pub fn set_discount(&self, discount: Money) {
        self.state.with_form_mut(|form| form.header.discount = discount);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Last computed total.
    pub fn total(&self) -> Money {
        self.state.with_form(|form| form.total)
    }

    /// Recomputes the total immediately.
    pub fn recalculate_total(&self) -> Money {
        self.state.with_form_mut(|form| form.recalculate_total())
    }

    /// A copy of the whole form for rendering.
    pub fn snapshot(&self) -> SaleForm {
        self.state.with_form(SaleForm::clone)
    }

    /// Field validity report; does not gate submission.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        self.state.with_form(|form| form.validation_errors())
    }

    /// Candidate products of a row; empty for unknown rows.
    pub fn candidates(&self, index: usize) -> Vec<Product> {
        self.state.with_form(|form| form.rows.candidates(index).to_vec())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.with_form(|form| form.categories.clone())
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.with_form(|form| form.products.clone())
    }

    pub fn row_count(&self) -> usize {
        self.state.with_form(|form| form.rows.len())
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Submits the sale dated by the local clock.
    pub async fn create_sale(&self) -> FormResult<SubmitOutcome> {
        self.create_sale_on(Local::now().date_naive()).await
    }

    /// Submits the sale, treating `today` as the current date.
    ///
    /// ## Steps
    /// 1. Recompute the total and enable the total field
    /// 2. Abort with an alert when any row expires on or before `today`
    /// 3. Build the sale, decrementing cached stock per resolved row
    /// 4. Record it; on success start one stock update per line and open
    ///    the invoice route
    ///
    /// ## Errors
    /// Only serialization of the invoice parameter can fail; an expired row
    /// is reported as [`SubmitOutcome::Blocked`].
    pub async fn create_sale_on(&self, today: NaiveDate) -> FormResult<SubmitOutcome> {
        let prepared = self.state.with_form_mut(|form| {
            form.recalculate_total();
            form.total_enabled = true;

            if let Err(e) = sale::check_expiry(form.rows.items(), today) {
                form.total_enabled = false;
                return Err(e);
            }

            Ok(sale::assemble_sale(
                &form.header,
                form.rows.items(),
                form.total,
                &mut form.products,
            ))
        });

        let sale = match prepared {
            Ok(sale) => sale,
            Err(CoreError::ExpiredProducts { names }) => {
                warn!(products = ?names, "Sale blocked by expired products");
                let message = CoreError::ExpiredProducts {
                    names: names.clone(),
                }
                .to_string();
                self.collaborators.notifier.alert(&message);
                return Ok(SubmitOutcome::Blocked { expired: names });
            }
            Err(other) => return Err(other.into()),
        };

        if let Err(e) = self.collaborators.sales.create(&sale).await {
            error!(error = %e, items = sale.items.len(), "Failed to record sale");
            return Ok(SubmitOutcome::NotRecorded { sale });
        }

        info!(
            items = sale.items.len(),
            total_cents = sale.total_price.cents(),
            "Sale recorded"
        );

        let stock_updates = self.spawn_stock_updates(&sale);

        let param = sale.to_invoice_param()?;
        self.collaborators.navigator.go_to(
            &self.config.navigation.invoice_route,
            &[(SALE_PARAM.to_string(), param)],
        );

        Ok(SubmitOutcome::Submitted {
            sale,
            stock_updates,
        })
    }

    /// Starts one independent stock update per sale line.
    fn spawn_stock_updates(&self, sale: &Sale) -> StockUpdates {
        let handles = sale
            .items
            .iter()
            .map(|line| {
                let products = Arc::clone(&self.collaborators.products);
                let product = line.product.clone();
                tokio::spawn(async move {
                    match products.update(&product).await {
                        Ok(()) => info!(
                            product_id = product.id,
                            stock = product.stock,
                            "Product stock updated"
                        ),
                        Err(e) => error!(
                            error = %e,
                            product_id = product.id,
                            "Failed to update product stock"
                        ),
                    }
                })
            })
            .collect();

        StockUpdates { handles }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stops the total watcher. Later edits only change the total through
    /// `remove_row`, `recalculate_total` or `create_sale`.
    pub fn destroy(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.shutdown();
            info!("Sale form destroyed");
        }
    }

    fn notify_changed(&self) {
        if let Some(watcher) = &self.watcher {
            watcher.notify_changed();
        }
    }
}

impl Drop for SaleFormController {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::testing::{collaborators, expiring, product, FakeBackend, RecordingUi};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product(1, "Napa 500mg", 1000, 40, "Dhanmondi"),
            product(2, "Seclo 20mg", 500, 12, "Dhanmondi"),
            product(3, "Ace Plus", 800, 9, "Gulshan"),
        ]
    }

    async fn setup(backend: FakeBackend) -> (SaleFormController, Arc<FakeBackend>, Arc<RecordingUi>) {
        let backend = Arc::new(backend);
        let ui = Arc::new(RecordingUi::default());
        let controller =
            SaleFormController::init(FormConfig::default(), collaborators(&backend, &ui)).await;
        (controller, backend, ui)
    }

    /// Category, lookup, name and quantity for one row.
    async fn fill_row(controller: &SaleFormController, index: usize, name: &str, quantity: i64) {
        controller
            .set_category(index, Some(Category::new("Analgesic")))
            .unwrap();
        controller.on_category_change(index).await.unwrap();
        assert!(controller.select_product(index, name).unwrap());
        controller.set_quantity(index, Some(quantity)).unwrap();
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    #[tokio::test]
    async fn test_init_loads_reference_data_and_adds_row() {
        let (controller, backend, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        assert_eq!(controller.row_count(), 1);
        assert_eq!(controller.categories().len(), 2);
        assert_eq!(controller.products().len(), 3);
        assert_eq!(backend.calls.lock().unwrap().branch_ids, vec![1]);
    }

    #[tokio::test]
    async fn test_reference_load_failures_leave_empty_lists() {
        let (controller, _, ui) = setup(FakeBackend {
            fail_categories: true,
            fail_branch_products: true,
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        assert!(controller.categories().is_empty());
        assert!(controller.products().is_empty());
        assert_eq!(controller.row_count(), 1);
        assert!(ui.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_load_does_not_affect_the_other() {
        let (controller, _, _) = setup(FakeBackend {
            fail_categories: true,
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        assert!(controller.categories().is_empty());
        assert_eq!(controller.products().len(), 3);
    }

    // =========================================================================
    // Category lookup
    // =========================================================================

    #[tokio::test]
    async fn test_category_change_without_category_is_noop() {
        let (controller, backend, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        controller.on_category_change(0).await.unwrap();
        controller
            .set_category(0, Some(Category::new("")))
            .unwrap();
        controller.on_category_change(0).await.unwrap();

        assert!(backend.lookups().is_empty());
        assert!(controller.candidates(0).is_empty());
    }

    #[tokio::test]
    async fn test_category_change_filters_by_branch_and_resets_row() {
        let (controller, backend, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        fill_row(&controller, 0, "Napa 500mg", 3).await;
        controller
            .set_category(0, Some(Category::new("Antacid")))
            .unwrap();
        controller.on_category_change(0).await.unwrap();

        // The configured term is sent, not the chosen category.
        assert_eq!(backend.lookups(), vec!["Pharacetamol", "Pharacetamol"]);

        let names: Vec<String> = controller
            .candidates(0)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Napa 500mg", "Seclo 20mg"]);

        let row = controller.snapshot().rows.get(0).unwrap().item.clone();
        assert_eq!(row.name, "");
        assert_eq!(row.unit_price, None);
        assert_eq!(row.stock, None);
        assert_eq!(row.expiry_date, None);
        assert_eq!(row.quantity, Some(0));
        assert!(!row.quantity_enabled);
        assert_eq!(row.product_id, Some(1));
        assert_eq!(row.category, Some(Category::new("Antacid")));
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_row_untouched() {
        let (controller, _, _) = setup(FakeBackend {
            fail_lookup: true,
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        controller
            .set_category(0, Some(Category::new("Analgesic")))
            .unwrap();
        let before = controller.snapshot();
        controller.on_category_change(0).await.unwrap();

        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test]
    async fn test_lookup_result_follows_row_when_earlier_row_removed() {
        let gate = Arc::new(Notify::new());
        let (controller, _, _) = setup(FakeBackend {
            lookup_gate: Some(gate.clone()),
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        controller.add_row();
        let key = controller.snapshot().rows.get(1).unwrap().item.key.clone();
        controller
            .set_category(1, Some(Category::new("Analgesic")))
            .unwrap();

        let (result, ()) = tokio::join!(controller.on_category_change(1), async {
            controller.remove_row(0).unwrap();
            gate.notify_one();
        });
        result.unwrap();

        let form = controller.snapshot();
        assert_eq!(form.rows.len(), 1);
        assert_eq!(form.rows.get(0).unwrap().item.key, key);
        assert_eq!(controller.candidates(0).len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_result_discarded_when_row_removed() {
        let gate = Arc::new(Notify::new());
        let (controller, _, _) = setup(FakeBackend {
            lookup_gate: Some(gate.clone()),
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        controller
            .set_category(0, Some(Category::new("Analgesic")))
            .unwrap();

        let (result, ()) = tokio::join!(controller.on_category_change(0), async {
            controller.remove_row(0).unwrap();
            controller.add_row();
            gate.notify_one();
        });
        result.unwrap();

        assert!(controller.candidates(0).is_empty());
    }

    // =========================================================================
    // Row editing
    // =========================================================================

    #[tokio::test]
    async fn test_select_product_resolves_against_row_candidates() {
        let (controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        controller
            .set_category(0, Some(Category::new("Analgesic")))
            .unwrap();
        controller.on_category_change(0).await.unwrap();

        assert!(!controller.select_product(0, "Ace Plus").unwrap());
        assert!(!controller.snapshot().rows.get(0).unwrap().item.quantity_enabled);

        assert!(controller.select_product(0, "Seclo 20mg").unwrap());
        let row = controller.snapshot().rows.get(0).unwrap().item.clone();
        assert_eq!(row.product_id, Some(2));
        assert_eq!(row.unit_price, Some(Money::from_cents(500)));
        assert_eq!(row.stock, Some(12));
        assert!(row.quantity_enabled);
    }

    #[tokio::test]
    async fn test_quantity_locked_until_product_selected() {
        let (controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        let err = controller.set_quantity(0, Some(2)).unwrap_err();
        assert!(matches!(
            err,
            FormError::Core(CoreError::QuantityDisabled { index: 0 })
        ));
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected_and_form_stays_usable() {
        let (controller, backend, _) = setup(FakeBackend::with_catalogue(catalogue())).await;
        fill_row(&controller, 0, "Napa 500mg", 2).await;

        let err = controller.set_quantity(0, Some(i64::MAX / 10)).unwrap_err();
        assert!(matches!(
            err,
            FormError::Core(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(err.is_usage_error());

        assert_eq!(controller.recalculate_total(), Money::from_cents(2000));
        assert_eq!(controller.row_count(), 1);

        let outcome = controller.create_sale_on(today()).await.unwrap();
        assert!(outcome.is_submitted());
        assert_eq!(backend.sales()[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_bad_index_is_reported() {
        let (controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        assert!(controller.remove_row(5).unwrap_err().is_usage_error());
        assert!(controller.select_product(5, "Napa 500mg").is_err());
        assert!(controller.on_category_change(5).await.is_err());
        assert!(controller.candidates(5).is_empty());
    }

    #[tokio::test]
    async fn test_total_of_two_rows() {
        let (controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        controller.add_row();
        fill_row(&controller, 1, "Seclo 20mg", 1).await;

        assert_eq!(controller.recalculate_total(), Money::from_cents(2500));
        assert_eq!(controller.recalculate_total(), Money::from_cents(2500));
        assert_eq!(controller.total(), Money::from_cents(2500));
    }

    #[tokio::test]
    async fn test_remove_row_drops_candidates_and_recalculates() {
        let (controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        controller.add_row();
        fill_row(&controller, 1, "Seclo 20mg", 1).await;
        controller.recalculate_total();

        controller.remove_row(0).unwrap();
        assert_eq!(controller.total(), Money::from_cents(500));
        assert_eq!(controller.row_count(), 1);
        assert_eq!(controller.snapshot().rows.get(0).unwrap().item.name, "Seclo 20mg");

        controller.remove_row(0).unwrap();
        assert_eq!(controller.row_count(), 0);
        assert!(controller.candidates(0).is_empty());
        assert_eq!(controller.total(), Money::zero());
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_follows_edits_after_quiet_period() {
        let (controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        assert_eq!(controller.total(), Money::zero());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(controller.total(), Money::zero());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(controller.total(), Money::from_cents(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_stops_debounced_total() {
        let (mut controller, _, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        controller.destroy();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(controller.total(), Money::zero());

        // Synchronous paths still work.
        assert_eq!(controller.recalculate_total(), Money::from_cents(2000));
        controller.destroy();
    }

    // =========================================================================
    // Submission
    // =========================================================================

    #[tokio::test]
    async fn test_expired_row_blocks_submission() {
        let yesterday = today().pred_opt().unwrap();
        let mut stock = catalogue();
        stock[0] = expiring(stock[0].clone(), yesterday);
        stock[1] = expiring(stock[1].clone(), yesterday);
        let (controller, backend, ui) = setup(FakeBackend::with_catalogue(stock)).await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        controller.add_row();
        fill_row(&controller, 1, "Seclo 20mg", 1).await;
        let products_before = controller.products();

        let outcome = controller.create_sale_on(today()).await.unwrap();

        match outcome {
            SubmitOutcome::Blocked { expired } => {
                assert_eq!(expired, vec!["Napa 500mg", "Seclo 20mg"]);
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(
            ui.alerts(),
            vec!["Cannot sell expired products:\nNapa 500mg, Seclo 20mg"]
        );
        assert!(backend.sales().is_empty());
        assert!(backend.updates().is_empty());
        assert!(ui.navigations().is_empty());
        assert!(!controller.snapshot().total_enabled);
        assert_eq!(controller.products(), products_before);
    }

    #[tokio::test]
    async fn test_product_expiring_today_is_blocked() {
        let mut stock = catalogue();
        stock[0] = expiring(stock[0].clone(), today());
        stock[1] = expiring(stock[1].clone(), today().succ_opt().unwrap());
        let (controller, backend, ui) = setup(FakeBackend::with_catalogue(stock)).await;

        fill_row(&controller, 0, "Napa 500mg", 1).await;
        controller.add_row();
        fill_row(&controller, 1, "Seclo 20mg", 1).await;
        let outcome = controller.create_sale_on(today()).await.unwrap();

        match outcome {
            SubmitOutcome::Blocked { expired } => assert_eq!(expired, vec!["Napa 500mg"]),
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert_eq!(ui.alerts(), vec!["Cannot sell expired products:\nNapa 500mg"]);
        assert!(backend.sales().is_empty());
    }

    #[tokio::test]
    async fn test_successful_sale_updates_stock_and_navigates() {
        let (controller, backend, ui) = setup(FakeBackend::with_catalogue(catalogue())).await;

        controller.set_customer_name("Rahim Uddin");
        controller.set_discount(Money::from_cents(100));
        fill_row(&controller, 0, "Napa 500mg", 2).await;
        controller.add_row();
        fill_row(&controller, 1, "Seclo 20mg", 1).await;
        // Left unresolved; dropped from the sale.
        controller.add_row();

        let outcome = controller.create_sale_on(today()).await.unwrap();
        let (sale, stock_updates) = match outcome {
            SubmitOutcome::Submitted {
                sale,
                stock_updates,
            } => (sale, stock_updates),
            other => panic!("expected Submitted, got {:?}", other),
        };
        assert_eq!(stock_updates.len(), 2);
        stock_updates.join_all().await;

        let recorded = backend.sales();
        assert_eq!(recorded, vec![sale.clone()]);
        assert_eq!(sale.customer_name, "Rahim Uddin");
        assert_eq!(sale.discount, Money::from_cents(100));
        assert_eq!(sale.total_price, Money::from_cents(2500));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(sale.items[0].product.stock, 38);

        let mut updates: Vec<(i64, i64)> = backend
            .updates()
            .into_iter()
            .map(|p| (p.id, p.stock))
            .collect();
        updates.sort();
        assert_eq!(updates, vec![(1, 38), (2, 11)]);

        let cached: Vec<i64> = controller.products().iter().map(|p| p.stock).collect();
        assert_eq!(cached, vec![38, 11, 9]);

        assert_eq!(
            ui.navigations(),
            vec![(
                "invoice".to_string(),
                vec![("sale".to_string(), sale.to_invoice_param().unwrap())]
            )]
        );
        assert!(controller.snapshot().total_enabled);
        assert!(ui.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_fields_do_not_block_submission() {
        let (controller, backend, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        fill_row(&controller, 0, "Napa 500mg", 1).await;
        assert!(!controller.validation_errors().is_empty());

        let outcome = controller.create_sale_on(today()).await.unwrap();
        assert!(outcome.is_submitted());
        assert_eq!(backend.sales().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_sale_keeps_decremented_cache() {
        let (controller, backend, ui) = setup(FakeBackend {
            fail_create: true,
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        let outcome = controller.create_sale_on(today()).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::NotRecorded { .. }));
        assert!(backend.updates().is_empty());
        assert!(ui.navigations().is_empty());
        assert!(ui.alerts().is_empty());
        assert_eq!(controller.products()[0].stock, 38);
    }

    #[tokio::test]
    async fn test_failed_stock_update_still_navigates() {
        let (controller, backend, ui) = setup(FakeBackend {
            fail_update: true,
            ..FakeBackend::with_catalogue(catalogue())
        })
        .await;

        fill_row(&controller, 0, "Napa 500mg", 2).await;
        let outcome = controller.create_sale_on(today()).await.unwrap();

        match outcome {
            SubmitOutcome::Submitted { stock_updates, .. } => stock_updates.join_all().await,
            other => panic!("expected Submitted, got {:?}", other),
        }
        assert_eq!(backend.updates().len(), 1);
        assert_eq!(ui.navigations().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_form_submits_empty_sale() {
        let (controller, backend, _) = setup(FakeBackend::with_catalogue(catalogue())).await;

        let outcome = controller.create_sale_on(today()).await.unwrap();

        assert!(outcome.is_submitted());
        let sales = backend.sales();
        assert!(sales[0].items.is_empty());
        assert_eq!(sales[0].total_price, Money::zero());
    }
}
