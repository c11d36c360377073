//! The ordering page controller.
//!
//! [`OrderPage`] owns the catalog, the cart, the checkout flow and the view,
//! and exposes only the user actions of the page. Every handler updates the
//! view before returning, so what is displayed always matches the last
//! applied action.
//!
//! Blocking notices and navigation go through the [`Surface`] the page was
//! created with.

mod runner;

pub use runner::{PageEvent, run_page};

use street_kitchen_core::ItemId;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{ApiError, StorefrontBackend};
use crate::cart::{Cart, Summary};
use crate::catalog::Catalog;
use crate::checkout::{Checkout, CheckoutForm, CheckoutState};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::models::{Item, OrderConfirmation, OrderPayload};
use crate::view::PageView;

/// Where the page shows notices and performs navigation.
pub trait Surface {
    /// Show a blocking notice to the user.
    fn notify(&mut self, message: &str);

    /// Leave the page for `url`.
    fn navigate(&mut self, url: &Url);

    /// Called after a handler changed the view.
    fn render(&mut self, _view: &PageView) {}
}

/// Controller for one ordering page.
#[derive(Debug)]
pub struct OrderPage<B, S> {
    config: StorefrontConfig,
    backend: B,
    surface: S,
    catalog: Catalog,
    cart: Cart,
    checkout: Checkout,
    view: PageView,
}

impl<B: StorefrontBackend, S: Surface> OrderPage<B, S> {
    /// A page with an empty catalog and the loading indicator shown.
    pub fn new(config: StorefrontConfig, backend: B, surface: S) -> Self {
        Self {
            config,
            backend,
            surface,
            catalog: Catalog::default(),
            cart: Cart::new(),
            checkout: Checkout::new(),
            view: PageView::new(),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the menu and apply it.
    pub async fn refresh_catalog(&mut self) {
        let result = self.backend.fetch_items().await;
        self.apply_catalog(result);
    }

    /// Apply the outcome of a catalog fetch.
    ///
    /// Refresh is best-effort: a failure is logged and the page keeps showing
    /// what it showed before. On success the catalog is replaced, cart entries
    /// for items that disappeared are dropped and every row is re-rendered.
    pub fn apply_catalog(&mut self, result: Result<Vec<Item>, ApiError>) {
        let items = match result {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Catalog refresh failed");
                return;
            }
        };

        self.catalog = Catalog::new(items);
        let dropped = self.cart.retain_listed(&self.catalog);
        if !dropped.is_empty() {
            info!(items = ?dropped, "Removed delisted items from cart");
        }
        debug!(count = self.catalog.len(), "Catalog replaced");

        self.view.render_catalog(&self.catalog, &self.cart);
        self.recompute_summary();
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Change an item's quantity by `delta` (clamped at zero).
    ///
    /// Unknown items are ignored. Unavailable items are refused with a notice.
    /// Returns the new quantity when the change was applied.
    pub fn change_quantity(&mut self, id: ItemId, delta: i32) -> Option<u32> {
        match self.cart.change_quantity(&self.catalog, id, delta) {
            Ok(Some(quantity)) => {
                if let Some(item) = self.catalog.get(id) {
                    self.view.update_row(id, quantity, item.line_total(quantity));
                }
                self.recompute_summary();
                Some(quantity)
            }
            Ok(None) => None,
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    /// Rebuild the summary display from the cart.
    pub fn recompute_summary(&mut self) {
        let summary = self.summary();
        self.view.render_summary(&summary);
        self.surface.render(&self.view);
    }

    /// Current summary, computed from the cart.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.cart.summary(&self.catalog, self.config.gst_percent)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Open the confirmation step. Refused with a notice if the cart is empty.
    pub fn open_checkout(&mut self) -> bool {
        let opened = match self.checkout.open(&self.cart) {
            Ok(()) => true,
            Err(err) => {
                self.fail(&err);
                false
            }
        };
        self.sync_checkout_view();
        opened
    }

    /// Close the confirmation step without sending anything.
    pub fn cancel_checkout(&mut self) {
        self.checkout.cancel();
        self.sync_checkout_view();
    }

    /// Validate the confirmation form and enter the submitting state.
    ///
    /// Returns the payload to send, or `None` (with a notice shown) if
    /// nothing may be sent.
    pub fn begin_submission(&mut self, form: &CheckoutForm) -> Option<OrderPayload> {
        let result = self
            .checkout
            .begin_submit(form, &self.cart, self.config.gst_percent);
        self.sync_checkout_view();
        match result {
            Ok(payload) => Some(payload),
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    /// Apply the order endpoint's reply.
    ///
    /// Navigates on success and returns the target; shows the failure
    /// otherwise. The submit control is restored either way.
    pub fn settle_submission(&mut self, reply: Result<OrderConfirmation, ApiError>) -> Option<Url> {
        let result = self.checkout.settle(reply, &self.config);
        self.sync_checkout_view();
        match result {
            Ok(url) => {
                info!(%url, "Order placed, navigating");
                self.surface.navigate(&url);
                Some(url)
            }
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    /// Submit the confirmation form and wait for the reply.
    pub async fn submit_checkout(&mut self, form: &CheckoutForm) -> Option<Url> {
        let payload = self.begin_submission(form)?;
        let reply = self.backend.create_order(&payload).await;
        self.settle_submission(reply)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn view(&self) -> &PageView {
        &self.view
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn checkout_state(&self) -> &CheckoutState {
        self.checkout.state()
    }

    /// Whether the page has navigated away after a successful order.
    #[must_use]
    pub const fn is_redirected(&self) -> bool {
        matches!(self.checkout.state(), CheckoutState::Redirected(_))
    }

    /// Whether an order request is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.checkout.state(), CheckoutState::Submitting)
    }

    /// Consume the page, returning its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn sync_checkout_view(&mut self) {
        self.view
            .render_checkout(self.checkout.is_confirming(), self.checkout.submit_control());
        self.surface.render(&self.view);
    }

    fn fail(&mut self, err: &StorefrontError) {
        err.report();
        self.surface.notify(&err.user_message());
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use street_kitchen_core::OrderRef;

    use super::testing::{FakeBackend, RecordingSurface};
    use super::*;
    use crate::checkout::{PLACE_ORDER_LABEL, SubmitControl};

    fn item(id: i64, price: i64, available: bool) -> Item {
        Item {
            id: ItemId::new(id),
            name: format!("Item{id}"),
            category: None,
            price: Decimal::from(price),
            available,
        }
    }

    fn config() -> StorefrontConfig {
        StorefrontConfig::new(Url::parse("https://streetkitchen.example").unwrap(), "idli01")
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Kumar".to_string(),
            customer_phone: "9876543210".to_string(),
            ..CheckoutForm::default()
        }
    }

    async fn loaded_page() -> OrderPage<FakeBackend, RecordingSurface> {
        let backend = FakeBackend::with_items(vec![
            item(12, 100, true),
            item(3, 50, true),
            item(9, 80, false),
        ]);
        let mut page = OrderPage::new(config(), backend, RecordingSurface::default());
        page.refresh_catalog().await;
        page
    }

    #[tokio::test]
    async fn test_refresh_renders_rows() {
        let page = loaded_page().await;
        assert!(!page.view().is_loading());
        assert_eq!(page.view().rows().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_state() {
        let backend = FakeBackend::default();
        *backend.fail_catalog.lock().unwrap() = true;
        let mut page = OrderPage::new(config(), backend, RecordingSurface::default());

        page.refresh_catalog().await;

        assert!(page.view().is_loading());
        assert!(page.surface().notices.is_empty());
    }

    #[tokio::test]
    async fn test_change_quantity_updates_row_and_summary() {
        let mut page = loaded_page().await;
        page.change_quantity(ItemId::new(12), 2);
        page.change_quantity(ItemId::new(3), 1);

        assert_eq!(page.view().row(ItemId::new(12)).unwrap().quantity, 2);
        assert_eq!(page.view().row(ItemId::new(12)).unwrap().line_total, "₹200.00");
        assert_eq!(page.view().summary().total, "₹250.00");
        assert_eq!(page.view().summary().lines.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_item_notice() {
        let mut page = loaded_page().await;
        assert_eq!(page.change_quantity(ItemId::new(9), 1), None);
        assert_eq!(page.cart().quantity(ItemId::new(9)), 0);
        assert_eq!(
            page.surface().notices,
            vec!["This item is currently unavailable".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_cart_never_sends() {
        let mut page = loaded_page().await;
        assert!(!page.open_checkout());
        assert_eq!(page.submit_checkout(&form()).await, None);

        assert_eq!(page.backend().order_count(), 0);
        assert_eq!(page.surface().notices[0], "Select items first");
        assert_eq!(page.checkout_state(), &CheckoutState::Idle);
    }

    #[tokio::test]
    async fn test_cancel_sends_nothing() {
        let mut page = loaded_page().await;
        page.change_quantity(ItemId::new(12), 1);
        assert!(page.open_checkout());
        assert!(page.view().is_checkout_open());

        page.cancel_checkout();
        assert!(!page.view().is_checkout_open());
        assert_eq!(page.checkout_state(), &CheckoutState::Idle);
        assert_eq!(page.backend().order_count(), 0);
    }

    #[tokio::test]
    async fn test_business_rejection_stays_on_page() {
        let mut page = loaded_page().await;
        page.change_quantity(ItemId::new(12), 2);
        page.open_checkout();
        page.backend().reply_with(Err(ApiError::Rejected {
            status: 200,
            message: "Out of stock".to_string(),
        }));

        assert_eq!(page.submit_checkout(&form()).await, None);

        assert_eq!(page.surface().notices, vec!["Order failed: Out of stock".to_string()]);
        assert!(page.surface().navigations.is_empty());
        assert_eq!(page.view().submit_control(), SubmitControl::default());
        assert_eq!(page.view().submit_control().label, PLACE_ORDER_LABEL);
        assert_eq!(page.cart().quantity(ItemId::new(12)), 2);
    }

    #[tokio::test]
    async fn test_success_navigates_to_confirmation() {
        let mut page = loaded_page().await;
        page.change_quantity(ItemId::new(12), 2);
        page.change_quantity(ItemId::new(3), 1);
        page.open_checkout();
        page.backend().reply_with(Ok(OrderConfirmation {
            order_id: Some(OrderRef::new("A1")),
            redirect_url: None,
        }));

        let url = page.submit_checkout(&form()).await.unwrap();

        assert!(url.as_str().contains("A1"));
        assert_eq!(page.surface().navigations, vec![url]);
        assert!(page.is_redirected());

        let orders = page.backend().orders.lock().unwrap().clone();
        assert_eq!(orders.len(), 1);
        let lines: Vec<(i64, u32)> = orders[0]
            .items
            .iter()
            .map(|l| (l.id.as_i64(), l.quantity))
            .collect();
        assert_eq!(lines, vec![(3, 1), (12, 2)]);
        assert_eq!(orders[0].gst_percent, Decimal::from(5));
    }

    #[tokio::test]
    async fn test_refresh_prunes_and_preserves_quantities() {
        let mut page = loaded_page().await;
        page.change_quantity(ItemId::new(12), 2);
        page.change_quantity(ItemId::new(3), 1);

        *page.backend().items.lock().unwrap() = vec![item(12, 100, true), item(40, 30, true)];
        page.refresh_catalog().await;

        assert_eq!(page.cart().quantity(ItemId::new(3)), 0);
        assert_eq!(page.view().row(ItemId::new(12)).unwrap().quantity, 2);
        assert!(page.view().row(ItemId::new(40)).is_some());
        assert_eq!(page.view().summary().total, "₹200.00");
    }
}
