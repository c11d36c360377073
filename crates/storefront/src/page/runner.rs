//! Event loop driving an [`OrderPage`].
//!
//! All page state is touched only inside [`run_page`]. Network work is
//! spawned onto the runtime and its result comes back through a channel as
//! just another event, so a slow request never holds up user actions.

use std::time::Duration;

use street_kitchen_core::ItemId;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use super::{OrderPage, Surface};
use crate::api::{ApiError, StorefrontBackend};
use crate::checkout::CheckoutForm;
use crate::models::{Item, OrderConfirmation};

/// User actions delivered to a running page.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// Increment (positive) or decrement (negative) an item's quantity.
    ChangeQuantity { item: ItemId, delta: i32 },
    /// "Place order": open the confirmation step.
    PlaceOrder,
    /// Dismiss the confirmation step.
    CancelCheckout,
    /// Submit the confirmation form.
    SubmitCheckout(CheckoutForm),
    /// Re-fetch the catalog now, outside the regular schedule.
    RefreshCatalog,
}

/// Results of spawned network work.
enum TaskResult {
    CatalogFetched(Result<Vec<Item>, ApiError>),
    OrderSettled(Result<OrderConfirmation, ApiError>),
}

/// Run the page until the event sender is dropped or the page navigates away.
///
/// The catalog is fetched immediately and then every
/// [`refresh_interval`](crate::config::StorefrontConfig::refresh_interval).
/// Refreshes are not de-duplicated: each tick starts its own fetch.
///
/// Once the sender is dropped no further events or refreshes are started,
/// but an order already in flight is still settled before returning.
pub async fn run_page<B, S>(
    mut page: OrderPage<B, S>,
    mut events: mpsc::UnboundedReceiver<PageEvent>,
) -> OrderPage<B, S>
where
    B: StorefrontBackend,
    S: Surface,
{
    let (results_tx, mut results) = mpsc::unbounded_channel();
    let mut ticker = interval(refresh_period(page.config().refresh_interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut accepting = true;

    loop {
        tokio::select! {
            _ = ticker.tick(), if accepting => spawn_refresh(page.backend(), &results_tx),
            Some(result) = results.recv() => match result {
                TaskResult::CatalogFetched(result) => page.apply_catalog(result),
                TaskResult::OrderSettled(reply) => {
                    page.settle_submission(reply);
                }
            },
            event = events.recv(), if accepting => match event {
                Some(event) => handle_event(&mut page, event, &results_tx),
                None => {
                    debug!("Page event channel closed");
                    accepting = false;
                }
            },
        }

        if page.is_redirected() {
            break;
        }
        if !accepting {
            if !page.is_submitting() {
                break;
            }
            debug!("Waiting for in-flight order before stopping");
        }
    }

    page
}

fn handle_event<B, S>(
    page: &mut OrderPage<B, S>,
    event: PageEvent,
    results: &mpsc::UnboundedSender<TaskResult>,
) where
    B: StorefrontBackend,
    S: Surface,
{
    match event {
        PageEvent::ChangeQuantity { item, delta } => {
            page.change_quantity(item, delta);
        }
        PageEvent::PlaceOrder => {
            page.open_checkout();
        }
        PageEvent::CancelCheckout => page.cancel_checkout(),
        PageEvent::SubmitCheckout(form) => {
            if let Some(payload) = page.begin_submission(&form) {
                let backend = page.backend().clone();
                let results = results.clone();
                tokio::spawn(async move {
                    let reply = backend.create_order(&payload).await;
                    let _ = results.send(TaskResult::OrderSettled(reply));
                });
            }
        }
        PageEvent::RefreshCatalog => spawn_refresh(page.backend(), results),
    }
}

fn spawn_refresh<B: StorefrontBackend>(backend: &B, results: &mpsc::UnboundedSender<TaskResult>) {
    let backend = backend.clone();
    let results = results.clone();
    tokio::spawn(async move {
        let fetched = backend.fetch_items().await;
        let _ = results.send(TaskResult::CatalogFetched(fetched));
    });
}

/// `interval` panics on a zero period.
fn refresh_period(configured: Duration) -> Duration {
    configured.max(Duration::from_millis(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use street_kitchen_core::OrderRef;
    use url::Url;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::page::testing::{FakeBackend, RecordingSurface};

    fn config() -> StorefrontConfig {
        StorefrontConfig::new(Url::parse("https://streetkitchen.example").unwrap(), "idli01")
    }

    fn items() -> Vec<Item> {
        vec![Item {
            id: ItemId::new(12),
            name: "Item12".to_string(),
            category: None,
            price: Decimal::from(100),
            available: true,
        }]
    }

    #[tokio::test]
    async fn test_loop_places_order_and_stops_on_redirect() {
        let backend = FakeBackend::with_items(items());
        backend.reply_with(Ok(OrderConfirmation {
            order_id: Some(OrderRef::new("A1")),
            redirect_url: None,
        }));
        let page = OrderPage::new(config(), backend.clone(), RecordingSurface::default());

        let (tx, rx) = mpsc::unbounded_channel();
        let running = tokio::spawn(run_page(page, rx));

        // Wait for the initial catalog load before interacting.
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(PageEvent::ChangeQuantity {
            item: ItemId::new(12),
            delta: 2,
        })
        .unwrap();
        tx.send(PageEvent::PlaceOrder).unwrap();
        tx.send(PageEvent::SubmitCheckout(CheckoutForm {
            customer_name: "Kumar".to_string(),
            customer_phone: "9876543210".to_string(),
            ..CheckoutForm::default()
        }))
        .unwrap();

        let page = tokio::time::timeout(Duration::from_secs(5), running)
            .await
            .unwrap()
            .unwrap();

        assert!(page.is_redirected());
        assert_eq!(backend.order_count(), 1);
        let surface = page.into_surface();
        assert_eq!(surface.navigations.len(), 1);
        assert!(surface.navigations[0].as_str().ends_with("/orders/confirmation/A1/"));
    }

    #[tokio::test]
    async fn test_loop_ends_when_events_close() {
        let backend = FakeBackend::with_items(items());
        let page = OrderPage::new(config(), backend, RecordingSurface::default());

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(PageEvent::PlaceOrder).unwrap();
        drop(tx);

        let page = tokio::time::timeout(Duration::from_secs(5), run_page(page, rx))
            .await
            .unwrap();

        assert!(!page.is_redirected());
        assert_eq!(page.surface().notices, vec!["Select items first".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_order_settles_after_events_close() {
        let mut backend = FakeBackend::with_items(items());
        backend.order_delay = Duration::from_secs(2);
        backend.reply_with(Ok(OrderConfirmation {
            order_id: Some(OrderRef::new("A1")),
            redirect_url: None,
        }));
        let page = OrderPage::new(config(), backend.clone(), RecordingSurface::default());

        let (tx, rx) = mpsc::unbounded_channel();
        let running = tokio::spawn(run_page(page, rx));
        tokio::time::sleep(Duration::from_millis(10)).await;

        tx.send(PageEvent::ChangeQuantity {
            item: ItemId::new(12),
            delta: 1,
        })
        .unwrap();
        tx.send(PageEvent::PlaceOrder).unwrap();
        tx.send(PageEvent::SubmitCheckout(CheckoutForm {
            customer_name: "Kumar".to_string(),
            customer_phone: "9876543210".to_string(),
            ..CheckoutForm::default()
        }))
        .unwrap();
        drop(tx);

        let page = running.await.unwrap();

        assert_eq!(backend.order_count(), 1);
        assert!(page.is_redirected());
        assert!(page.view().submit_control().enabled);
        assert_eq!(page.surface().navigations.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_refetched_on_every_tick() {
        let backend = FakeBackend::with_items(items());
        let mut config = config();
        config.refresh_interval = Duration::from_secs(1);
        let page = OrderPage::new(config, backend.clone(), RecordingSurface::default());

        let (tx, rx) = mpsc::unbounded_channel();
        let running = tokio::spawn(run_page(page, rx));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        backend.items.lock().unwrap().push(Item {
            id: ItemId::new(5),
            name: "Item5".to_string(),
            category: None,
            price: Decimal::from(40),
            available: true,
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(tx);

        let page = running.await.unwrap();

        assert!(backend.fetch_count() >= 3, "fetches: {}", backend.fetch_count());
        assert!(page.view().row(ItemId::new(5)).is_some());
        assert_eq!(page.view().rows().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refreshes_overlap() {
        let mut backend = FakeBackend::with_items(items());
        backend.catalog_delay = Duration::from_secs(10);
        let mut config = config();
        config.refresh_interval = Duration::from_secs(1);
        let page = OrderPage::new(config, backend.clone(), RecordingSurface::default());

        let (tx, rx) = mpsc::unbounded_channel();
        let running = tokio::spawn(run_page(page, rx));

        // Ticks at 0s..=3s, none of whose fetches has finished yet
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(backend.fetch_count(), 4);

        drop(tx);
        let page = running.await.unwrap();
        assert!(page.view().is_loading());
    }
}
