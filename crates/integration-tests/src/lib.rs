//! Integration tests for Street Kitchen.
//!
//! Tests run the ordering client against [`MockStorefront`], an in-process
//! axum server that serves a menu, sets the `csrftoken` cookie and records
//! every order it receives. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p street-kitchen-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::Value;
use street_kitchen_storefront::StorefrontConfig;
use street_kitchen_storefront::page::Surface;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Vendor code the mock serves.
pub const VENDOR: &str = "idli01";

/// Value of the `csrftoken` cookie the mock sets.
pub const CSRF_TOKEN: &str = "test-token";

/// An order as the mock received it.
#[derive(Debug, Clone)]
pub struct RecordedOrder {
    pub vendor: String,
    pub body: Value,
    pub csrf_header: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug)]
struct MockData {
    items: Value,
    catalog_status: StatusCode,
    catalog_hits: usize,
    reply_status: StatusCode,
    reply_body: String,
    orders: Vec<RecordedOrder>,
}

#[derive(Debug, Clone)]
struct MockState(Arc<Mutex<MockData>>);

impl MockState {
    fn lock(&self) -> MutexGuard<'_, MockData> {
        // A panicking handler only poisons test data.
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// In-process ordering site.
#[derive(Debug)]
pub struct MockStorefront {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockStorefront {
    /// Start serving `items` on a random local port.
    ///
    /// Orders are accepted with `{"success": true, "order_id": "A1"}` until
    /// [`reply_with`](Self::reply_with) says otherwise.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(items: Value) -> Self {
        let state = MockState(Arc::new(Mutex::new(MockData {
            items,
            catalog_status: StatusCode::OK,
            catalog_hits: 0,
            reply_status: StatusCode::OK,
            reply_body: r#"{"success": true, "order_id": "A1"}"#.to_string(),
            orders: Vec::new(),
        })));

        let app = Router::new()
            .route("/vendors/{vendor}/items/", get(list_items))
            .route("/orders/create/{vendor}/", post(create_order))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock storefront");
        let addr = listener.local_addr().expect("Failed to read local address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the mock site.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Invalid mock URL")
    }

    /// Client configuration pointing at the mock.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::new(self.base_url(), VENDOR)
    }

    /// Replace the menu served from now on.
    pub fn set_items(&self, items: Value) {
        self.state.lock().items = items;
    }

    /// Make the menu endpoint answer with `status` and no items.
    pub fn fail_catalog(&self, status: u16) {
        self.state.lock().catalog_status =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// Answer subsequent orders with `status` and `body`.
    pub fn reply_with(&self, status: u16, body: impl Into<String>) {
        let mut data = self.state.lock();
        data.reply_status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        data.reply_body = body.into();
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<RecordedOrder> {
        self.state.lock().orders.clone()
    }

    /// Number of menu requests served.
    #[must_use]
    pub fn catalog_hits(&self) -> usize {
        self.state.lock().catalog_hits
    }
}

impl Drop for MockStorefront {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn list_items(State(state): State<MockState>, Path(_vendor): Path<String>) -> Response {
    let mut data = state.lock();
    data.catalog_hits += 1;
    if !data.catalog_status.is_success() {
        return data.catalog_status.into_response();
    }
    (
        [(header::SET_COOKIE, format!("csrftoken={CSRF_TOKEN}; Path=/"))],
        axum::Json(data.items.clone()),
    )
        .into_response()
}

async fn create_order(
    State(state): State<MockState>,
    Path(vendor): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let mut data = state.lock();
    data.orders.push(RecordedOrder {
        vendor,
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
        csrf_header: header_value("x-csrftoken"),
        content_type: header_value("content-type"),
    });
    (
        data.reply_status,
        [(header::CONTENT_TYPE, "application/json")],
        data.reply_body.clone(),
    )
        .into_response()
}

/// A base URL nothing is listening on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn unreachable_base_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("Invalid probe URL")
}

/// [`Surface`] that records what the page showed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub notices: Vec<String>,
    pub navigations: Vec<Url>,
}

impl Surface for RecordingSurface {
    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn navigate(&mut self, url: &Url) {
        self.navigations.push(url.clone());
    }
}
