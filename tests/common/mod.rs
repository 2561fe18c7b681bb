use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use sha2::Sha256;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use orderflow_api::{
    app_router,
    config::AppConfig,
    db,
    entities::coupon::{self, DiscountType},
    entities::product,
    events::{self, EventSender},
    AppState,
};

type HmacSha256 = Hmac<Sha256>;

/// Test harness backed by a throwaway file-based SQLite database. Each
/// instance gets its own database file so test binaries can run in parallel.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    db_path: PathBuf,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_gateway("http://127.0.0.1:1").await
    }

    /// Points the payment gateway client at the given base URL (a wiremock
    /// server in gateway round-trip tests).
    pub async fn with_gateway(gateway_base_url: &str) -> Self {
        let db_path = std::env::temp_dir().join(format!(
            "orderflow_test_{}.db",
            Uuid::new_v4().simple()
        ));
        let _ = std::fs::remove_file(&db_path);

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.gateway.base_url = gateway_base_url.to_string();
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::ensure_schema(&pool)
            .await
            .expect("failed to bootstrap test schema");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender)
            .expect("failed to build application state");
        let router = app_router(state.clone());

        Self {
            router,
            state,
            db_path,
            _event_task: event_task,
        }
    }

    /// Inserts a product and returns its id.
    pub async fn seed_product(
        &self,
        name: &str,
        sku: &str,
        price: Decimal,
        stock_quantity: i32,
        manage_stock: bool,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        product::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            sku: Set(sku.to_string()),
            price: Set(price),
            stock_quantity: Set(stock_quantity),
            manage_stock: Set(manage_stock),
            stock_status: Set(product::StockStatus::derive(stock_quantity, manage_stock)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("failed to seed product");
        id
    }

    /// Inserts an active coupon valid from an hour ago.
    pub async fn seed_coupon(
        &self,
        code: &str,
        discount_type: DiscountType,
        discount_value: Decimal,
        usage_limit: Option<i32>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        coupon::ActiveModel {
            id: Set(id),
            code: Set(code.to_uppercase()),
            discount_type: Set(discount_type),
            discount_value: Set(discount_value),
            min_purchase_amount: Set(None),
            max_discount_amount: Set(None),
            usage_limit: Set(usage_limit),
            used_count: Set(0),
            valid_from: Set(now - Duration::hours(1)),
            valid_until: Set(Some(now + Duration::days(30))),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
        .insert(&*self.state.db)
        .await
        .expect("failed to seed coupon");
        id
    }

    /// JSON request against the in-process router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize request body"))
        } else {
            Body::empty()
        };
        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Raw-body POST used by webhook tests, where the exact bytes matter.
    pub async fn post_raw(
        &self,
        uri: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder
            .body(Body::from(body))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Signs raw webhook bytes the way the gateway would.
    pub fn webhook_signature(&self, body: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(self.state.config.gateway.webhook_secret.as_bytes())
                .expect("hmac accepts any key length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Signs the order/payment pair the way the gateway's checkout would.
    pub fn payment_signature(&self, gateway_order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.state.config.gateway.key_secret.as_bytes())
            .expect("hmac accepts any key length");
        mac.update(format!("{gateway_order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

/// Reads a JSON response body.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not valid json")
}

pub async fn assert_json(response: axum::response::Response, expected: StatusCode) -> Value {
    assert_eq!(response.status(), expected, "unexpected response status");
    read_json(response).await
}

/// Standard create-order payload against seeded products.
pub fn order_payload(customer_id: Uuid, items: Vec<(Uuid, i32)>, payment_method: &str) -> Value {
    json!({
        "customer_id": customer_id,
        "items": items
            .into_iter()
            .map(|(product_id, quantity)| json!({
                "product_id": product_id,
                "quantity": quantity,
            }))
            .collect::<Vec<_>>(),
        "shipping_address": {
            "name": "Asha Rao",
            "phone": "9999999999",
            "line1": "12 MG Road",
            "city": "Bengaluru",
            "state": "KA",
            "postal_code": "560001",
            "country": "IN"
        },
        "payment_method": payment_method,
    })
}
