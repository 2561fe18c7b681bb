mod common;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{assert_json, order_payload, TestApp};

const GATEWAY_ORDER_ID: &str = "order_g1";

async fn mock_intent_endpoint(server: &MockServer, amount_minor: i64) {
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": GATEWAY_ORDER_ID,
            "amount": amount_minor,
            "currency": "INR",
        })))
        .mount(server)
        .await;
}

/// Creates a gateway-method order and registers it with the mock gateway.
/// Returns (order UUID, order number).
async fn gateway_order(app: &TestApp, price: Decimal, qty: i32) -> (String, String) {
    let product_id = app
        .seed_product(
            &format!("Gadget {}", Uuid::new_v4().simple()),
            &format!("SKU-{}", Uuid::new_v4().simple()),
            price,
            50,
            true,
        )
        .await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(order_payload(
                Uuid::new_v4(),
                vec![(product_id, qty)],
                "gateway",
            )),
        )
        .await;
    let body = assert_json(response, StatusCode::CREATED).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let order_number = body["data"]["order_number"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::POST,
            "/api/v1/payments/create-order",
            Some(json!({ "order_id": order_id })),
        )
        .await;
    let body = assert_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["gateway_order_id"], GATEWAY_ORDER_ID);
    assert!(!body["data"]["key_id"].as_str().unwrap().is_empty());

    (order_id, order_number)
}

async fn order_payment_state(app: &TestApp, order_number: &str) -> Value {
    let response = app
        .request(Method::GET, &format!("/api/v1/orders/{order_number}"), None)
        .await;
    assert_json(response, StatusCode::OK).await
}

fn payment_webhook_body(event: &str, payment_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": event,
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "order_id": GATEWAY_ORDER_ID,
                }
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn intent_creation_persists_the_gateway_reference() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["gateway_order_id"], GATEWAY_ORDER_ID);
    assert_eq!(body["data"]["payment_status"], "pending");
}

#[tokio::test]
async fn cod_orders_cannot_create_gateway_intents() {
    let server = MockServer::start().await;
    let app = TestApp::with_gateway(&server.uri()).await;
    let product_id = app
        .seed_product("Apron", "SKU-APRON", dec!(90.00), 5, true)
        .await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(order_payload(
                Uuid::new_v4(),
                vec![(product_id, 1)],
                "cash_on_delivery",
            )),
        )
        .await;
    let body = assert_json(response, StatusCode::CREATED).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::POST,
            "/api/v1/payments/create-order",
            Some(json!({ "order_id": order_id })),
        )
        .await;
    assert_json(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn verify_applies_payment_exactly_once() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    Mock::given(method("GET"))
        .and(path("/payments/pay_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pay_123",
            "method": "upi",
            "vpa": "asha@upi",
        })))
        .mount(&server)
        .await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;
    let signature = app.payment_signature(GATEWAY_ORDER_ID, "pay_123");

    let verify = json!({
        "gateway_order_id": GATEWAY_ORDER_ID,
        "gateway_payment_id": "pay_123",
        "gateway_signature": signature,
    });
    let response = app
        .request(Method::POST, "/api/v1/payments/verify", Some(verify.clone()))
        .await;
    let body = assert_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["payment_status"], "paid");
    assert_eq!(body["data"]["gateway_payment_id"], "pay_123");
    let paid_at = body["data"]["paid_at"].as_str().unwrap().to_string();

    // Replaying the same verification is a no-op, not a double credit.
    let response = app
        .request(Method::POST, "/api/v1/payments/verify", Some(verify))
        .await;
    let body = assert_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["payment_status"], "paid");
    assert_eq!(body["data"]["paid_at"], paid_at.as_str());

    // So is the webhook arriving after the synchronous path won the race.
    let webhook_body = payment_webhook_body("payment.captured", "pay_123");
    let sig = app.webhook_signature(&webhook_body);
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            webhook_body,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "paid");
    assert_eq!(body["data"]["paid_at"], paid_at.as_str());
}

#[tokio::test]
async fn verify_with_a_bad_signature_marks_the_payment_failed() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 31500).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(300.00), 1).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/payments/verify",
            Some(json!({
                "gateway_order_id": GATEWAY_ORDER_ID,
                "gateway_payment_id": "pay_bad",
                "gateway_signature": "deadbeef",
            })),
        )
        .await;
    assert_json(response, StatusCode::BAD_REQUEST).await;

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "failed");
}

#[tokio::test]
async fn webhook_capture_settles_the_order() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let webhook_body = payment_webhook_body("payment.captured", "pay_hook");
    let sig = app.webhook_signature(&webhook_body);
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            webhook_body,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "paid");
    assert_eq!(body["data"]["gateway_payment_id"], "pay_hook");
}

// Some gateway configurations deliver payment.authorized instead of
// payment.captured. Both settle the order.
#[tokio::test]
async fn webhook_authorization_settles_the_order() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let webhook_body = payment_webhook_body("payment.authorized", "pay_auth");
    let sig = app.webhook_signature(&webhook_body);
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            webhook_body,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "paid");
    assert_eq!(body["data"]["gateway_payment_id"], "pay_auth");
}

#[tokio::test]
async fn webhook_with_a_bad_signature_changes_nothing() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let webhook_body = payment_webhook_body("payment.captured", "pay_forged");
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            webhook_body.clone(),
            &[("x-signature", "0000000000000000")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing signature header is also a permanent rejection.
    let response = app
        .post_raw("/api/v1/payments/webhook", webhook_body, &[])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "pending");
    assert!(body["data"]["gateway_payment_id"].is_null());
}

#[tokio::test]
async fn webhook_failure_event_is_recorded_but_never_downgrades_paid() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let failed_body = serde_json::to_vec(&json!({
        "event": "payment.failed",
        "payload": {
            "payment": { "entity": { "id": "pay_f", "order_id": GATEWAY_ORDER_ID } }
        }
    }))
    .unwrap();
    let sig = app.webhook_signature(&failed_body);
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            failed_body.clone(),
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "failed");

    // Settle another order, then replay a stale failure: paid wins.
    let server2 = MockServer::start().await;
    mock_intent_endpoint(&server2, 55125).await;
    let app2 = TestApp::with_gateway(&server2.uri()).await;
    let (_, order_number2) = gateway_order(&app2, dec!(500.00), 1).await;

    let captured = payment_webhook_body("payment.captured", "pay_ok");
    let sig = app2.webhook_signature(&captured);
    let response = app2
        .post_raw(
            "/api/v1/payments/webhook",
            captured,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let failed_body = serde_json::to_vec(&json!({
        "event": "payment.failed",
        "payload": {
            "payment": { "entity": { "id": "pay_ok", "order_id": GATEWAY_ORDER_ID } }
        }
    }))
    .unwrap();
    let sig = app2.webhook_signature(&failed_body);
    let response = app2
        .post_raw(
            "/api/v1/payments/webhook",
            failed_body,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = order_payment_state(&app2, &order_number2).await;
    assert_eq!(body["data"]["payment_status"], "paid");
}

#[tokio::test]
async fn unknown_webhook_events_are_acknowledged_and_ignored() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (_, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let body_bytes = serde_json::to_vec(&json!({
        "event": "order.settled",
        "payload": {}
    }))
    .unwrap();
    let sig = app.webhook_signature(&body_bytes);
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            body_bytes,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["payment_status"], "pending");
}

#[tokio::test]
async fn refund_reverses_a_paid_order_without_restoring_stock() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    Mock::given(method("POST"))
        .and(path("/payments/pay_hook/refund"))
        .and(body_partial_json(json!({ "amount": 30000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rfnd_1",
            "amount": 30000,
            "status": "processed",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (order_id, order_number) = gateway_order(&app, dec!(500.00), 1).await;

    let webhook_body = payment_webhook_body("payment.captured", "pay_hook");
    let sig = app.webhook_signature(&webhook_body);
    let response = app
        .post_raw(
            "/api/v1/payments/webhook",
            webhook_body,
            &[("x-signature", &sig)],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            "/api/v1/payments/refund",
            Some(json!({
                "order_id": order_id,
                "amount": "300.00",
                "reason": "damaged in transit",
            })),
        )
        .await;
    let body = assert_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["payment_status"], "refunded");
    assert_eq!(body["data"]["refund_id"], "rfnd_1");
    assert_eq!(
        body["data"]["refund_amount"].as_str().unwrap().parse::<Decimal>().unwrap(),
        dec!(300.00)
    );
    assert!(!body["data"]["refunded_at"].is_null());

    // Refunds are financial only: the fulfillment status is untouched.
    let body = order_payment_state(&app, &order_number).await;
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn refund_is_rejected_before_payment_without_calling_the_gateway() {
    let server = MockServer::start().await;
    mock_intent_endpoint(&server, 55125).await;
    Mock::given(method("POST"))
        .and(path("/payments/pay_none/refund"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = TestApp::with_gateway(&server.uri()).await;

    let (order_id, _) = gateway_order(&app, dec!(500.00), 1).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/payments/refund",
            Some(json!({ "order_id": order_id })),
        )
        .await;
    assert_json(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn cod_settlement_cannot_be_refunded_through_the_gateway() {
    let server = MockServer::start().await;
    let app = TestApp::with_gateway(&server.uri()).await;
    let product_id = app
        .seed_product("Spice Box", "SKU-SPICE", dec!(150.00), 5, true)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(order_payload(
                Uuid::new_v4(),
                vec![(product_id, 1)],
                "cash_on_delivery",
            )),
        )
        .await;
    let body = assert_json(response, StatusCode::CREATED).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // Deliver to settle the COD payment.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "delivered" })),
        )
        .await;
    let body = assert_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["payment_status"], "paid");

    // Paid, but with no gateway payment behind it.
    let response = app
        .request(
            Method::POST,
            "/api/v1/payments/refund",
            Some(json!({ "order_id": order_id })),
        )
        .await;
    assert_json(response, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn health_probes_respond() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
