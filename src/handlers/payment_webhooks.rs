use axum::{extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    errors::ServiceError,
    services::orders::PaymentOutcome,
    AppState,
};

pub const SIGNATURE_HEADER: &str = "x-signature";

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    event: String,
    payload: Option<WebhookPayload>,
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    payment: Option<WebhookPaymentWrapper>,
}

#[derive(Debug, Deserialize)]
struct WebhookPaymentWrapper {
    entity: Option<WebhookPaymentEntity>,
}

#[derive(Debug, Deserialize)]
struct WebhookPaymentEntity {
    id: String,
    order_id: Option<String>,
}

/// Asynchronous reconciliation path. The HMAC is checked over the exact raw
/// bytes before any parsing; a bad signature is a permanent 400, an unknown
/// event type is acknowledged with 200 so the gateway stops retrying, and a
/// processing failure propagates as 5xx so it retries.
#[utoipa::path(
    post,
    path = "/api/v1/payments/webhook",
    summary = "Gateway webhook",
    request_body = String,
    responses(
        (status = 200, description = "Event applied or acknowledged"),
        (status = 400, description = "Invalid signature or payload", body = crate::errors::ErrorResponse),
        (status = 500, description = "Processing failure, safe to retry", body = crate::errors::ErrorResponse),
    )
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ServiceError::BadRequest(format!("Missing {SIGNATURE_HEADER} header"))
        })?;

    if !state.services.gateway.verify_webhook_signature(&body, signature) {
        warn!("webhook signature verification failed");
        return Err(ServiceError::BadRequest(
            "Invalid webhook signature".to_string(),
        ));
    }

    let envelope: WebhookEnvelope = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    let outcome = match envelope.event.as_str() {
        "payment.authorized" | "payment.captured" => PaymentOutcome::Paid,
        "payment.failed" => PaymentOutcome::Failed,
        other => {
            info!(event = other, "ignoring unhandled webhook event");
            return Ok((StatusCode::OK, "ignored"));
        }
    };

    let entity = envelope
        .payload
        .and_then(|p| p.payment)
        .and_then(|p| p.entity)
        .ok_or_else(|| {
            ServiceError::BadRequest("Webhook payload has no payment entity".to_string())
        })?;
    let gateway_order_id = entity.order_id.ok_or_else(|| {
        ServiceError::BadRequest("Webhook payment entity has no order reference".to_string())
    })?;

    state
        .services
        .orders
        .apply_payment_result(&gateway_order_id, outcome, Some(entity.id), None)
        .await?;

    Ok((StatusCode::OK, "ok"))
}
