use axum::{extract::State, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    services::orders::{OrderResponse, PaymentOutcome},
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGatewayOrderRequest {
    pub order_id: Uuid,
}

/// What the checkout frontend needs to open the gateway's payment widget.
#[derive(Debug, Serialize, ToSchema)]
pub struct GatewayOrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub gateway_order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub key_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefundRequest {
    pub order_id: Uuid,
    /// Omitted for a full refund.
    pub amount: Option<Decimal>,
    pub reason: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/create-order",
    summary = "Create gateway payment intent",
    description = "Registers the order with the payment gateway and persists the gateway's order reference",
    request_body = CreateGatewayOrderRequest,
    responses(
        (status = 200, description = "Intent created", body = ApiResponse<GatewayOrderResponse>),
        (status = 400, description = "Order is not gateway-payable or already settled", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Gateway unavailable", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_gateway_order(
    State(state): State<AppState>,
    Json(request): Json<CreateGatewayOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let (order, intent) = state
        .services
        .orders
        .initiate_gateway_payment(request.order_id)
        .await?;
    Ok(Json(ApiResponse::success(GatewayOrderResponse {
        order_id: order.id,
        order_number: order.order_number,
        gateway_order_id: intent.id,
        amount: order.total_amount,
        currency: order.currency,
        key_id: state.services.gateway.key_id().to_string(),
    })))
}

/// Synchronous reconciliation path: the checkout frontend posts the triple it
/// received from the gateway. The signature must bind the payment to the
/// gateway order before any state moves.
#[utoipa::path(
    post,
    path = "/api/v1/payments/verify",
    summary = "Verify gateway payment",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified and applied", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Signature mismatch", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown gateway order reference", body = crate::errors::ErrorResponse),
    )
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let valid = state.services.gateway.verify_payment_signature(
        &request.gateway_order_id,
        &request.gateway_payment_id,
        &request.gateway_signature,
    );

    if !valid {
        warn!(
            gateway_order_id = %request.gateway_order_id,
            "payment signature mismatch"
        );
        if let Err(e) = state
            .services
            .orders
            .apply_payment_result(
                &request.gateway_order_id,
                PaymentOutcome::Failed,
                Some(request.gateway_payment_id.clone()),
                None,
            )
            .await
        {
            warn!(error = %e, "could not record failed verification");
        }
        return Err(ServiceError::PaymentFailed(
            "Payment signature verification failed".to_string(),
        ));
    }

    let order = state
        .services
        .orders
        .apply_payment_result(
            &request.gateway_order_id,
            PaymentOutcome::Paid,
            Some(request.gateway_payment_id),
            Some(request.gateway_signature),
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        order,
        "Payment verified",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/refund",
    summary = "Refund a paid order",
    description = "Issues a gateway refund and records the reversal; stock is not restored",
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund recorded", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Order is not paid or has no gateway payment", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Gateway refund failed", body = crate::errors::ErrorResponse),
    )
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    Json(request): Json<RefundRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .services
        .orders
        .refund(request.order_id, request.amount, request.reason)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        order,
        "Refund recorded",
    )))
}
