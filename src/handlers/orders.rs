use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::Actor,
    entities::order::OrderStatus,
    errors::ServiceError,
    services::order_queries::{ListOrdersQuery, OrderDetailResponse, PaginatedOrders},
    services::orders::{CreateOrderRequest, OrderResponse},
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    description = "Create an order: snapshots line items, applies an optional coupon and reserves stock atomically",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation, coupon or stock failure", body = crate::errors::ErrorResponse),
        (status = 409, description = "Coupon usage limit reached", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(order, "Order created")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Paginated orders, newest first", body = ApiResponse<PaginatedOrders>),
        (status = 400, description = "Unknown status filter", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.order_queries.list_orders(query).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// Accepts either the UUID or the public order number.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    params(("id" = String, Path, description = "Order UUID or order number")),
    responses(
        (status = 200, description = "Order with items and history", body = ApiResponse<OrderDetailResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = match Uuid::parse_str(&id) {
        Ok(order_id) => state.services.order_queries.get_order(order_id).await?,
        Err(_) => {
            state
                .services
                .order_queries
                .get_order_by_number(&id)
                .await?
        }
    };
    Ok(Json(ApiResponse::success(detail)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/orders/{order_number}/cancel",
    summary = "Cancel order",
    description = "Cancels an order and releases its stock; only pending, confirmed or processing orders can be cancelled",
    params(("order_number" = String, Path, description = "Public order number")),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Order is not cancellable", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    actor: Actor,
    request: Option<Json<CancelOrderRequest>>,
) -> Result<impl IntoResponse, ServiceError> {
    let reason = request.and_then(|Json(r)| r.reason);
    let detail = state
        .services
        .order_queries
        .get_order_by_number(&order_number)
        .await?;
    let order = state
        .services
        .orders
        .cancel_order(detail.order.id, actor.id, reason)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        order,
        "Order cancelled",
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    description = "Applies a lifecycle transition with its side effects (tracking, timestamps, COD settlement, stock release)",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Unknown status or disallowed transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = OrderStatus::parse(&request.status).ok_or_else(|| {
        ServiceError::InvalidStatus(format!("Unknown order status: {}", request.status))
    })?;
    let order = state
        .services
        .orders
        .update_status(id, status, actor.id, request.comment)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}
