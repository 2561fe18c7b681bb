use utoipa::OpenApi;

use crate::entities::order::{OrderStatus, PaymentMethod, PaymentStatus};
use crate::errors::ErrorResponse;
use crate::handlers;
use crate::services::order_queries::{
    OrderDetailResponse, OrderItemResponse, PaginatedOrders, StatusHistoryResponse,
};
use crate::services::orders::{
    CreateOrderRequest, OrderItemInput, OrderResponse, ShippingAddressInput,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orderflow API",
        description = r#"
Order lifecycle and payment reconciliation backend.

Orders snapshot their line items at creation, reserve stock atomically and
redeem coupons under a usage-limit guard, all in one transaction. Gateway
payments reconcile through a synchronous verify endpoint and an asynchronous
HMAC-signed webhook; both paths converge on the same idempotent state move.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::cancel_order,
        handlers::orders::update_order_status,
        handlers::payments::create_gateway_order,
        handlers::payments::verify_payment,
        handlers::payments::refund_payment,
        handlers::payment_webhooks::payment_webhook,
        handlers::health::health,
        handlers::health::ready,
    ),
    components(schemas(
        CreateOrderRequest,
        OrderItemInput,
        ShippingAddressInput,
        OrderResponse,
        OrderDetailResponse,
        OrderItemResponse,
        StatusHistoryResponse,
        PaginatedOrders,
        OrderStatus,
        PaymentStatus,
        PaymentMethod,
        ErrorResponse,
        handlers::orders::UpdateStatusRequest,
        handlers::orders::CancelOrderRequest,
        handlers::payments::CreateGatewayOrderRequest,
        handlers::payments::GatewayOrderResponse,
        handlers::payments::VerifyPaymentRequest,
        handlers::payments::RefundRequest,
    )),
    tags(
        (name = "Orders", description = "Order lifecycle"),
        (name = "Payments", description = "Gateway reconciliation and refunds"),
        (name = "Health", description = "Probes")
    )
)]
pub struct ApiDoc;
