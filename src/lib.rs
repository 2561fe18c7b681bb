use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, patch, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod openapi;
pub mod services;

use services::orders::OrderService;
use services::order_queries::OrderQueryService;
use services::payment_gateway::PaymentGatewayClient;

/// Service container shared across handlers.
#[derive(Clone)]
pub struct AppServices {
    pub orders: OrderService,
    pub order_queries: OrderQueryService,
    pub gateway: Arc<PaymentGatewayClient>,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Result<Self, errors::ServiceError> {
        let gateway = Arc::new(PaymentGatewayClient::new(&config.gateway)?);
        let services = AppServices {
            orders: OrderService::new(
                db.clone(),
                event_sender.clone(),
                gateway.clone(),
                config.pricing.clone(),
                config.gateway.currency.clone(),
            ),
            order_queries: OrderQueryService::new(db.clone()),
            gateway,
        };
        Ok(Self {
            db,
            config,
            event_sender,
            services,
        })
    }
}

/// Standard response envelope.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/orders/:id", get(handlers::orders::get_order))
        .route("/orders/:id/cancel", patch(handlers::orders::cancel_order))
        .route(
            "/orders/:id/status",
            put(handlers::orders::update_order_status),
        )
        .route(
            "/payments/create-order",
            post(handlers::payments::create_gateway_order),
        )
        .route("/payments/verify", post(handlers::payments::verify_payment))
        .route(
            "/payments/webhook",
            post(handlers::payment_webhooks::payment_webhook),
        )
        .route("/payments/refund", post(handlers::payments::refund_payment))
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
        .nest("/api/v1", api_v1_routes())
        .merge(
            SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CompressionLayer::new())
        .with_state(state)
}
