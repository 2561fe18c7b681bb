use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entities::order::{self, Entity as OrderEntity, OrderStatus},
    entities::order_item::{self, Entity as OrderItemEntity},
    entities::order_status_history::{self, Entity as HistoryEntity},
    errors::ServiceError,
    services::orders::{order_model_to_response, OrderResponse},
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// 1-based page number.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub customer_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusHistoryResponse {
    pub status: String,
    pub comment: Option<String>,
    pub actor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// An order together with its immutable line-item snapshot and audit trail.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    pub history: Vec<StatusHistoryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedOrders {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Read side of the order store. Never mutates; every lookup that misses
/// resolves to a not-found error rather than an empty success.
#[derive(Clone)]
pub struct OrderQueryService {
    db: Arc<DatabaseConnection>,
}

impl OrderQueryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderDetailResponse, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;
        self.hydrate(order).await
    }

    pub async fn get_order_by_number(
        &self,
        order_number: &str,
    ) -> Result<OrderDetailResponse, ServiceError> {
        let order = OrderEntity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Order {order_number} not found"))
            })?;
        self.hydrate(order).await
    }

    /// Newest-first listing, optionally scoped to a customer and/or status.
    /// An unknown status filter is a validation error, not an empty page.
    pub async fn list_orders(
        &self,
        query: ListOrdersQuery,
    ) -> Result<PaginatedOrders, ServiceError> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let mut finder = OrderEntity::find().order_by_desc(order::Column::CreatedAt);
        if let Some(customer_id) = query.customer_id {
            finder = finder.filter(order::Column::CustomerId.eq(customer_id));
        }
        if let Some(raw_status) = &query.status {
            let status = OrderStatus::parse(raw_status).ok_or_else(|| {
                ServiceError::ValidationError(format!("Unknown order status {raw_status}"))
            })?;
            finder = finder.filter(order::Column::Status.eq(status));
        }

        let paginator = finder.paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let total_pages = total.div_ceil(per_page);
        let orders = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(order_model_to_response)
            .collect();

        Ok(PaginatedOrders {
            orders,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    async fn hydrate(&self, order: order::Model) -> Result<OrderDetailResponse, ServiceError> {
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .order_by_asc(order_item::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|item| OrderItemResponse {
                id: item.id,
                product_id: item.product_id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                line_total: item.line_total,
            })
            .collect();

        let history = HistoryEntity::find()
            .filter(order_status_history::Column::OrderId.eq(order.id))
            .order_by_asc(order_status_history::Column::CreatedAt)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|entry| StatusHistoryResponse {
                status: entry.status,
                comment: entry.comment,
                actor_id: entry.actor_id,
                created_at: entry.created_at,
            })
            .collect();

        Ok(OrderDetailResponse {
            order: order_model_to_response(order),
            items,
            history,
        })
    }
}
