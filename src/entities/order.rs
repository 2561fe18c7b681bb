use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order entity. Monetary fields are frozen at creation; only refund
/// bookkeeping may touch them afterwards. Lifecycle timestamps are
/// write-once, stamped by the transition that causes them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-facing identifier, globally unique (enforced by index).
    #[validate(length(
        min = 1,
        max = 50,
        message = "Order number must be between 1 and 50 characters"
    ))]
    pub order_number: String,

    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub shipping_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_amount: Decimal,
    pub currency: String,

    /// Coupon code applied at creation time; frozen, never re-validated.
    #[sea_orm(nullable)]
    pub coupon_code: Option<String>,

    /// Gateway references, set only by the verify/webhook reconciliation path.
    #[sea_orm(nullable)]
    pub gateway_order_id: Option<String>,
    #[sea_orm(nullable)]
    pub gateway_payment_id: Option<String>,
    #[sea_orm(nullable)]
    pub gateway_signature: Option<String>,
    /// Best-effort enrichment from the gateway (JSON), never load-bearing.
    #[sea_orm(nullable)]
    pub payment_details: Option<String>,

    #[sea_orm(nullable)]
    pub refund_id: Option<String>,
    #[sea_orm(nullable)]
    pub refund_amount: Option<Decimal>,
    #[sea_orm(nullable)]
    pub refund_reason: Option<String>,

    #[sea_orm(nullable)]
    pub tracking_number: Option<String>,
    pub shipping_address: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub shipped_at: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub paid_at: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub refunded_at: Option<DateTime<Utc>>,

    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::order_status_history::Entity")]
    StatusHistory,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::order_status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Closed order status space; anything outside this set is rejected at the
/// boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "packed")]
    Packed,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "out_for_delivery")]
    OutForDelivery,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl OrderStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "processing" => Some(Self::Processing),
            "packed" => Some(Self::Packed),
            "shipped" => Some(Self::Shipped),
            "out_for_delivery" => Some(Self::OutForDelivery),
            "delivered" => Some(Self::Delivered),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Packed => "packed",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Cancellation is the one transition the business rules restrict.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Processing)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash_on_delivery")]
    CashOnDelivery,
    #[sea_orm(string_value = "gateway")]
    Gateway,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "cash_on_delivery" | "cod" => Some(Self::CashOnDelivery),
            "gateway" | "online" => Some(Self::Gateway),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_closed_status_set() {
        for (raw, expected) in [
            ("pending", OrderStatus::Pending),
            ("confirmed", OrderStatus::Confirmed),
            ("processing", OrderStatus::Processing),
            ("packed", OrderStatus::Packed),
            ("SHIPPED", OrderStatus::Shipped),
            ("out_for_delivery", OrderStatus::OutForDelivery),
            ("delivered", OrderStatus::Delivered),
            ("cancelled", OrderStatus::Cancelled),
            ("canceled", OrderStatus::Cancelled),
            ("refunded", OrderStatus::Refunded),
        ] {
            assert_eq!(OrderStatus::parse(raw), Some(expected), "status {raw}");
        }
        assert_eq!(OrderStatus::parse("on_hold"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn cancellation_window_covers_pre_fulfillment_states_only() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(OrderStatus::Confirmed.is_cancellable());
        assert!(OrderStatus::Processing.is_cancellable());
        for status in [
            OrderStatus::Packed,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert!(!status.is_cancellable(), "{status:?} must not be cancellable");
        }
    }
}
