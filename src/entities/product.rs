use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Product subset relevant to order fulfillment: the priced, stock-managed
/// row the ledger decrements against. Catalog concerns (images, categories,
/// descriptions) live elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "SKU must be between 1 and 100 characters"))]
    pub sku: String,

    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub price: Decimal,

    /// Never negative; updated only through conditional ledger statements.
    pub stock_quantity: i32,

    /// When false the ledger never checks or touches this row.
    pub manage_stock: bool,

    pub stock_status: StockStatus,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Derived availability flag: in stock iff quantity > 0 or stock is unmanaged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "out_of_stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }

    pub fn derive(stock_quantity: i32, manage_stock: bool) -> Self {
        if !manage_stock || stock_quantity > 0 {
            Self::InStock
        } else {
            Self::OutOfStock
        }
    }
}
