use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Coupon row. Codes are stored uppercase and matched case-insensitively.
/// `used_count <= usage_limit` is enforced by the guarded increment in the
/// coupon service, not by application-level reads.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub code: String,

    pub discount_type: DiscountType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_value: Decimal,

    #[sea_orm(nullable)]
    pub min_purchase_amount: Option<Decimal>,
    /// Applies only to percentage coupons.
    #[sea_orm(nullable)]
    pub max_discount_amount: Option<Decimal>,

    /// None = unlimited redemptions.
    #[sea_orm(nullable)]
    pub usage_limit: Option<i32>,
    pub used_count: i32,

    pub valid_from: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub valid_until: Option<DateTime<Utc>>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed")]
    Fixed,
}
