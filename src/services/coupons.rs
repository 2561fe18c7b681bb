use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    entities::coupon::{self, DiscountType, Entity as CouponEntity, Model as CouponModel},
    errors::ServiceError,
};

/// Outcome of a successful coupon validation: the discount to apply and the
/// coupon to redeem when the order commits.
#[derive(Debug, Clone, Serialize)]
pub struct CouponQuote {
    pub coupon_id: Uuid,
    pub code: String,
    pub discount_amount: Decimal,
}

/// Validates coupon codes and computes discounts. Validation never touches
/// `used_count`; redemption happens inside the order-creation transaction via
/// the guarded [`redeem`](CouponService::redeem).
#[derive(Clone, Copy, Debug, Default)]
pub struct CouponService;

impl CouponService {
    pub fn new() -> Self {
        Self
    }

    /// Looks up a code (case-insensitive, stored uppercase) and evaluates it
    /// against the order amount at the current instant.
    #[instrument(skip(self, conn), fields(code = %code, %order_amount))]
    pub async fn validate<C: ConnectionTrait>(
        &self,
        conn: &C,
        code: &str,
        order_amount: Decimal,
    ) -> Result<CouponQuote, ServiceError> {
        let normalized = code.trim().to_uppercase();
        let coupon = CouponEntity::find()
            .filter(coupon::Column::Code.eq(normalized.clone()))
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("Coupon {normalized} not found"))
            })?;

        let discount_amount = evaluate(&coupon, order_amount, Utc::now())?;
        debug!(coupon_id = %coupon.id, %discount_amount, "coupon validated");

        Ok(CouponQuote {
            coupon_id: coupon.id,
            code: coupon.code,
            discount_amount,
        })
    }

    /// Increments `used_count` with a guard that survives concurrent
    /// redemptions at the limit boundary. Zero rows affected means another
    /// checkout took the last redemption first.
    #[instrument(skip(self, conn), fields(coupon_id = %coupon_id))]
    pub async fn redeem<C: ConnectionTrait>(
        &self,
        conn: &C,
        coupon_id: Uuid,
    ) -> Result<(), ServiceError> {
        let result = CouponEntity::update_many()
            .col_expr(
                coupon::Column::UsedCount,
                Expr::col(coupon::Column::UsedCount).add(1),
            )
            .col_expr(coupon::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(coupon::Column::Id.eq(coupon_id))
            .filter(
                Condition::any()
                    .add(coupon::Column::UsageLimit.is_null())
                    .add(
                        Expr::col(coupon::Column::UsedCount)
                            .lt(Expr::col(coupon::Column::UsageLimit)),
                    ),
            )
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Conflict(
                "Coupon usage limit reached".to_string(),
            ));
        }
        Ok(())
    }
}

/// Applies the rejection chain in its fixed order, then computes the
/// discount. Pure so the ordering and math are testable without a database.
pub fn evaluate(
    coupon: &CouponModel,
    order_amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Decimal, ServiceError> {
    if !coupon.is_active {
        return Err(ServiceError::ValidationError(format!(
            "Coupon {} is not active",
            coupon.code
        )));
    }
    if now < coupon.valid_from {
        return Err(ServiceError::ValidationError(format!(
            "Coupon {} is not yet valid",
            coupon.code
        )));
    }
    if let Some(valid_until) = coupon.valid_until {
        if now > valid_until {
            return Err(ServiceError::ValidationError(format!(
                "Coupon {} has expired",
                coupon.code
            )));
        }
    }
    if let Some(limit) = coupon.usage_limit {
        if coupon.used_count >= limit {
            return Err(ServiceError::ValidationError(format!(
                "Coupon {} usage limit reached",
                coupon.code
            )));
        }
    }
    if let Some(min_purchase) = coupon.min_purchase_amount {
        if order_amount < min_purchase {
            return Err(ServiceError::ValidationError(format!(
                "Order amount below the {min_purchase} minimum for coupon {}",
                coupon.code
            )));
        }
    }

    Ok(calculate_discount(coupon, order_amount))
}

/// Percentage discounts are clamped to `max_discount_amount`; fixed discounts
/// are taken verbatim and not capped at the order amount, matching observed
/// production behavior.
pub fn calculate_discount(coupon: &CouponModel, order_amount: Decimal) -> Decimal {
    match coupon.discount_type {
        DiscountType::Percentage => {
            let discount =
                (order_amount * coupon.discount_value / Decimal::from(100)).round_dp(2);
            match coupon.max_discount_amount {
                Some(max) => discount.min(max),
                None => discount,
            }
        }
        DiscountType::Fixed => coupon.discount_value,
    }
}
