use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::PricingConfig,
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
        OrderStatus, PaymentMethod, PaymentStatus,
    },
    entities::order_item::{self, Entity as OrderItemEntity},
    entities::order_status_history,
    entities::product::Entity as ProductEntity,
    errors::ServiceError,
    events::{Event, EventSender},
    services::coupons::CouponService,
    services::payment_gateway::{
        from_minor_units, to_minor_units, GatewayIntent, PaymentGatewayClient,
    },
    services::stock::StockLedgerService,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ShippingAddressInput {
    #[validate(length(min = 1, max = 255, message = "Recipient name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, max = 255, message = "Address line is required"))]
    pub line1: String,
    pub line2: Option<String>,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, max = 20, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,
}

impl ShippingAddressInput {
    /// Flattens to the single-line snapshot stored on the order.
    pub fn format(&self) -> String {
        let mut parts = vec![self.name.trim().to_string(), self.line1.trim().to_string()];
        if let Some(line2) = &self.line2 {
            if !line2.trim().is_empty() {
                parts.push(line2.trim().to_string());
            }
        }
        parts.push(self.city.trim().to_string());
        parts.push(self.state.trim().to_string());
        parts.push(format!(
            "{} {}",
            self.country.trim(),
            self.postal_code.trim()
        ));
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[validate]
    pub items: Vec<OrderItemInput>,
    #[validate]
    pub shipping_address: ShippingAddressInput,
    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub shipping_amount: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub coupon_code: Option<String>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub tracking_number: Option<String>,
    pub shipping_address: String,
    pub refund_id: Option<String>,
    pub refund_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub version: i32,
}

/// Reconciliation outcome delivered by either the synchronous verify call or
/// the asynchronous webhook; both converge on the same application path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Failed,
}

/// The order lifecycle state machine. Owns status, payment status and
/// timestamps; orchestrates the stock ledger and coupon engine during
/// creation and cancellation, and absorbs gateway callbacks idempotently.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    gateway: Arc<PaymentGatewayClient>,
    stock: StockLedgerService,
    coupons: CouponService,
    pricing: PricingConfig,
    currency: String,
}

impl OrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        gateway: Arc<PaymentGatewayClient>,
        pricing: PricingConfig,
        currency: String,
    ) -> Self {
        Self {
            db,
            event_sender,
            gateway,
            stock: StockLedgerService::new(),
            coupons: CouponService::new(),
            pricing,
            currency,
        }
    }

    /// Creates an order: snapshots the line items, validates and redeems the
    /// coupon, and reserves stock inside one transaction, so a failed
    /// reservation rolls back every prior reservation and the coupon
    /// increment with it.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        if request.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }

        let db = &*self.db;
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "failed to start order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        // Snapshot products and compute the declared subtotal first; the
        // coupon is validated against it before any stock moves.
        let mut snapshots = Vec::with_capacity(request.items.len());
        let mut subtotal = Decimal::ZERO;
        for item in &request.items {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!(
                        "Product {} not found",
                        item.product_id
                    ))
                })?;
            if !product.is_active {
                return Err(ServiceError::ValidationError(format!(
                    "Product {} is not available",
                    product.name
                )));
            }
            let line_total = product.price * Decimal::from(item.quantity);
            subtotal += line_total;
            snapshots.push((product, item.quantity, line_total));
        }

        let coupon_quote = match &request.coupon_code {
            Some(code) => Some(self.coupons.validate(&txn, code, subtotal).await?),
            None => None,
        };
        let discount_amount = coupon_quote
            .as_ref()
            .map(|q| q.discount_amount)
            .unwrap_or(Decimal::ZERO);

        for (product, quantity, _) in &snapshots {
            self.stock.reserve(&txn, product.id, *quantity).await?;
        }

        if let Some(quote) = &coupon_quote {
            self.coupons.redeem(&txn, quote.coupon_id).await?;
        }

        let (shipping_amount, tax_amount, total_amount) =
            compute_totals(subtotal, discount_amount, &self.pricing);
        if total_amount < Decimal::ZERO {
            // Fixed coupons are not capped at the order amount; see the
            // coupon engine. Surfaced for reconciliation rather than blocked.
            warn!(%order_id, %total_amount, "order total is negative after fixed discount");
        }

        let order_number = generate_order_number();
        let order_active_model = OrderActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            customer_id: Set(request.customer_id),
            status: Set(OrderStatus::Pending),
            payment_status: Set(PaymentStatus::Pending),
            payment_method: Set(request.payment_method),
            subtotal: Set(subtotal),
            shipping_amount: Set(shipping_amount),
            tax_amount: Set(tax_amount),
            discount_amount: Set(discount_amount),
            total_amount: Set(total_amount),
            currency: Set(self.currency.clone()),
            coupon_code: Set(coupon_quote.as_ref().map(|q| q.code.clone())),
            gateway_order_id: Set(None),
            gateway_payment_id: Set(None),
            gateway_signature: Set(None),
            payment_details: Set(None),
            refund_id: Set(None),
            refund_amount: Set(None),
            refund_reason: Set(None),
            tracking_number: Set(None),
            shipping_address: Set(request.shipping_address.format()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            shipped_at: Set(None),
            delivered_at: Set(None),
            cancelled_at: Set(None),
            paid_at: Set(None),
            refunded_at: Set(None),
            version: Set(1),
        };

        let order_model = order_active_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, %order_id, "failed to insert order");
            ServiceError::DatabaseError(e)
        })?;

        for (product, quantity, line_total) in &snapshots {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(Some(product.id)),
                name: Set(product.name.clone()),
                price: Set(product.price),
                quantity: Set(*quantity),
                line_total: Set(*line_total),
                created_at: Set(now),
            };
            item.insert(&txn).await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, %order_id, "failed to commit order creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(%order_id, %order_number, "order created");

        self.record_history(order_id, OrderStatus::Pending.as_str(), None, None)
            .await;
        self.event_sender.send(Event::OrderCreated(order_id)).await;

        Ok(order_model_to_response(order_model))
    }

    /// Applies a status transition with its side effects. Transitions are
    /// permissive within the closed status set except cancellation, which is
    /// only allowed from pending/confirmed/processing. Timestamps are
    /// write-once, so re-entering a state never restamps or regenerates.
    #[instrument(skip(self, comment), fields(order_id = %order_id, new_status = %new_status.as_str()))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        actor: Option<Uuid>,
        comment: Option<String>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;
        let now = Utc::now();

        let txn = db.begin().await?;

        let existing = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

        let old_status = existing.status;

        if new_status == OrderStatus::Cancelled && !old_status.is_cancellable() {
            return Err(ServiceError::InvalidOperation(format!(
                "Order in status {} cannot be cancelled",
                old_status.as_str()
            )));
        }

        // Claim the row against the version we read so two concurrent
        // transitions cannot both act on the same snapshot. The loser of a
        // race matches zero rows and never runs the side effects below.
        let claimed = OrderEntity::update_many()
            .col_expr(order::Column::Version, Expr::value(existing.version + 1))
            .filter(order::Column::Id.eq(order_id))
            .filter(order::Column::Version.eq(existing.version))
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            warn!(%order_id, "status transition lost a concurrent update race");
            return Err(ServiceError::Conflict(
                "Order was modified concurrently, retry the request".to_string(),
            ));
        }

        let order_snapshot = existing.clone();
        let mut active: OrderActiveModel = existing.into();
        active.status = Set(new_status);
        active.updated_at = Set(Some(now));
        active.version = Set(order_snapshot.version + 1);

        match new_status {
            OrderStatus::Shipped => {
                if order_snapshot.shipped_at.is_none() {
                    active.shipped_at = Set(Some(now));
                }
                if order_snapshot.tracking_number.is_none() {
                    active.tracking_number = Set(Some(generate_tracking_number()));
                }
            }
            OrderStatus::Delivered => {
                if order_snapshot.delivered_at.is_none() {
                    active.delivered_at = Set(Some(now));
                }
                // Cash on delivery settles at the doorstep.
                if order_snapshot.payment_method == PaymentMethod::CashOnDelivery
                    && order_snapshot.payment_status != PaymentStatus::Paid
                {
                    active.payment_status = Set(PaymentStatus::Paid);
                    if order_snapshot.paid_at.is_none() {
                        active.paid_at = Set(Some(now));
                    }
                }
            }
            OrderStatus::Cancelled => {
                active.cancelled_at = Set(Some(now));
                // The cancellable-from guard above means this branch runs at
                // most once per order, so each reservation is released exactly
                // once.
                let items = OrderItemEntity::find()
                    .filter(order_item::Column::OrderId.eq(order_id))
                    .all(&txn)
                    .await?;
                for item in items {
                    if let Some(product_id) = item.product_id {
                        self.stock.release(&txn, product_id, item.quantity).await?;
                    }
                }
            }
            _ => {}
        }

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, %order_id, "failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await?;

        info!(
            %order_id,
            old_status = old_status.as_str(),
            new_status = new_status.as_str(),
            "order status updated"
        );

        self.record_history(order_id, new_status.as_str(), comment, actor)
            .await;
        self.event_sender
            .send(Event::OrderStatusChanged {
                order_id,
                old_status: old_status.as_str().to_string(),
                new_status: new_status.as_str().to_string(),
            })
            .await;
        if new_status == OrderStatus::Cancelled {
            self.event_sender.send(Event::OrderCancelled(order_id)).await;
        }

        Ok(order_model_to_response(updated))
    }

    /// Cancels an order, releasing its stock. Thin wrapper over the status
    /// transition so the release logic lives in exactly one place.
    #[instrument(skip(self, reason), fields(order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        order_id: Uuid,
        actor: Option<Uuid>,
        reason: Option<String>,
    ) -> Result<OrderResponse, ServiceError> {
        self.update_status(order_id, OrderStatus::Cancelled, actor, reason)
            .await
    }

    /// Creates the gateway payment intent for an order and records the
    /// gateway's order reference for later reconciliation.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn initiate_gateway_payment(
        &self,
        order_id: Uuid,
    ) -> Result<(OrderResponse, GatewayIntent), ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

        if order.payment_method != PaymentMethod::Gateway {
            return Err(ServiceError::InvalidOperation(
                "Order is not payable through the gateway".to_string(),
            ));
        }
        if order.payment_status != PaymentStatus::Pending {
            return Err(ServiceError::InvalidOperation(format!(
                "Order payment is already {}",
                order.payment_status.as_str()
            )));
        }

        let intent = self
            .gateway
            .create_intent(order.total_amount, &order.currency, &order.order_number)
            .await?;

        let mut active: OrderActiveModel = order.clone().into();
        active.gateway_order_id = Set(Some(intent.id.clone()));
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(order.version + 1);
        let updated = active.update(&*self.db).await?;

        info!(%order_id, gateway_order_id = %intent.id, "gateway intent created");
        Ok((order_model_to_response(updated), intent))
    }

    /// Converges both reconciliation paths (synchronous verify and webhook)
    /// onto one idempotent application keyed on the gateway's order
    /// reference. The paid move is a conditional pending→paid update;
    /// applying "paid" a second time is a logged no-op, never a double
    /// credit.
    #[instrument(skip(self, signature), fields(gateway_order_id = %gateway_order_id, ?outcome))]
    pub async fn apply_payment_result(
        &self,
        gateway_order_id: &str,
        outcome: PaymentOutcome,
        payment_id: Option<String>,
        signature: Option<String>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;

        let order = OrderEntity::find()
            .filter(order::Column::GatewayOrderId.eq(gateway_order_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No order for gateway reference {gateway_order_id}"
                ))
            })?;

        let now = Utc::now();
        match outcome {
            PaymentOutcome::Paid => {
                let mut update = OrderEntity::update_many()
                    .col_expr(
                        order::Column::PaymentStatus,
                        Expr::value(PaymentStatus::Paid),
                    )
                    .col_expr(order::Column::PaidAt, Expr::value(Some(now)))
                    .col_expr(order::Column::UpdatedAt, Expr::value(Some(now)))
                    .col_expr(
                        order::Column::Version,
                        Expr::col(order::Column::Version).add(1),
                    );
                if let Some(payment_id) = &payment_id {
                    update = update.col_expr(
                        order::Column::GatewayPaymentId,
                        Expr::value(Some(payment_id.clone())),
                    );
                }
                if let Some(signature) = &signature {
                    update = update.col_expr(
                        order::Column::GatewaySignature,
                        Expr::value(Some(signature.clone())),
                    );
                }
                let result = update
                    .filter(order::Column::Id.eq(order.id))
                    .filter(order::Column::PaymentStatus.eq(PaymentStatus::Pending))
                    .exec(db)
                    .await?;

                if result.rows_affected == 0 {
                    let current = self.reload(order.id).await?;
                    if current.payment_status == PaymentStatus::Paid {
                        info!(order_id = %order.id, "payment already applied, ignoring");
                        return Ok(order_model_to_response(current));
                    }
                    return Err(ServiceError::Conflict(format!(
                        "Cannot mark order paid from payment status {}",
                        current.payment_status.as_str()
                    )));
                }

                if let Some(payment_id) = &payment_id {
                    self.enrich_payment_details(order.id, payment_id).await;
                    self.event_sender
                        .send(Event::PaymentCaptured {
                            order_id: order.id,
                            gateway_payment_id: payment_id.clone(),
                        })
                        .await;
                }

                Ok(order_model_to_response(self.reload(order.id).await?))
            }
            PaymentOutcome::Failed => {
                let result = OrderEntity::update_many()
                    .col_expr(
                        order::Column::PaymentStatus,
                        Expr::value(PaymentStatus::Failed),
                    )
                    .col_expr(order::Column::UpdatedAt, Expr::value(Some(now)))
                    .col_expr(
                        order::Column::Version,
                        Expr::col(order::Column::Version).add(1),
                    )
                    .filter(order::Column::Id.eq(order.id))
                    .filter(order::Column::PaymentStatus.eq(PaymentStatus::Pending))
                    .exec(db)
                    .await?;

                if result.rows_affected == 0 {
                    // A captured payment wins any race with a stale failure
                    // event.
                    warn!(order_id = %order.id, "failure event ignored: payment no longer pending");
                } else {
                    self.event_sender
                        .send(Event::PaymentFailed { order_id: order.id })
                        .await;
                }

                Ok(order_model_to_response(self.reload(order.id).await?))
            }
        }
    }

    /// Issues a gateway refund and records the reversal. Purely financial:
    /// stock is not restored (that is cancellation's job).
    #[instrument(skip(self, reason), fields(order_id = %order_id, ?amount))]
    pub async fn refund(
        &self,
        order_id: Uuid,
        amount: Option<Decimal>,
        reason: Option<String>,
    ) -> Result<OrderResponse, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

        if order.payment_status != PaymentStatus::Paid {
            return Err(ServiceError::InvalidOperation(format!(
                "Order payment status is {}, only paid orders can be refunded",
                order.payment_status.as_str()
            )));
        }
        let payment_id = order.gateway_payment_id.clone().ok_or_else(|| {
            ServiceError::ValidationError(
                "Order has no gateway payment to refund".to_string(),
            )
        })?;
        if let Some(amount) = amount {
            if amount <= Decimal::ZERO || amount > order.total_amount {
                return Err(ServiceError::ValidationError(format!(
                    "Refund amount {amount} must be positive and at most the order total"
                )));
            }
        }

        let amount_minor = amount.map(to_minor_units).transpose()?;
        let result = self
            .gateway
            .refund(&payment_id, amount_minor, reason.as_deref())
            .await?;

        let now = Utc::now();
        let mut active: OrderActiveModel = order.clone().into();
        active.payment_status = Set(PaymentStatus::Refunded);
        active.refund_id = Set(Some(result.id.clone()));
        active.refund_amount = Set(Some(from_minor_units(result.amount)));
        active.refund_reason = Set(reason);
        active.refunded_at = Set(Some(now));
        active.updated_at = Set(Some(now));
        active.version = Set(order.version + 1);
        let updated = active.update(&*self.db).await?;

        info!(%order_id, refund_id = %result.id, "refund recorded");
        self.event_sender
            .send(Event::RefundIssued {
                order_id,
                refund_id: result.id,
            })
            .await;

        Ok(order_model_to_response(updated))
    }

    async fn reload(&self, order_id: Uuid) -> Result<OrderModel, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))
    }

    /// Best-effort enrichment from the gateway after a capture; failure here
    /// never blocks the order being marked paid.
    async fn enrich_payment_details(&self, order_id: Uuid, payment_id: &str) {
        match self.gateway.fetch_payment(payment_id).await {
            Ok(details) => {
                let payload = serde_json::to_string(&details).unwrap_or_default();
                let result = OrderEntity::update_many()
                    .col_expr(order::Column::PaymentDetails, Expr::value(Some(payload)))
                    .filter(order::Column::Id.eq(order_id))
                    .exec(&*self.db)
                    .await;
                if let Err(e) = result {
                    warn!(error = %e, %order_id, "failed to store payment details");
                }
            }
            Err(e) => {
                warn!(error = %e, %order_id, "payment enrichment failed, continuing");
            }
        }
    }

    /// Appends to the audit trail. Best-effort: failures are logged and
    /// isolated from the caller's result.
    async fn record_history(
        &self,
        order_id: Uuid,
        status: &str,
        comment: Option<String>,
        actor: Option<Uuid>,
    ) {
        let entry = order_status_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            status: Set(status.to_string()),
            comment: Set(comment),
            actor_id: Set(actor),
            created_at: Set(Utc::now()),
        };
        if let Err(e) = entry.insert(&*self.db).await {
            warn!(error = %e, %order_id, "failed to append status history");
        }
    }
}

/// Shipping is a flat rate waived above the free-shipping threshold; tax is
/// a configured percentage of the subtotal. The identity
/// `total = subtotal + shipping + tax - discount` holds by construction.
pub fn compute_totals(
    subtotal: Decimal,
    discount: Decimal,
    pricing: &PricingConfig,
) -> (Decimal, Decimal, Decimal) {
    let shipping = if subtotal >= pricing.free_shipping_threshold {
        Decimal::ZERO
    } else {
        pricing.shipping_flat_rate
    };
    let tax = (subtotal * pricing.tax_rate_percent / Decimal::from(100)).round_dp(2);
    let total = subtotal + shipping + tax - discount;
    (shipping, tax, total)
}

fn random_suffix(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

fn generate_order_number() -> String {
    let timestamp = Utc::now().format("%Y%m%d");
    format!("ORD-{timestamp}-{}", random_suffix(8))
}

fn generate_tracking_number() -> String {
    format!("TRK-{}", random_suffix(12))
}

pub(crate) fn order_model_to_response(model: OrderModel) -> OrderResponse {
    OrderResponse {
        id: model.id,
        order_number: model.order_number,
        customer_id: model.customer_id,
        status: model.status,
        payment_status: model.payment_status,
        payment_method: model.payment_method,
        subtotal: model.subtotal,
        shipping_amount: model.shipping_amount,
        tax_amount: model.tax_amount,
        discount_amount: model.discount_amount,
        total_amount: model.total_amount,
        currency: model.currency,
        coupon_code: model.coupon_code,
        gateway_order_id: model.gateway_order_id,
        gateway_payment_id: model.gateway_payment_id,
        tracking_number: model.tracking_number,
        shipping_address: model.shipping_address,
        refund_id: model.refund_id,
        refund_amount: model.refund_amount,
        created_at: model.created_at,
        updated_at: model.updated_at,
        shipped_at: model.shipped_at,
        delivered_at: model.delivered_at,
        cancelled_at: model.cancelled_at,
        paid_at: model.paid_at,
        refunded_at: model.refunded_at,
        version: model.version,
    }
}
