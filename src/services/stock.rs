use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    entities::product::{self, Entity as ProductEntity, StockStatus},
    errors::ServiceError,
};

/// Atomic stock ledger. Every counter move is a single conditional UPDATE so
/// two concurrent orders can never both take the last unit; there is no
/// read-then-write window. Methods are generic over the connection so they
/// compose into the order-creation transaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct StockLedgerService;

impl StockLedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Reserves `quantity` units of a product. No-op for rows with
    /// `manage_stock = false`. Fails with `InsufficientStock` when the
    /// conditional decrement matches no row.
    #[instrument(skip(self, conn), fields(product_id = %product_id, quantity))]
    pub async fn reserve<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        let product = ProductEntity::find_by_id(product_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {product_id} not found")))?;

        if !product.manage_stock {
            debug!(product_id = %product_id, "stock unmanaged, reservation skipped");
            return Ok(());
        }

        let result = ProductEntity::update_many()
            .col_expr(
                product::Column::StockQuantity,
                Expr::col(product::Column::StockQuantity).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(product::Column::Id.eq(product_id))
            .filter(product::Column::StockQuantity.gte(quantity))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::InsufficientStock(format!(
                "Insufficient stock for product {}",
                product.name
            )));
        }

        self.refresh_stock_status(conn, product_id).await
    }

    /// Returns `quantity` units to a product's counter. Used on cancellation;
    /// the caller guarantees this runs at most once per cancellation.
    #[instrument(skip(self, conn), fields(product_id = %product_id, quantity))]
    pub async fn release<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), ServiceError> {
        let Some(product) = ProductEntity::find_by_id(product_id).one(conn).await? else {
            // The product may have been deleted since the order was placed;
            // the snapshot on the order item is all that remains.
            debug!(product_id = %product_id, "release skipped: product no longer exists");
            return Ok(());
        };

        if !product.manage_stock {
            return Ok(());
        }

        ProductEntity::update_many()
            .col_expr(
                product::Column::StockQuantity,
                Expr::col(product::Column::StockQuantity).add(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(product::Column::Id.eq(product_id))
            .exec(conn)
            .await?;

        self.refresh_stock_status(conn, product_id).await
    }

    /// Recomputes the derived `stock_status` flag after a counter move.
    async fn refresh_stock_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: Uuid,
    ) -> Result<(), ServiceError> {
        let Some(product) = ProductEntity::find_by_id(product_id).one(conn).await? else {
            return Ok(());
        };

        let status = StockStatus::derive(product.stock_quantity, product.manage_stock);
        if product.stock_status != status {
            ProductEntity::update_many()
                .col_expr(product::Column::StockStatus, Expr::value(status))
                .filter(product::Column::Id.eq(product_id))
                .exec(conn)
                .await?;
        }
        Ok(())
    }
}
