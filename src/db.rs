use crate::config::AppConfig;
use crate::errors::ServiceError;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use std::time::Duration;
use tracing::{info, warn};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Establishes the connection pool from application configuration.
pub async fn establish_connection(cfg: &AppConfig) -> Result<DbPool, ServiceError> {
    let mut options = ConnectOptions::new(cfg.database_url.clone());
    options
        .max_connections(cfg.db_max_connections)
        .min_connections(cfg.db_min_connections)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;
    info!("database connection established");
    Ok(pool)
}

/// Bootstraps the schema with idempotent DDL. Only applied to the SQLite
/// backend (development and tests); the Postgres schema is managed by the
/// deployment's migration tooling.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), ServiceError> {
    if db.get_database_backend() != DbBackend::Sqlite {
        warn!("schema bootstrap skipped: non-SQLite backend");
        return Ok(());
    }

    let statements = [
        r#"CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            sku TEXT NOT NULL UNIQUE,
            price REAL NOT NULL,
            stock_quantity INTEGER NOT NULL DEFAULT 0,
            manage_stock INTEGER NOT NULL DEFAULT 1,
            stock_status TEXT NOT NULL DEFAULT 'in_stock',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );"#,
        r#"CREATE TABLE IF NOT EXISTS coupons (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL UNIQUE,
            discount_type TEXT NOT NULL,
            discount_value REAL NOT NULL,
            min_purchase_amount REAL,
            max_discount_amount REAL,
            usage_limit INTEGER,
            used_count INTEGER NOT NULL DEFAULT 0,
            valid_from TEXT NOT NULL,
            valid_until TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );"#,
        r#"CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY NOT NULL,
            order_number TEXT NOT NULL UNIQUE,
            customer_id TEXT NOT NULL,
            status TEXT NOT NULL,
            payment_status TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            subtotal REAL NOT NULL,
            shipping_amount REAL NOT NULL,
            tax_amount REAL NOT NULL,
            discount_amount REAL NOT NULL,
            total_amount REAL NOT NULL,
            currency TEXT NOT NULL,
            coupon_code TEXT,
            gateway_order_id TEXT,
            gateway_payment_id TEXT,
            gateway_signature TEXT,
            payment_details TEXT,
            refund_id TEXT,
            refund_amount REAL,
            refund_reason TEXT,
            tracking_number TEXT,
            shipping_address TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT,
            shipped_at TEXT,
            delivered_at TEXT,
            cancelled_at TEXT,
            paid_at TEXT,
            refunded_at TEXT,
            version INTEGER NOT NULL DEFAULT 1
        );"#,
        r#"CREATE INDEX IF NOT EXISTS idx_orders_gateway_order_id
            ON orders (gateway_order_id);"#,
        r#"CREATE INDEX IF NOT EXISTS idx_orders_customer_id
            ON orders (customer_id);"#,
        r#"CREATE TABLE IF NOT EXISTS order_items (
            id TEXT PRIMARY KEY NOT NULL,
            order_id TEXT NOT NULL,
            product_id TEXT,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            quantity INTEGER NOT NULL,
            line_total REAL NOT NULL,
            created_at TEXT NOT NULL
        );"#,
        r#"CREATE INDEX IF NOT EXISTS idx_order_items_order_id
            ON order_items (order_id);"#,
        r#"CREATE TABLE IF NOT EXISTS order_status_history (
            id TEXT PRIMARY KEY NOT NULL,
            order_id TEXT NOT NULL,
            status TEXT NOT NULL,
            comment TEXT,
            actor_id TEXT,
            created_at TEXT NOT NULL
        );"#,
    ];

    for sql in statements {
        db.execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await?;
    }

    info!("schema bootstrap complete");
    Ok(())
}
