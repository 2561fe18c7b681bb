use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Payment gateway credentials and endpoint.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct GatewayConfig {
    /// Base URL of the gateway REST API
    pub base_url: String,

    /// Public key id, shared with the checkout client
    #[validate(length(min = 1))]
    pub key_id: String,

    /// Secret used for client payment-signature verification
    #[validate(length(min = 1))]
    pub key_secret: String,

    /// Separate secret for server-pushed webhook signatures
    #[validate(length(min = 1))]
    pub webhook_secret: String,

    /// ISO currency code the gateway settles in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

/// Flat-rate shipping and tax knobs used when pricing an order.
#[derive(Clone, Debug, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_shipping_flat_rate")]
    pub shipping_flat_rate: Decimal,
    /// Orders at or above this subtotal ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Decimal,
    #[serde(default = "default_tax_rate_percent")]
    pub tax_rate_percent: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_flat_rate: default_shipping_flat_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            tax_rate_percent: default_tax_rate_percent(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment (development, test, production)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to bootstrap the schema on startup (SQLite only)
    #[serde(default)]
    pub auto_migrate: bool,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    #[validate]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Minimal constructor used by tests; mirrors the loaded shape.
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            gateway: GatewayConfig {
                base_url: "http://localhost:9090".to_string(),
                key_id: "test_key".to_string(),
                key_secret: "test_key_secret".to_string(),
                webhook_secret: "test_webhook_secret".to_string(),
                currency: default_currency(),
                timeout_secs: default_gateway_timeout(),
            },
            pricing: PricingConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_currency() -> String {
    "INR".to_string()
}
fn default_gateway_timeout() -> u64 {
    10
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_shipping_flat_rate() -> Decimal {
    Decimal::new(5000, 2) // 50.00
}
fn default_free_shipping_threshold() -> Decimal {
    Decimal::new(50000, 2) // 500.00
}
fn default_tax_rate_percent() -> Decimal {
    Decimal::new(500, 2) // 5.00%
}

/// Loads configuration from `config/default.toml`, an optional
/// per-environment overlay, and `APP__*` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = env::var("APP_ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .add_source(File::from(Path::new(CONFIG_DIR).join("default")).required(false));

    let overlay = Path::new(CONFIG_DIR).join(&environment);
    builder = builder.add_source(File::from(overlay).required(false));

    let settings = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let cfg: AppConfig = settings.try_deserialize()?;
    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;

    info!(environment = %cfg.environment, "configuration loaded");
    Ok(cfg)
}

/// Initializes the global tracing subscriber. Safe to call once at startup.
pub fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},sqlx=warn,hyper=warn")));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
