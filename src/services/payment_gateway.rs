use hmac::{Hmac, Mac};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;
use tracing::{instrument, warn};

use crate::{config::GatewayConfig, errors::ServiceError};

type HmacSha256 = Hmac<Sha256>;

/// Payment intent created on the gateway; referenced by both the checkout
/// client and the webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// Best-effort payment enrichment (method, masked account info).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub id: String,
    pub method: Option<String>,
    pub bank: Option<String>,
    pub wallet: Option<String>,
    pub vpa: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResult {
    pub id: String,
    pub amount: i64,
    pub status: String,
}

/// Adapter over the remote payment gateway: intent creation, signature
/// verification for both the client and webhook paths, payment enrichment
/// and refunds. Mutating calls are never retried here.
#[derive(Clone)]
pub struct PaymentGatewayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    webhook_secret: String,
}

impl PaymentGatewayClient {
    pub fn new(cfg: &GatewayConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ServiceError::InternalError(format!("http client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            key_id: cfg.key_id.clone(),
            key_secret: cfg.key_secret.clone(),
            webhook_secret: cfg.webhook_secret.clone(),
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Creates a payment intent for `amount` in the gateway's minor units.
    #[instrument(skip(self), fields(%amount, %currency, %receipt))]
    pub async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayIntent, ServiceError> {
        let minor = to_minor_units(amount)?;
        let response = self
            .http
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": minor,
                "currency": currency,
                "receipt": receipt,
            }))
            .send()
            .await
            .map_err(|e| ServiceError::ExternalApiError(format!("gateway order create: {e}")))?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalApiError(format!(
                "gateway order create returned {}",
                response.status()
            )));
        }

        response
            .json::<GatewayIntent>()
            .await
            .map_err(|e| ServiceError::ExternalApiError(format!("gateway order decode: {e}")))
    }

    /// Verifies the signature the checkout client hands back after paying:
    /// HMAC-SHA256 over `"{gateway_order_id}|{payment_id}"` keyed by the API
    /// secret, compared in constant time.
    pub fn verify_payment_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        let payload = format!("{gateway_order_id}|{payment_id}");
        verify_hmac(self.key_secret.as_bytes(), payload.as_bytes(), signature)
    }

    /// Verifies a server-pushed webhook signature against the exact raw body
    /// bytes. Must run before any JSON parsing: re-serialization can change
    /// byte layout and invalidate the signature.
    pub fn verify_webhook_signature(&self, raw_body: &[u8], signature: &str) -> bool {
        verify_hmac(self.webhook_secret.as_bytes(), raw_body, signature)
    }

    /// Fetches payment details for enrichment. Callers treat failure as
    /// non-fatal.
    #[instrument(skip(self), fields(%payment_id))]
    pub async fn fetch_payment(&self, payment_id: &str) -> Result<PaymentDetails, ServiceError> {
        let response = self
            .http
            .get(format!("{}/payments/{payment_id}", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| ServiceError::ExternalApiError(format!("gateway payment fetch: {e}")))?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalApiError(format!(
                "gateway payment fetch returned {}",
                response.status()
            )));
        }

        response
            .json::<PaymentDetails>()
            .await
            .map_err(|e| ServiceError::ExternalApiError(format!("gateway payment decode: {e}")))
    }

    /// Issues a refund; `None` amount means a full refund. Not retried on
    /// failure, the caller surfaces the error.
    #[instrument(skip(self), fields(%payment_id, ?amount_minor))]
    pub async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
        notes: Option<&str>,
    ) -> Result<RefundResult, ServiceError> {
        let mut body = serde_json::Map::new();
        if let Some(amount) = amount_minor {
            body.insert("amount".to_string(), json!(amount));
        }
        if let Some(notes) = notes {
            body.insert("notes".to_string(), json!({ "reason": notes }));
        }

        let response = self
            .http
            .post(format!("{}/payments/{payment_id}/refund", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalApiError(format!("gateway refund: {e}")))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "gateway refund rejected");
            return Err(ServiceError::ExternalApiError(format!(
                "gateway refund returned {}",
                response.status()
            )));
        }

        response
            .json::<RefundResult>()
            .await
            .map_err(|e| ServiceError::ExternalApiError(format!("gateway refund decode: {e}")))
    }
}

/// Converts a decimal amount to the gateway's minor units (e.g. paise),
/// rounding to the nearest unit. The same conversion backs intent creation,
/// refunds and reconciliation so amounts always line up.
pub fn to_minor_units(amount: Decimal) -> Result<i64, ServiceError> {
    (amount * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ServiceError::ValidationError(format!("amount {amount} out of range")))
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

fn verify_hmac(key: &[u8], payload: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());
    constant_time_eq(&expected, signature)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut res = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        res |= x ^ y;
    }
    res == 0
}
