//! SMS delivery through an HTTP gateway.
//!
//! The gateway receives a JSON `POST` of `{ "to", "from", "message" }`,
//! authenticated with a bearer key when `SMS_API_KEY` is set.

use std::time::Duration;

use super::{DeliveryError, Transport};

/// HTTP request timeout for a single send.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sender id used when `SMS_SENDER_ID` is not set.
const DEFAULT_SENDER_ID: &str = "JobPortal";

/// Error type for SMS delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("SMS gateway returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Empty recipient phone number")]
    EmptyRecipient,
}

/// Configuration for the SMS gateway.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub gateway_url: String,
    pub api_key: Option<String>,
    pub sender_id: String,
}

impl SmsConfig {
    /// Returns `None` if `SMS_GATEWAY_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let gateway_url = std::env::var("SMS_GATEWAY_URL").ok()?;
        Some(Self {
            gateway_url,
            api_key: std::env::var("SMS_API_KEY").ok(),
            sender_id: std::env::var("SMS_SENDER_ID")
                .unwrap_or_else(|_| DEFAULT_SENDER_ID.to_string()),
        })
    }
}

/// Sends text messages through the configured gateway.
pub struct SmsDelivery {
    config: SmsConfig,
    client: reqwest::Client,
}

impl SmsDelivery {
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    /// SMS has no subject line; only the body is sent.
    pub async fn deliver(&self, phone: &str, body: &str) -> Result<(), SmsError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(SmsError::EmptyRecipient);
        }

        let payload = serde_json::json!({
            "to": phone,
            "from": self.config.sender_id,
            "message": body,
        });

        let mut request = self.client.post(&self.config.gateway_url).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SmsError::HttpStatus(response.status().as_u16()));
        }

        tracing::info!(to = phone, "Notification SMS sent");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Transport for SmsDelivery {
    async fn send(&self, address: &str, _subject: &str, body: &str) -> Result<(), DeliveryError> {
        Ok(self.deliver(address, body).await?)
    }
}
