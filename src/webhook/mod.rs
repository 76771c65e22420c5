//! Webhook delivery for anime list subscribers
//!
//! Payloads are serialized once per event and POSTed to every registered
//! callback URL, each request signed with the subscriber's own secret.
//! Delivery is fire-and-forget: every POST runs in its own task and
//! failures are only logged.

use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use sha2::Sha256;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{WebhookPayload, WebhookRecord};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Prefix of the signature header value
const SIGNATURE_PREFIX: &str = "sha256=";

/// Errors that can occur while delivering a webhook
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),

    #[error("Invalid signing key: {0}")]
    SigningError(String),

    #[error("Failed to serialize payload: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Delivery failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Subscriber returned status {0}")]
    HttpError(u16),
}

/// Compute the `sha256=<hex>` signature of `body` keyed by `secret`
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::SigningError(e.to_string()))?;
    mac.update(body);
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Check a `sha256=<hex>` signature in constant time
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Some(digest) = signature
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&digest).is_ok()
}

/// Sends signed notifications to webhook subscribers
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Create a notifier whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| WebhookError::ClientError(e.to_string()))?;

        Ok(Self { client })
    }

    /// Send one signed POST and return the subscriber's status
    pub async fn deliver(
        &self,
        webhook: &WebhookRecord,
        body: Vec<u8>,
    ) -> Result<StatusCode, WebhookError> {
        let signature = sign_payload(&webhook.secret, &body)?;

        let response = self
            .client
            .post(&webhook.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::HttpError(status.as_u16()));
        }

        Ok(status)
    }

    /// Fan a payload out to every webhook without waiting for the results
    ///
    /// Returns the number of deliveries spawned.
    pub fn notify(&self, webhooks: Vec<WebhookRecord>, payload: &WebhookPayload) -> usize {
        if webhooks.is_empty() {
            return 0;
        }

        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize webhook payload: {}", e);
                return 0;
            }
        };

        let count = webhooks.len();
        for webhook in webhooks {
            let notifier = self.clone();
            let body = body.clone();
            let event = payload.event;

            tokio::spawn(async move {
                match notifier.deliver(&webhook, body).await {
                    Ok(status) => debug!(
                        "Delivered {:?} to webhook {} ({})",
                        event, webhook.id, status
                    ),
                    Err(e) => warn!(
                        "Webhook {} delivery to {} failed: {}",
                        webhook.id, webhook.url, e
                    ),
                }
            });
        }

        count
    }
}
