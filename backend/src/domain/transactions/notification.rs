//! Payment gateway notifications: wire shape, signature check and status
//! classification.

use std::fmt;

use serde::Deserialize;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::TransactionStatus;

/// Asynchronous status notification posted by the payment gateway.
///
/// Field names match the gateway's JSON exactly. Informational fields the
/// workflow does not act on are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct GatewayNotification {
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: String,
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub transaction_time: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub merchant_id: Option<String>,
}

/// Gateway server key, wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct ServerKey(Zeroizing<String>);

impl ServerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    /// Raw key for request signing and basic auth.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerKey(<redacted>)")
    }
}

/// Verifies `signature_key` on incoming notifications.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: ServerKey,
}

impl SignatureVerifier {
    pub fn new(key: ServerKey) -> Self {
        Self { key }
    }

    /// Hex-encoded SHA-512 of `order_id + status_code + gross_amount + key`.
    pub fn expected_signature(&self, order_id: &str, status_code: &str, gross_amount: &str) -> String {
        let mut hasher = Sha512::new();
        hasher.update(order_id.as_bytes());
        hasher.update(status_code.as_bytes());
        hasher.update(gross_amount.as_bytes());
        hasher.update(self.key.expose().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether the notification was signed with our server key.
    pub fn verify(&self, notification: &GatewayNotification) -> bool {
        let expected = self.expected_signature(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
        );
        // Length mismatches short-circuit inside `ct_eq`; content never does.
        expected
            .as_bytes()
            .ct_eq(notification.signature_key.as_bytes())
            .into()
    }
}

/// Map a gateway status and fraud verdict onto a transaction status.
///
/// Returns `None` for combinations the workflow does not act on, such as a
/// capture held for fraud review.
///
/// # Examples
/// ```
/// use campus_hub::domain::transactions::{TransactionStatus, classify};
///
/// assert_eq!(classify("settlement", ""), Some(TransactionStatus::Success));
/// assert_eq!(classify("capture", "challenge"), None);
/// assert_eq!(classify("expire", ""), Some(TransactionStatus::Failed));
/// ```
pub fn classify(transaction_status: &str, fraud_status: &str) -> Option<TransactionStatus> {
    match transaction_status {
        "capture" | "settlement" if matches!(fraud_status, "accept" | "") => {
            Some(TransactionStatus::Success)
        }
        "pending" => Some(TransactionStatus::Pending),
        "deny" | "cancel" | "expire" => Some(TransactionStatus::Failed),
        _ => None,
    }
}
