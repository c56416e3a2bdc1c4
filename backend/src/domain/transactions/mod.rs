//! Purchase transactions and their payment lifecycle.
//!
//! A transaction is created `pending` and may move once, to either `success`
//! or `failed`; both are terminal. The state machine in [`state_machine`]
//! owns every transition, and the [`orchestrator`] layers rewards on top.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ProjectId, UserId};

mod error;
mod history;
mod notification;
pub mod orchestrator;
pub mod state_machine;

pub use error::PurchaseError;
pub use history::{
    DEFAULT_PER_PAGE, MAX_PER_PAGE, PageRequest, TransactionFilter, TransactionPage,
    TransactionSummary, UnknownTransactionFilter,
};
pub use notification::{GatewayNotification, ServerKey, SignatureVerifier, classify};
pub use orchestrator::TransactionOrchestrator;
pub use state_machine::{
    NotificationApplied, NotificationOutcome, PaymentTransactionService, PurchaseInitiated,
};

/// Stable transaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = "uuid")]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// `success` and `failed` never change again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction status: {0}")]
pub struct UnknownTransactionStatus(pub String);

impl std::str::FromStr for TransactionStatus {
    type Err = UnknownTransactionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownTransactionStatus(other.to_owned())),
        }
    }
}

/// Order identifier shared with the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalOrderId(String);

impl ExternalOrderId {
    /// Build `PURCHASE-<first 8 chars of project id>-<unix seconds>`.
    ///
    /// # Examples
    /// ```
    /// use campus_hub::domain::ProjectId;
    /// use campus_hub::domain::transactions::ExternalOrderId;
    /// use chrono::DateTime;
    ///
    /// let project = ProjectId::from_uuid("3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap());
    /// let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    /// let id = ExternalOrderId::for_purchase(&project, at);
    /// assert_eq!(id.as_str(), "PURCHASE-3fa85f64-1700000000");
    /// ```
    pub fn for_purchase(project_id: &ProjectId, at: DateTime<Utc>) -> Self {
        let project = project_id.to_string();
        let prefix: String = project.chars().take(8).collect();
        Self(format!("PURCHASE-{prefix}-{}", at.timestamp()))
    }

    /// Wrap an identifier received from storage or the gateway.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExternalOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors raised when building a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionValidationError {
    #[error("transaction amount must be positive")]
    NonPositiveAmount,
    #[error("external order id must not be empty")]
    EmptyOrderId,
}

/// Input for a freshly initiated purchase.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub id: TransactionId,
    pub project_id: ProjectId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub amount: u64,
    pub external_order_id: ExternalOrderId,
    pub created_at: DateTime<Utc>,
}

/// Every stored column of a transaction, as read back from storage.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub project_id: ProjectId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub amount: u64,
    pub status: TransactionStatus,
    pub external_order_id: ExternalOrderId,
    pub external_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchase of one project by one buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    project_id: ProjectId,
    buyer_id: UserId,
    seller_id: UserId,
    amount: u64,
    status: TransactionStatus,
    external_order_id: ExternalOrderId,
    external_transaction_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new `pending` transaction.
    pub fn pending(draft: TransactionDraft) -> Result<Self, TransactionValidationError> {
        Self::restore(TransactionRecord {
            id: draft.id,
            project_id: draft.project_id,
            buyer_id: draft.buyer_id,
            seller_id: draft.seller_id,
            amount: draft.amount,
            status: TransactionStatus::Pending,
            external_order_id: draft.external_order_id,
            external_transaction_id: None,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        })
    }

    /// Rebuild a transaction from stored columns.
    pub fn restore(record: TransactionRecord) -> Result<Self, TransactionValidationError> {
        if record.amount == 0 {
            return Err(TransactionValidationError::NonPositiveAmount);
        }
        if record.external_order_id.as_str().is_empty() {
            return Err(TransactionValidationError::EmptyOrderId);
        }

        Ok(Self {
            id: record.id,
            project_id: record.project_id,
            buyer_id: record.buyer_id,
            seller_id: record.seller_id,
            amount: record.amount,
            status: record.status,
            external_order_id: record.external_order_id,
            external_transaction_id: record.external_transaction_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn buyer_id(&self) -> UserId {
        self.buyer_id
    }

    pub fn seller_id(&self) -> UserId {
        self.seller_id
    }

    /// Amount in minor currency units.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn external_order_id(&self) -> &ExternalOrderId {
        &self.external_order_id
    }

    /// Gateway-side transaction id, known once a notification arrives.
    pub fn external_transaction_id(&self) -> Option<&str> {
        self.external_transaction_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Compare-and-set request moving a `pending` transaction to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub transaction_id: TransactionId,
    pub to: TransactionStatus,
    pub external_transaction_id: Option<String>,
    pub at: DateTime<Utc>,
}
