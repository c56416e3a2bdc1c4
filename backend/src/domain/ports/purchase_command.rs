//! Driving port for purchase mutations: starting a purchase and applying
//! gateway notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::transactions::{
    GatewayNotification, NotificationOutcome, TransactionId, TransactionStatus,
};
use crate::domain::{Error, ProjectId, UserId};

/// Request to buy a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePurchaseRequest {
    pub project_id: ProjectId,
    pub buyer_id: UserId,
}

/// Payment session opened for a new purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseResponse {
    pub token: String,
    pub redirect_url: String,
    pub transaction_id: TransactionId,
}

/// Result of applying one gateway notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReceipt {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    pub outcome: NotificationOutcome,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseCommand: Send + Sync {
    /// Open a payment session for `request`, recording a pending transaction.
    async fn create_purchase(
        &self,
        request: CreatePurchaseRequest,
    ) -> Result<CreatePurchaseResponse, Error>;

    /// Verify and apply a gateway notification, granting rewards on success.
    async fn handle_notification(
        &self,
        notification: GatewayNotification,
    ) -> Result<NotificationReceipt, Error>;
}

/// Fixture command that refuses every purchase as unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePurchaseCommand;

#[async_trait]
impl PurchaseCommand for FixturePurchaseCommand {
    async fn create_purchase(
        &self,
        request: CreatePurchaseRequest,
    ) -> Result<CreatePurchaseResponse, Error> {
        Err(Error::not_found(format!("project {} not found", request.project_id)))
    }

    async fn handle_notification(
        &self,
        notification: GatewayNotification,
    ) -> Result<NotificationReceipt, Error> {
        Err(Error::not_found(format!(
            "transaction for order {} not found",
            notification.order_id
        )))
    }
}
