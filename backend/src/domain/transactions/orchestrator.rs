//! Transaction orchestrator: the purchase driving port.
//!
//! Composes the payment state machine with experience accrual. Rewards are
//! granted only when a notification performs the `pending -> success` move,
//! which the state machine reports at most once per transaction. Accrual
//! failures are logged and dropped; they never undo a successful payment.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{GatewayNotification, PaymentTransactionService, PurchaseError, Transaction};
use crate::domain::experience::ExperienceEvent;
use crate::domain::ports::{
    CreatePurchaseRequest, CreatePurchaseResponse, ExperienceAccrual, NotificationReceipt,
    PaymentGateway, ProjectRepository, PurchaseCommand, TransactionRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{BuyerContact, Error, UserId};

fn map_user_error(error: UserPersistenceError) -> PurchaseError {
    match error {
        UserPersistenceError::Connection { message } => {
            PurchaseError::StorageUnavailable { message }
        }
        UserPersistenceError::Query { message } => PurchaseError::Storage { message },
        UserPersistenceError::NotFound { user_id } => PurchaseError::BuyerNotFound { user_id },
    }
}

/// Purchase workflow entry point used by inbound adapters.
#[derive(Clone)]
pub struct TransactionOrchestrator<U, P, T, G> {
    users: Arc<U>,
    payments: PaymentTransactionService<P, T, G>,
    accrual: Arc<dyn ExperienceAccrual>,
}

impl<U, P, T, G> TransactionOrchestrator<U, P, T, G> {
    pub fn new(
        users: Arc<U>,
        payments: PaymentTransactionService<P, T, G>,
        accrual: Arc<dyn ExperienceAccrual>,
    ) -> Self {
        Self {
            users,
            payments,
            accrual,
        }
    }
}

impl<U, P, T, G> TransactionOrchestrator<U, P, T, G>
where
    U: UserRepository,
{
    async fn buyer_contact(&self, buyer_id: &UserId) -> Result<BuyerContact, PurchaseError> {
        self.users
            .find_by_id(buyer_id)
            .await
            .map_err(map_user_error)?
            .map(|user| user.contact())
            .ok_or_else(|| PurchaseError::BuyerNotFound {
                user_id: buyer_id.to_string(),
            })
    }

    /// Award buyer and seller for a transaction that just entered `success`.
    async fn grant_rewards(&self, transaction: &Transaction) {
        let awards = [
            (transaction.buyer_id(), ExperienceEvent::BuyProject),
            (transaction.seller_id(), ExperienceEvent::SellProject),
        ];
        for (user_id, event) in awards {
            match self.accrual.award(&user_id, event).await {
                Ok(credit) => info!(
                    order_id = %transaction.external_order_id(),
                    user_id = %credit.user_id,
                    event = %credit.event,
                    points = credit.points,
                    "purchase reward granted"
                ),
                Err(failure) => warn!(
                    order_id = %transaction.external_order_id(),
                    user_id = %user_id,
                    event = %event,
                    error = %failure,
                    "purchase reward not granted"
                ),
            }
        }
    }
}

#[async_trait]
impl<U, P, T, G> PurchaseCommand for TransactionOrchestrator<U, P, T, G>
where
    U: UserRepository,
    P: ProjectRepository,
    T: TransactionRepository,
    G: PaymentGateway,
{
    async fn create_purchase(
        &self,
        request: CreatePurchaseRequest,
    ) -> Result<CreatePurchaseResponse, Error> {
        let contact = self.buyer_contact(&request.buyer_id).await?;
        let initiated = self
            .payments
            .create(&request.project_id, &request.buyer_id, contact)
            .await?;

        Ok(CreatePurchaseResponse {
            token: initiated.session.token,
            redirect_url: initiated.session.redirect_url,
            transaction_id: initiated.transaction.id(),
        })
    }

    async fn handle_notification(
        &self,
        notification: GatewayNotification,
    ) -> Result<NotificationReceipt, Error> {
        let applied = self.payments.apply_notification(&notification).await?;
        if applied.grants_rewards() {
            self.grant_rewards(&applied.transaction).await;
        }

        Ok(NotificationReceipt {
            transaction_id: applied.transaction.id(),
            status: applied.status,
            outcome: applied.outcome,
        })
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
