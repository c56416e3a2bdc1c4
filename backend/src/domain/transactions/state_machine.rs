//! Payment transaction state machine.
//!
//! Owns every status change of a purchase transaction: creation as
//! `pending`, then at most one move to `success` or `failed` driven by
//! signed gateway notifications. Moves are compare-and-set against
//! `pending` at the storage layer, so replayed or concurrent notifications
//! cannot enter `success` twice.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info, warn};

use super::{
    ExternalOrderId, GatewayNotification, PurchaseError, SignatureVerifier, StatusTransition,
    Transaction, TransactionDraft, TransactionId, TransactionStatus, classify,
};
use crate::domain::ports::{
    PaymentGateway, PaymentGatewayError, PaymentItem, PaymentSession, PaymentSessionRequest,
    ProjectRepository, ProjectRepositoryError, TransactionRepository, TransactionRepositoryError,
};
use crate::domain::{BuyerContact, Project, ProjectId, UserId};

/// Longest item name the gateway accepts.
const ITEM_NAME_MAX_CHARS: usize = 50;
const ITEM_NAME_ELLIPSIS: &str = "...";

/// A pending transaction together with the gateway session opened for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseInitiated {
    pub transaction: Transaction,
    pub session: PaymentSession,
}

/// What applying a notification did to the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The transaction moved from `pending` to `success`. Rewards are due.
    EnteredSuccess,
    /// The transaction moved from `pending` to `failed`.
    EnteredFailed,
    /// The gateway still reports the payment as pending.
    StillPending,
    /// Payment succeeded but the buyer already owned the project through
    /// another transaction; this one was recorded as `failed`.
    DuplicateSuccessRejected,
    /// The transaction had already reached a terminal status.
    AlreadySettled,
    /// The gateway status is not one the workflow acts on.
    Unmapped,
}

/// Result of [`PaymentTransactionService::apply_notification`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationApplied {
    /// The transaction as it was before the notification was applied.
    pub transaction: Transaction,
    /// Status after the notification.
    pub status: TransactionStatus,
    pub outcome: NotificationOutcome,
}

impl NotificationApplied {
    /// Whether this notification performed the one transition that earns
    /// rewards.
    pub fn grants_rewards(&self) -> bool {
        self.outcome == NotificationOutcome::EnteredSuccess
    }
}

/// Truncate a project title to the gateway's item name limit.
fn item_name(title: &str) -> String {
    if title.chars().count() <= ITEM_NAME_MAX_CHARS {
        return title.to_owned();
    }
    let keep = ITEM_NAME_MAX_CHARS - ITEM_NAME_ELLIPSIS.len();
    let mut name: String = title.chars().take(keep).collect();
    name.push_str(ITEM_NAME_ELLIPSIS);
    name
}

fn map_project_error(error: ProjectRepositoryError) -> PurchaseError {
    match error {
        ProjectRepositoryError::Connection { message } => {
            PurchaseError::StorageUnavailable { message }
        }
        ProjectRepositoryError::Query { message } => PurchaseError::Storage { message },
    }
}

fn map_transaction_error(error: TransactionRepositoryError) -> PurchaseError {
    match error {
        TransactionRepositoryError::Connection { message } => {
            PurchaseError::StorageUnavailable { message }
        }
        TransactionRepositoryError::Query { message } => PurchaseError::Storage { message },
        TransactionRepositoryError::DuplicatePurchase { project_id, .. } => {
            PurchaseError::AlreadyPurchased { project_id }
        }
        TransactionRepositoryError::DuplicateOrderId { order_id } => {
            PurchaseError::StorageUnavailable {
                message: format!("order id {order_id} collided; retry the purchase"),
            }
        }
    }
}

fn map_gateway_error(error: PaymentGatewayError) -> PurchaseError {
    PurchaseError::TransientGateway {
        message: error.to_string(),
    }
}

/// State machine service over the project, transaction and gateway ports.
#[derive(Clone)]
pub struct PaymentTransactionService<P, T, G> {
    projects: Arc<P>,
    transactions: Arc<T>,
    gateway: Arc<G>,
    verifier: SignatureVerifier,
    clock: Arc<dyn Clock>,
}

impl<P, T, G> PaymentTransactionService<P, T, G> {
    pub fn new(
        projects: Arc<P>,
        transactions: Arc<T>,
        gateway: Arc<G>,
        verifier: SignatureVerifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            transactions,
            gateway,
            verifier,
            clock,
        }
    }
}

impl<P, T, G> PaymentTransactionService<P, T, G>
where
    P: ProjectRepository,
    T: TransactionRepository,
    G: PaymentGateway,
{
    /// Record a `pending` transaction and open a payment session for it.
    ///
    /// If the gateway call fails the pending row is left in place and
    /// [`PurchaseError::TransientGateway`] is returned.
    pub async fn create(
        &self,
        project_id: &ProjectId,
        buyer_id: &UserId,
        buyer: BuyerContact,
    ) -> Result<PurchaseInitiated, PurchaseError> {
        let project = self.purchasable_project(project_id).await?;

        let owned = self
            .transactions
            .find_successful_purchase(project_id, buyer_id)
            .await
            .map_err(map_transaction_error)?;
        if owned.is_some() {
            return Err(PurchaseError::AlreadyPurchased {
                project_id: project_id.to_string(),
            });
        }

        let now = self.clock.utc();
        let transaction = Transaction::pending(TransactionDraft {
            id: TransactionId::random(),
            project_id: project.id,
            buyer_id: *buyer_id,
            seller_id: project.owner_id,
            amount: project.price,
            external_order_id: ExternalOrderId::for_purchase(&project.id, now),
            created_at: now,
        })
        .map_err(|err| PurchaseError::Storage {
            message: format!("invalid transaction draft: {err}"),
        })?;

        self.transactions
            .insert(&transaction)
            .await
            .map_err(map_transaction_error)?;

        let request = PaymentSessionRequest {
            order_id: transaction.external_order_id().clone(),
            gross_amount: transaction.amount(),
            item: PaymentItem {
                id: project.id.to_string(),
                name: item_name(&project.title),
                price: transaction.amount(),
                quantity: 1,
            },
            customer: buyer,
        };

        let session = self
            .gateway
            .create_payment_session(&request)
            .await
            .map_err(|err| {
                warn!(
                    order_id = %transaction.external_order_id(),
                    transaction_id = %transaction.id(),
                    error = %err,
                    "payment session request failed; pending transaction kept"
                );
                map_gateway_error(err)
            })?;

        info!(
            order_id = %transaction.external_order_id(),
            transaction_id = %transaction.id(),
            amount = transaction.amount(),
            "purchase initiated"
        );
        Ok(PurchaseInitiated {
            transaction,
            session,
        })
    }

    async fn purchasable_project(&self, project_id: &ProjectId) -> Result<Project, PurchaseError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| PurchaseError::ProjectNotFound {
                project_id: project_id.to_string(),
            })?;

        if !project.is_purchasable() {
            return Err(PurchaseError::NotPurchasable {
                project_id: project_id.to_string(),
            });
        }
        Ok(project)
    }

    /// Verify and apply one gateway notification.
    ///
    /// Unsigned or mis-signed notifications are rejected before any lookup.
    /// Terminal transactions and unmapped statuses are acknowledged without
    /// change.
    pub async fn apply_notification(
        &self,
        notification: &GatewayNotification,
    ) -> Result<NotificationApplied, PurchaseError> {
        if !self.verifier.verify(notification) {
            warn!(
                security = true,
                order_id = %notification.order_id,
                status_code = %notification.status_code,
                "rejected gateway notification with invalid signature"
            );
            return Err(PurchaseError::InvalidSignature {
                order_id: notification.order_id.clone(),
            });
        }

        let order_id = ExternalOrderId::new(notification.order_id.as_str());
        let transaction = self
            .transactions
            .find_by_order_id(&order_id)
            .await
            .map_err(map_transaction_error)?
            .ok_or_else(|| PurchaseError::TransactionNotFound {
                order_id: order_id.to_string(),
            })?;

        if transaction.status().is_terminal() {
            info!(
                order_id = %order_id,
                status = %transaction.status(),
                gateway_status = %notification.transaction_status,
                "notification for settled transaction ignored"
            );
            return Ok(Self::unchanged(transaction, NotificationOutcome::AlreadySettled));
        }

        let Some(target) = classify(&notification.transaction_status, &notification.fraud_status)
        else {
            warn!(
                order_id = %order_id,
                gateway_status = %notification.transaction_status,
                fraud_status = %notification.fraud_status,
                "unmapped gateway status; transaction left pending"
            );
            return Ok(Self::unchanged(transaction, NotificationOutcome::Unmapped));
        };

        let transition = StatusTransition {
            transaction_id: transaction.id(),
            to: target,
            external_transaction_id: Some(notification.transaction_id.clone())
                .filter(|id| !id.is_empty()),
            at: self.clock.utc(),
        };

        match self.transactions.transition_from_pending(&transition).await {
            Ok(true) => Ok(Self::entered(transaction, target)),
            Ok(false) => self.reload_after_lost_race(transaction).await,
            Err(TransactionRepositoryError::DuplicatePurchase { .. })
                if target == TransactionStatus::Success =>
            {
                self.reject_duplicate_success(transaction, transition).await
            }
            Err(err) => Err(map_transaction_error(err)),
        }
    }

    fn unchanged(transaction: Transaction, outcome: NotificationOutcome) -> NotificationApplied {
        NotificationApplied {
            status: transaction.status(),
            transaction,
            outcome,
        }
    }

    fn entered(transaction: Transaction, target: TransactionStatus) -> NotificationApplied {
        let outcome = match target {
            TransactionStatus::Success => NotificationOutcome::EnteredSuccess,
            TransactionStatus::Failed => NotificationOutcome::EnteredFailed,
            TransactionStatus::Pending => NotificationOutcome::StillPending,
        };
        info!(
            order_id = %transaction.external_order_id(),
            status = %target,
            "transaction status applied"
        );
        NotificationApplied {
            transaction,
            status: target,
            outcome,
        }
    }

    /// Another notification settled the row between our read and our write.
    async fn reload_after_lost_race(
        &self,
        transaction: Transaction,
    ) -> Result<NotificationApplied, PurchaseError> {
        let current = self
            .transactions
            .find_by_order_id(transaction.external_order_id())
            .await
            .map_err(map_transaction_error)?
            .map_or(transaction.status(), |row| row.status());

        info!(
            order_id = %transaction.external_order_id(),
            status = %current,
            "concurrent notification already settled transaction"
        );
        Ok(NotificationApplied {
            transaction,
            status: current,
            outcome: NotificationOutcome::AlreadySettled,
        })
    }

    /// Two pending attempts were both paid. Keep the first owner, record this
    /// one as failed and leave the refund to an operator.
    async fn reject_duplicate_success(
        &self,
        transaction: Transaction,
        transition: StatusTransition,
    ) -> Result<NotificationApplied, PurchaseError> {
        error!(
            order_id = %transaction.external_order_id(),
            transaction_id = %transaction.id(),
            project_id = %transaction.project_id(),
            buyer_id = %transaction.buyer_id(),
            amount = transaction.amount(),
            "payment settled for already purchased project; manual refund required"
        );

        let failed = StatusTransition {
            to: TransactionStatus::Failed,
            ..transition
        };
        let applied = self
            .transactions
            .transition_from_pending(&failed)
            .await
            .map_err(map_transaction_error)?;
        if !applied {
            return self.reload_after_lost_race(transaction).await;
        }

        Ok(NotificationApplied {
            transaction,
            status: TransactionStatus::Failed,
            outcome: NotificationOutcome::DuplicateSuccessRejected,
        })
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
