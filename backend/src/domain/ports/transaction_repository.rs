//! Port for transaction persistence.
//!
//! Adapters carry two storage guarantees the state machine relies on:
//! at most one `success` row per (project, buyer), and status changes applied
//! as a compare-and-set against `pending`.

use async_trait::async_trait;

use crate::domain::transactions::{
    ExternalOrderId, PageRequest, StatusTransition, Transaction, TransactionFilter,
    TransactionSummary,
};
use crate::domain::{ProjectId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by transaction repository adapters.
    pub enum TransactionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "transaction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "transaction repository query failed: {message}",
        /// The buyer already holds a successful transaction for the project.
        DuplicatePurchase { project_id: String, buyer_id: String } =>
            "buyer {buyer_id} already purchased project {project_id}",
        /// Another transaction already uses the external order id.
        DuplicateOrderId { order_id: String } => "order id {order_id} already in use",
    }
}

/// One page of history rows plus the unpaginated row count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionListing {
    pub items: Vec<TransactionSummary>,
    pub total: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persist a new transaction.
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError>;

    /// Resolve a transaction by the order id shared with the gateway.
    async fn find_by_order_id(
        &self,
        order_id: &ExternalOrderId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError>;

    /// The buyer's successful transaction for the project, if any.
    async fn find_successful_purchase(
        &self,
        project_id: &ProjectId,
        buyer_id: &UserId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError>;

    /// Apply `transition` only if the row is still `pending`.
    ///
    /// Returns `true` when this call changed the row and `false` when the
    /// row had already left `pending`. Promoting to `success` fails with
    /// [`TransactionRepositoryError::DuplicatePurchase`] if the buyer already
    /// owns the project through another transaction.
    async fn transition_from_pending(
        &self,
        transition: &StatusTransition,
    ) -> Result<bool, TransactionRepositoryError>;

    /// History rows where the user matches `filter`, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionListing, TransactionRepositoryError>;
}

/// Fixture repository that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTransactionRepository;

#[async_trait]
impl TransactionRepository for FixtureTransactionRepository {
    async fn insert(&self, _transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        Ok(())
    }

    async fn find_by_order_id(
        &self,
        _order_id: &ExternalOrderId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(None)
    }

    async fn find_successful_purchase(
        &self,
        _project_id: &ProjectId,
        _buyer_id: &UserId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(None)
    }

    async fn transition_from_pending(
        &self,
        _transition: &StatusTransition,
    ) -> Result<bool, TransactionRepositoryError> {
        Ok(false)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
        _filter: TransactionFilter,
        _page: PageRequest,
    ) -> Result<TransactionListing, TransactionRepositoryError> {
        Ok(TransactionListing::default())
    }
}
