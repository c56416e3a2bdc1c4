//! Driving port for purchase reads.

use async_trait::async_trait;

use crate::domain::transactions::{PageRequest, TransactionFilter, TransactionPage};
use crate::domain::{Error, ProjectId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseQuery: Send + Sync {
    /// Whether the buyer holds a successful transaction for the project.
    async fn has_purchased(&self, buyer_id: &UserId, project_id: &ProjectId)
    -> Result<bool, Error>;

    /// Transaction history for the user.
    async fn list_transactions(
        &self,
        user_id: &UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error>;
}

/// Fixture query with no purchases.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePurchaseQuery;

#[async_trait]
impl PurchaseQuery for FixturePurchaseQuery {
    async fn has_purchased(
        &self,
        _buyer_id: &UserId,
        _project_id: &ProjectId,
    ) -> Result<bool, Error> {
        Ok(false)
    }

    async fn list_transactions(
        &self,
        _user_id: &UserId,
        _filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error> {
        Ok(TransactionPage::new(Vec::new(), 0, page))
    }
}
