//! Purchase read service implementing the [`PurchaseQuery`] driving port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{PurchaseQuery, TransactionRepository, TransactionRepositoryError};
use crate::domain::transactions::{PageRequest, TransactionFilter, TransactionPage};
use crate::domain::{Error, ProjectId, UserId};

fn map_repository_error(error: TransactionRepositoryError) -> Error {
    match error {
        TransactionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("transaction repository unavailable: {message}"))
        }
        other => Error::internal(format!("transaction repository error: {other}")),
    }
}

/// Reads purchase ownership and history from the transaction repository.
#[derive(Clone)]
pub struct PurchaseQueryService<T> {
    transactions: Arc<T>,
}

impl<T> PurchaseQueryService<T> {
    pub fn new(transactions: Arc<T>) -> Self {
        Self { transactions }
    }
}

#[async_trait]
impl<T> PurchaseQuery for PurchaseQueryService<T>
where
    T: TransactionRepository,
{
    async fn has_purchased(
        &self,
        buyer_id: &UserId,
        project_id: &ProjectId,
    ) -> Result<bool, Error> {
        let owned = self
            .transactions
            .find_successful_purchase(project_id, buyer_id)
            .await
            .map_err(map_repository_error)?;
        Ok(owned.is_some())
    }

    async fn list_transactions(
        &self,
        user_id: &UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, Error> {
        let listing = self
            .transactions
            .list_for_user(user_id, filter, page)
            .await
            .map_err(map_repository_error)?;
        Ok(TransactionPage::new(listing.items, listing.total, page))
    }
}
