//! PostgreSQL-backed `TransactionRepository` implementation using Diesel ORM.
//!
//! Two storage rules back the payment state machine:
//!
//! - status updates filter on `status = 'pending'`, so a settled row is never
//!   rewritten and the affected-row count tells the caller who won a race;
//! - the partial unique index `transactions_one_success_per_buyer` rejects a
//!   second `success` row for the same project and buyer, surfaced as
//!   [`TransactionRepositoryError::DuplicatePurchase`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{TransactionListing, TransactionRepository, TransactionRepositoryError};
use crate::domain::transactions::{
    ExternalOrderId, PageRequest, StatusTransition, Transaction, TransactionFilter, TransactionId,
    TransactionRecord, TransactionStatus, TransactionSummary,
};
use crate::domain::{ProjectId, UserId};

use super::diesel_basic_error_mapping::{
    EXTERNAL_ORDER_ID_KEY, ONE_SUCCESS_PER_BUYER, map_basic_diesel_error, map_basic_pool_error,
    unique_violation_constraint,
};
use super::models::{
    NewTransactionRow, TransactionRow, TransactionStatusUpdate, TransactionSummaryRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{projects, transactions, users};

/// Diesel-backed implementation of the `TransactionRepository` port.
#[derive(Clone)]
pub struct DieselTransactionRepository {
    pool: DbPool,
}

impl DieselTransactionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TransactionRepositoryError {
    map_basic_pool_error(error, TransactionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TransactionRepositoryError {
    map_basic_diesel_error(
        error,
        TransactionRepositoryError::query,
        TransactionRepositoryError::connection,
    )
}

/// Map write failures, translating the two named unique indexes.
fn map_write_error(
    error: diesel::result::Error,
    project_id: Uuid,
    buyer_id: Uuid,
    order_id: &str,
) -> TransactionRepositoryError {
    match unique_violation_constraint(&error) {
        Some(ONE_SUCCESS_PER_BUYER) => TransactionRepositoryError::duplicate_purchase(
            project_id.to_string(),
            buyer_id.to_string(),
        ),
        Some(EXTERNAL_ORDER_ID_KEY) => TransactionRepositoryError::duplicate_order_id(order_id),
        _ => map_diesel_error(error),
    }
}

fn to_db_amount(amount: u64) -> Result<i64, TransactionRepositoryError> {
    i64::try_from(amount).map_err(|_| TransactionRepositoryError::query("amount out of range"))
}

fn from_db_amount(amount: i64) -> Result<u64, TransactionRepositoryError> {
    u64::try_from(amount)
        .map_err(|_| TransactionRepositoryError::query("negative amount in transactions row"))
}

fn parse_status(raw: &str) -> Result<TransactionStatus, TransactionRepositoryError> {
    raw.parse()
        .map_err(|_| TransactionRepositoryError::query(format!("unrecognised status {raw}")))
}

fn row_to_transaction(row: TransactionRow) -> Result<Transaction, TransactionRepositoryError> {
    let record = TransactionRecord {
        id: TransactionId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        buyer_id: UserId::from_uuid(row.buyer_id),
        seller_id: UserId::from_uuid(row.seller_id),
        amount: from_db_amount(row.amount)?,
        status: parse_status(&row.status)?,
        external_order_id: ExternalOrderId::new(row.external_order_id),
        external_transaction_id: row.external_transaction_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Transaction::restore(record).map_err(|err| TransactionRepositoryError::query(err.to_string()))
}

fn row_to_summary(row: TransactionSummaryRow) -> Result<TransactionSummary, TransactionRepositoryError> {
    Ok(TransactionSummary {
        id: TransactionId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        project_title: row.project_title,
        buyer_name: row.buyer_name,
        amount: from_db_amount(row.amount)?,
        status: parse_status(&row.status)?,
        created_at: row.created_at,
    })
}

fn to_db_window(page: PageRequest) -> Result<(i64, i64), TransactionRepositoryError> {
    let offset = i64::try_from(page.offset())
        .map_err(|_| TransactionRepositoryError::query("page offset out of range"))?;
    Ok((offset, i64::from(page.per_page())))
}

#[async_trait]
impl TransactionRepository for DieselTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let project_id = *transaction.project_id().as_uuid();
        let buyer_id = *transaction.buyer_id().as_uuid();
        let order_id = transaction.external_order_id().as_str();
        let row = NewTransactionRow {
            id: *transaction.id().as_uuid(),
            project_id,
            buyer_id,
            seller_id: *transaction.seller_id().as_uuid(),
            amount: to_db_amount(transaction.amount())?,
            status: transaction.status().as_str(),
            external_order_id: order_id,
            created_at: transaction.created_at(),
            updated_at: transaction.updated_at(),
        };

        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, project_id, buyer_id, order_id))
    }

    async fn find_by_order_id(
        &self,
        order_id: &ExternalOrderId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TransactionRow> = transactions::table
            .filter(transactions::external_order_id.eq(order_id.as_str()))
            .select(TransactionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_transaction).transpose()
    }

    async fn find_successful_purchase(
        &self,
        project_id: &ProjectId,
        buyer_id: &UserId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TransactionRow> = transactions::table
            .filter(transactions::project_id.eq(project_id.as_uuid()))
            .filter(transactions::buyer_id.eq(buyer_id.as_uuid()))
            .filter(transactions::status.eq(TransactionStatus::Success.as_str()))
            .select(TransactionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_transaction).transpose()
    }

    async fn transition_from_pending(
        &self,
        transition: &StatusTransition,
    ) -> Result<bool, TransactionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = *transition.transaction_id.as_uuid();
        let update = TransactionStatusUpdate {
            status: transition.to.as_str(),
            external_transaction_id: transition.external_transaction_id.as_deref(),
            updated_at: transition.at,
        };

        let result = diesel::update(transactions::table)
            .filter(transactions::id.eq(id))
            .filter(transactions::status.eq(TransactionStatus::Pending.as_str()))
            .set(&update)
            .execute(&mut conn)
            .await;

        match result {
            Ok(updated) => Ok(updated == 1),
            Err(err) if unique_violation_constraint(&err) == Some(ONE_SUCCESS_PER_BUYER) => {
                let (project_id, buyer_id) = transactions::table
                    .filter(transactions::id.eq(id))
                    .select((transactions::project_id, transactions::buyer_id))
                    .first::<(Uuid, Uuid)>(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Err(TransactionRepositoryError::duplicate_purchase(
                    project_id.to_string(),
                    buyer_id.to_string(),
                ))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionListing, TransactionRepositoryError> {
        let (offset, limit) = to_db_window(page)?;
        let user = *user_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = transactions::table.into_boxed();
        count_query = match filter {
            TransactionFilter::All => count_query.filter(
                transactions::buyer_id
                    .eq(user)
                    .or(transactions::seller_id.eq(user)),
            ),
            TransactionFilter::Purchases => count_query.filter(transactions::buyer_id.eq(user)),
            TransactionFilter::Sales => count_query.filter(transactions::seller_id.eq(user)),
        };
        let total: i64 = count_query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut rows_query = transactions::table
            .inner_join(projects::table)
            .inner_join(users::table.on(users::id.eq(transactions::buyer_id)))
            .select((
                transactions::id,
                transactions::project_id,
                transactions::amount,
                transactions::status,
                transactions::created_at,
                projects::title,
                users::name,
            ))
            .into_boxed();
        rows_query = match filter {
            TransactionFilter::All => rows_query.filter(
                transactions::buyer_id
                    .eq(user)
                    .or(transactions::seller_id.eq(user)),
            ),
            TransactionFilter::Purchases => rows_query.filter(transactions::buyer_id.eq(user)),
            TransactionFilter::Sales => rows_query.filter(transactions::seller_id.eq(user)),
        };
        let rows: Vec<TransactionSummaryRow> = rows_query
            .order((transactions::created_at.desc(), transactions::id.desc()))
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total)
            .map_err(|_| TransactionRepositoryError::query("negative row count"))?;

        Ok(TransactionListing { items, total })
    }
}
