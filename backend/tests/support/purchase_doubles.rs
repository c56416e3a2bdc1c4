//! In-memory port implementations for purchase behaviour tests.
//!
//! The transaction store enforces the same invariants as the database:
//! transitions only apply to `pending` rows and a buyer holds at most one
//! `success` row per project.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use campus_hub::domain::ports::{
    PaymentGateway, PaymentGatewayError, PaymentSession, PaymentSessionRequest, ProjectRepository,
    ProjectRepositoryError, TransactionListing, TransactionRepository, TransactionRepositoryError,
    UserPersistenceError, UserRepository,
};
use campus_hub::domain::transactions::{
    ExternalOrderId, PageRequest, StatusTransition, Transaction, TransactionFilter,
    TransactionRecord, TransactionStatus,
};
use campus_hub::domain::{Project, ProjectId, User, UserId};

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUsers {
    pub fn insert(&self, user: User) {
        self.users
            .lock()
            .expect("users mutex")
            .insert(user.id(), user);
    }

    pub fn total_exp(&self, id: &UserId) -> u64 {
        self.users
            .lock()
            .expect("users mutex")
            .get(id)
            .map_or(0, User::total_exp)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.lock().expect("users mutex").get(id).cloned())
    }

    async fn increment_total_exp(
        &self,
        id: &UserId,
        delta: u64,
    ) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("users mutex");
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserPersistenceError::not_found(id.to_string()))?;
        *user = User::new(
            user.id(),
            user.name(),
            user.email(),
            user.total_exp() + delta,
        );
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProjects {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjects {
    pub fn insert(&self, project: Project) {
        self.projects
            .lock()
            .expect("projects mutex")
            .insert(project.id, project);
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjects {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(self.projects.lock().expect("projects mutex").get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTransactions {
    rows: Mutex<Vec<Transaction>>,
}

fn with_status(transaction: &Transaction, transition: &StatusTransition) -> Transaction {
    Transaction::restore(TransactionRecord {
        id: transaction.id(),
        project_id: transaction.project_id(),
        buyer_id: transaction.buyer_id(),
        seller_id: transaction.seller_id(),
        amount: transaction.amount(),
        status: transition.to,
        external_order_id: transaction.external_order_id().clone(),
        external_transaction_id: transition
            .external_transaction_id
            .clone()
            .or_else(|| transaction.external_transaction_id().map(str::to_owned)),
        created_at: transaction.created_at(),
        updated_at: transition.at,
    })
    .expect("stored transaction stays valid")
}

impl InMemoryTransactions {
    pub fn all(&self) -> Vec<Transaction> {
        self.rows.lock().expect("transactions mutex").clone()
    }

    pub fn by_order_id(&self, order_id: &str) -> Option<Transaction> {
        self.all()
            .into_iter()
            .find(|row| row.external_order_id().as_str() == order_id)
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactions {
    async fn insert(&self, transaction: &Transaction) -> Result<(), TransactionRepositoryError> {
        let mut rows = self.rows.lock().expect("transactions mutex");
        if rows
            .iter()
            .any(|row| row.external_order_id() == transaction.external_order_id())
        {
            return Err(TransactionRepositoryError::duplicate_order_id(
                transaction.external_order_id().to_string(),
            ));
        }
        rows.push(transaction.clone());
        Ok(())
    }

    async fn find_by_order_id(
        &self,
        order_id: &ExternalOrderId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(self.by_order_id(order_id.as_str()))
    }

    async fn find_successful_purchase(
        &self,
        project_id: &ProjectId,
        buyer_id: &UserId,
    ) -> Result<Option<Transaction>, TransactionRepositoryError> {
        Ok(self.all().into_iter().find(|row| {
            row.project_id() == *project_id
                && row.buyer_id() == *buyer_id
                && row.status() == TransactionStatus::Success
        }))
    }

    async fn transition_from_pending(
        &self,
        transition: &StatusTransition,
    ) -> Result<bool, TransactionRepositoryError> {
        let mut rows = self.rows.lock().expect("transactions mutex");
        let Some(index) = rows.iter().position(|row| {
            row.id() == transition.transaction_id && row.status() == TransactionStatus::Pending
        }) else {
            return Ok(false);
        };

        let target = &rows[index];
        if transition.to == TransactionStatus::Success
            && rows.iter().any(|row| {
                row.project_id() == target.project_id()
                    && row.buyer_id() == target.buyer_id()
                    && row.status() == TransactionStatus::Success
            })
        {
            return Err(TransactionRepositoryError::duplicate_purchase(
                target.project_id().to_string(),
                target.buyer_id().to_string(),
            ));
        }

        rows[index] = with_status(&rows[index], transition);
        Ok(true)
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

/// Gateway that opens sessions until told to fail.
#[derive(Default)]
pub struct ScriptedGateway {
    failure: Mutex<Option<PaymentGatewayError>>,
    requests: Mutex<Vec<PaymentSessionRequest>>,
}

impl ScriptedGateway {
    pub fn fail_with(&self, error: PaymentGatewayError) {
        *self.failure.lock().expect("gateway mutex") = Some(error);
    }

    pub fn requests(&self) -> Vec<PaymentSessionRequest> {
        self.requests.lock().expect("gateway mutex").clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        self.requests
            .lock()
            .expect("gateway mutex")
            .push(request.clone());
        if let Some(error) = self.failure.lock().expect("gateway mutex").clone() {
            return Err(error);
        }
        let token = format!("token-{}", request.order_id);
        Ok(PaymentSession {
            redirect_url: format!("https://app.sandbox.midtrans.com/snap/v4/redirection/{token}"),
            token,
        })
    }
}
