//! Experience accrual: applies fixed point deltas to a user's stored total.
//!
//! Increments are delegated to [`UserRepository::increment_total_exp`], which
//! adapters must implement as a single atomic update so concurrent awards
//! never lose points.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::UserId;
use super::ports::{
    AccrualFailure, ExpCredit, ExperienceAccrual, UserPersistenceError, UserRepository,
};

/// Actions that earn experience points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceEvent {
    CreateProject,
    SellProject,
    BuyProject,
    ReceiveLike,
    ReceiveComment,
    ProjectViewed,
    CreateArticle,
    ArticleViewed,
}

impl ExperienceEvent {
    /// Every event, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::CreateProject,
        Self::SellProject,
        Self::BuyProject,
        Self::ReceiveLike,
        Self::ReceiveComment,
        Self::ProjectViewed,
        Self::CreateArticle,
        Self::ArticleViewed,
    ];

    /// Points granted for one occurrence of the event.
    pub const fn points(self) -> u64 {
        match self {
            Self::CreateProject => 100,
            Self::SellProject => 150,
            Self::BuyProject => 50,
            Self::ReceiveLike => 10,
            Self::ReceiveComment => 5,
            Self::ProjectViewed => 1,
            Self::CreateArticle => 75,
            Self::ArticleViewed => 1,
        }
    }

    /// Published event key, e.g. `BUY_PROJECT`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateProject => "CREATE_PROJECT",
            Self::SellProject => "SELL_PROJECT",
            Self::BuyProject => "BUY_PROJECT",
            Self::ReceiveLike => "RECEIVE_LIKE",
            Self::ReceiveComment => "RECEIVE_COMMENT",
            Self::ProjectViewed => "PROJECT_VIEWED",
            Self::CreateArticle => "CREATE_ARTICLE",
            Self::ArticleViewed => "ARTICLE_VIEWED",
        }
    }
}

impl std::fmt::Display for ExperienceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accrual backed by the user repository's atomic increment.
#[derive(Clone)]
pub struct ExperienceAccrualService<R> {
    users: Arc<R>,
}

impl<R> ExperienceAccrualService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(user_id: &UserId, error: UserPersistenceError) -> AccrualFailure {
    match error {
        UserPersistenceError::NotFound { .. } => AccrualFailure::user_not_found(user_id.to_string()),
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            AccrualFailure::storage(message)
        }
    }
}

#[async_trait]
impl<R> ExperienceAccrual for ExperienceAccrualService<R>
where
    R: UserRepository,
{
    async fn award(
        &self,
        user_id: &UserId,
        event: ExperienceEvent,
    ) -> Result<ExpCredit, AccrualFailure> {
        let points = event.points();
        self.users
            .increment_total_exp(user_id, points)
            .await
            .map_err(|err| map_persistence_error(user_id, err))?;

        debug!(user_id = %user_id, event = %event, points, "experience awarded");
        Ok(ExpCredit {
            user_id: *user_id,
            event,
            points,
        })
    }
}
