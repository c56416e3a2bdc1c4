//! Gamification read service implementing the [`GamificationQuery`] port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::leveling::{GamificationConfig, LevelStats};
use crate::domain::ports::{GamificationQuery, UserPersistenceError, UserRepository};
use crate::domain::{Error, UserId};

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::NotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

/// Derives level stats from the stored experience total.
#[derive(Clone)]
pub struct GamificationService<U> {
    users: Arc<U>,
}

impl<U> GamificationService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> GamificationQuery for GamificationService<U>
where
    U: UserRepository,
{
    fn config(&self) -> GamificationConfig {
        GamificationConfig::current()
    }

    async fn stats_for(&self, user_id: &UserId) -> Result<LevelStats, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        Ok(LevelStats::from_total_exp(user.total_exp()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, User};

    #[rstest]
    #[tokio::test]
    async fn stats_derive_from_stored_total() {
        let user_id = UserId::random();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(User::new(user_id, "Sari", "sari@kampus.ac.id", 50))));

        let stats = GamificationService::new(Arc::new(repo))
            .stats_for(&user_id)
            .await
            .expect("stats");

        assert_eq!(stats, LevelStats::from_total_exp(50));
        assert_eq!(stats.level, 1);
        assert_eq!(stats.exp_to_next_level, 350);
    }

    #[rstest]
    #[tokio::test]
    async fn stats_for_unknown_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = GamificationService::new(Arc::new(repo))
            .stats_for(&UserId::random())
            .await
            .expect_err("unknown user");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn config_is_the_compiled_table() {
        let service = GamificationService::new(Arc::new(MockUserRepository::new()));
        assert_eq!(service.config(), GamificationConfig::current());
    }
}
