//! Port for reading users and applying experience increments.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The targeted user row does not exist.
        NotFound { user_id: String } => "user {user_id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Add `delta` to the stored experience total in one atomic statement.
    ///
    /// Implementations must not read the current value and write it back.
    /// Returns [`UserPersistenceError::NotFound`] when no row matched.
    async fn increment_total_exp(&self, id: &UserId, delta: u64)
    -> Result<(), UserPersistenceError>;
}

/// Fixture repository with no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn increment_total_exp(
        &self,
        id: &UserId,
        _delta: u64,
    ) -> Result<(), UserPersistenceError> {
        Err(UserPersistenceError::not_found(id.to_string()))
    }
}
