//! Port for best-effort experience awards.
//!
//! Failures come back as [`AccrualFailure`] values. Callers on the reward
//! path log and drop them; an award failure never undoes the action that
//! earned it.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::experience::ExperienceEvent;

use super::define_port_error;

define_port_error! {
    /// Why an award was not applied.
    pub enum AccrualFailure {
        UserNotFound { user_id: String } => "user {user_id} not found",
        Storage { message: String } => "experience storage failed: {message}",
    }
}

/// Receipt for an applied award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpCredit {
    pub user_id: UserId,
    pub event: ExperienceEvent,
    pub points: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceAccrual: Send + Sync {
    /// Add the points for `event` to the user's total.
    async fn award(
        &self,
        user_id: &UserId,
        event: ExperienceEvent,
    ) -> Result<ExpCredit, AccrualFailure>;
}
