//! Driving port for gamification reads.

use async_trait::async_trait;

use crate::domain::leveling::{GamificationConfig, LevelStats};
use crate::domain::{Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GamificationQuery: Send + Sync {
    /// Point table, level curve and titles.
    fn config(&self) -> GamificationConfig;

    /// Derived level stats for the user.
    async fn stats_for(&self, user_id: &UserId) -> Result<LevelStats, Error>;
}

/// Fixture query reporting every user at zero experience.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGamificationQuery;

#[async_trait]
impl GamificationQuery for FixtureGamificationQuery {
    fn config(&self) -> GamificationConfig {
        GamificationConfig::current()
    }

    async fn stats_for(&self, _user_id: &UserId) -> Result<LevelStats, Error> {
        Ok(LevelStats::from_total_exp(0))
    }
}
