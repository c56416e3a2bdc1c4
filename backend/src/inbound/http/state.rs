//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureGamificationQuery, FixturePurchaseCommand, FixturePurchaseQuery, GamificationQuery,
    PurchaseCommand, PurchaseQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub purchases: Arc<dyn PurchaseCommand>,
    pub purchases_query: Arc<dyn PurchaseQuery>,
    pub gamification: Arc<dyn GamificationQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use campus_hub::domain::ports::{
    ///     FixtureGamificationQuery, FixturePurchaseCommand, FixturePurchaseQuery,
    /// };
    /// use campus_hub::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixturePurchaseCommand),
    ///     Arc::new(FixturePurchaseQuery),
    ///     Arc::new(FixtureGamificationQuery),
    /// );
    /// let _config = state.gamification.config();
    /// ```
    pub fn new(
        purchases: Arc<dyn PurchaseCommand>,
        purchases_query: Arc<dyn PurchaseQuery>,
        gamification: Arc<dyn GamificationQuery>,
    ) -> Self {
        Self {
            purchases,
            purchases_query,
            gamification,
        }
    }
}

impl Default for HttpState {
    /// Fixture-backed state used when no database is configured.
    fn default() -> Self {
        Self::new(
            Arc::new(FixturePurchaseCommand),
            Arc::new(FixturePurchaseQuery),
            Arc::new(FixtureGamificationQuery),
        )
    }
}
