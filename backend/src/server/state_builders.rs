//! Builds the HTTP state from repositories, the gateway adapter and the
//! domain services.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use campus_hub::domain::ports::{
    ExperienceAccrual, FixtureGamificationQuery, FixturePurchaseCommand, FixturePurchaseQuery,
};
use campus_hub::domain::transactions::{
    PaymentTransactionService, SignatureVerifier, TransactionOrchestrator,
};
use campus_hub::domain::{ExperienceAccrualService, GamificationService, PurchaseQueryService};
use campus_hub::inbound::http::state::HttpState;
use campus_hub::outbound::midtrans::SnapHttpGateway;
use campus_hub::outbound::persistence::{
    DbPool, DieselProjectRepository, DieselTransactionRepository, DieselUserRepository,
};
use campus_hub::settings::PaymentSettings;

use super::ServerConfig;

fn fixture_http_state() -> HttpState {
    HttpState::new(
        Arc::new(FixturePurchaseCommand),
        Arc::new(FixturePurchaseQuery),
        Arc::new(FixtureGamificationQuery),
    )
}

fn wired_http_state(pool: &DbPool, payment: &PaymentSettings) -> std::io::Result<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let projects = Arc::new(DieselProjectRepository::new(pool.clone()));
    let transactions = Arc::new(DieselTransactionRepository::new(pool.clone()));
    let gateway = SnapHttpGateway::new(
        payment.environment,
        payment.server_key.clone(),
        payment.timeout,
    )
    .map_err(|err| std::io::Error::other(format!("payment gateway setup failed: {err}")))?;

    let payments = PaymentTransactionService::new(
        projects,
        transactions.clone(),
        Arc::new(gateway),
        SignatureVerifier::new(payment.server_key.clone()),
        Arc::new(DefaultClock),
    );
    let accrual: Arc<dyn ExperienceAccrual> =
        Arc::new(ExperienceAccrualService::new(users.clone()));
    let orchestrator = TransactionOrchestrator::new(users.clone(), payments, accrual);

    Ok(HttpState::new(
        Arc::new(orchestrator),
        Arc::new(PurchaseQueryService::new(transactions)),
        Arc::new(GamificationService::new(users)),
    ))
}

/// Use database-backed services when both a pool and payment settings are
/// configured, otherwise fixtures.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match (&config.db_pool, &config.payment) {
        (Some(pool), Some(payment)) => wired_http_state(pool, payment)?,
        _ => fixture_http_state(),
    };
    Ok(web::Data::new(state))
}
