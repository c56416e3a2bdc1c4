//! Backend entry-point: loads settings, migrates the database and serves the
//! purchase and gamification API.

mod server;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use campus_hub::inbound::http::health::HealthState;
use campus_hub::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use campus_hub::settings::AppSettings;

use server::{ServerConfig, create_server};

fn load_session_key(settings: &AppSettings) -> std::io::Result<Key> {
    let key_path = settings.session_key_file();
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            if cfg!(debug_assertions) || settings.session_allow_ephemeral() {
                warn!(path = %key_path.display(), error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    key_path.display()
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let database_url = settings.database_url().map_err(std::io::Error::other)?;
    let payment = settings.payment().map_err(std::io::Error::other)?;
    let key = load_session_key(&settings)?;

    run_pending_migrations(database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;

    info!(
        %bind_addr,
        environment = ?payment.environment,
        gateway_timeout_secs = payment.timeout.as_secs(),
        "starting campus hub"
    );

    let config = ServerConfig::new(
        key,
        settings.session_cookie_secure(),
        SameSite::Lax,
        bind_addr,
    )
    .with_db_pool(pool)
    .with_payment(payment);
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
