//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use campus_hub::settings::PaymentSettings;

use campus_hub::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs to wire the application.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) payment: Option<PaymentSettings>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            payment: None,
        }
    }

    /// Attach the database pool backing the repositories.
    ///
    /// Without a pool the server runs on fixture ports.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the payment gateway settings.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentSettings) -> Self {
        self.payment = Some(payment);
        self
    }
}
