//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CAMPUS_HUB_*` environment variables and
//! configuration files, in that order of precedence. `main` loads them once
//! and hands typed pieces ([`PaymentSettings`], the bind address, session
//! options) to the components that need them.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::transactions::ServerKey;
use crate::outbound::midtrans::SnapEnvironment;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Problems found while turning raw settings into typed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{name} is required")]
    Missing { name: &'static str },
    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Raw settings as read from the environment.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CAMPUS_HUB")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Midtrans server key used for basic auth and notification signatures.
    pub midtrans_server_key: Option<String>,
    /// Send requests to the production Snap environment.
    pub midtrans_production: Option<bool>,
    /// Upper bound on a single gateway request.
    pub gateway_timeout_secs: Option<u64>,
    /// File holding the session cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// Fall back to a random session key when the key file is missing.
    pub session_allow_ephemeral: Option<bool>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field(
                "midtrans_server_key",
                &self.midtrans_server_key.as_ref().map(|_| "<redacted>"),
            )
            .field("midtrans_production", &self.midtrans_production)
            .field("gateway_timeout_secs", &self.gateway_timeout_secs)
            .field("session_key_file", &self.session_key_file)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("session_allow_ephemeral", &self.session_allow_ephemeral)
            .finish()
    }
}

/// Everything the payment gateway adapter and signature check need.
#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub environment: SnapEnvironment,
    pub server_key: ServerKey,
    pub timeout: Duration,
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing { name })
}

impl AppSettings {
    /// Listen address, defaulting to `0.0.0.0:8000`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            name: "bind_addr",
            message: err.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when no URL was configured.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_deref(), "database_url")
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(
            self.gateway_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
        )
    }

    /// Whether payments go to the production Snap environment. Off unless set.
    pub fn midtrans_production(&self) -> bool {
        self.midtrans_production.unwrap_or(false)
    }

    /// Whether the session cookie carries `Secure`. On unless set.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Gateway environment, server key and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when no server key was configured.
    pub fn payment(&self) -> Result<PaymentSettings, SettingsError> {
        let key = required(self.midtrans_server_key.as_deref(), "midtrans_server_key")?;
        Ok(PaymentSettings {
            environment: SnapEnvironment::from_production_flag(self.midtrans_production()),
            server_key: ServerKey::new(key),
            timeout: self.gateway_timeout(),
        })
    }
}
