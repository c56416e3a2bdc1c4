//! Reqwest-backed Midtrans Snap adapter.
//!
//! Owns transport details only: request serialisation, HTTP basic auth with
//! the server key, timeout and status mapping, and response decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{SnapErrorDto, SnapRequestDto, SnapResponseDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError, PaymentSession, PaymentSessionRequest};
use crate::domain::transactions::ServerKey;

const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";
const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";
const SNAP_TRANSACTIONS_PATH: &str = "/snap/v1/transactions";

/// Which Midtrans environment requests go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl SnapEnvironment {
    /// Choose the environment from the `is_production` flag.
    pub fn from_production_flag(is_production: bool) -> Self {
        if is_production {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Payment gateway adapter posting to the Snap transactions endpoint.
pub struct SnapHttpGateway {
    client: Client,
    endpoint: Url,
    server_key: ServerKey,
}

impl SnapHttpGateway {
    /// Build an adapter for `environment` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::Transport`] when the reqwest client
    /// cannot be constructed.
    pub fn new(
        environment: SnapEnvironment,
        server_key: ServerKey,
        timeout: Duration,
    ) -> Result<Self, PaymentGatewayError> {
        Self::with_base_url(environment.base_url(), server_key, timeout)
    }

    /// Build an adapter against an arbitrary base URL, e.g. a local stub.
    ///
    /// # Errors
    ///
    /// Fails when the URL does not parse or the client cannot be built.
    pub fn with_base_url(
        base_url: &str,
        server_key: ServerKey,
        timeout: Duration,
    ) -> Result<Self, PaymentGatewayError> {
        let endpoint = snap_endpoint(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PaymentGatewayError::transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            server_key,
        })
    }
}

fn snap_endpoint(base_url: &str) -> Result<Url, PaymentGatewayError> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(&format!("{trimmed}{SNAP_TRANSACTIONS_PATH}"))
        .map_err(|err| PaymentGatewayError::transport(format!("invalid Snap base URL: {err}")))
}

#[async_trait]
impl PaymentGateway for SnapHttpGateway {
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        let payload = SnapRequestDto::from(request);
        debug!(order_id = %request.order_id, "requesting Snap payment session");

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(self.server_key.expose(), Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        parse_session(body.as_ref())
    }
}

fn parse_session(body: &[u8]) -> Result<PaymentSession, PaymentGatewayError> {
    let decoded: SnapResponseDto = serde_json::from_slice(body).map_err(|err| {
        PaymentGatewayError::decode(format!("invalid Snap JSON payload: {err}"))
    })?;
    if decoded.token.is_empty() {
        let reason = error_summary(body);
        return Err(PaymentGatewayError::rejected(if reason.is_empty() {
            "Snap returned no token".to_owned()
        } else {
            reason
        }));
    }
    Ok(PaymentSession {
        token: decoded.token,
        redirect_url: decoded.redirect_url,
    })
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let summary = error_summary(body);
    let message = if summary.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {summary}", status.as_u16())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        _ if status.is_server_error() => PaymentGatewayError::transport(message),
        _ => PaymentGatewayError::rejected(message),
    }
}

fn error_summary(body: &[u8]) -> String {
    serde_json::from_slice::<SnapErrorDto>(body)
        .unwrap_or_default()
        .error_messages
        .join("; ")
}
