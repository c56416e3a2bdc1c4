//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers:
//!
//! - **Paths**: purchase, gamification and health endpoints
//! - **Schemas**: request and response bodies, plus the [`ErrorSchema`] and
//!   [`ErrorCodeSchema`] wrappers that describe domain errors without
//!   coupling them to utoipa
//! - **Security**: session cookie authentication scheme
//!
//! Swagger UI serves the generated document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::leveling::{GamificationConfig, LevelCurve, LevelStats};
use crate::domain::ports::CreatePurchaseResponse;
use crate::domain::transactions::{
    GatewayNotification, TransactionPage, TransactionStatus, TransactionSummary,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::transactions::{CallbackAck, CreateTransactionBody, PurchaseCheck};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie carrying the signed-in user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus Hub API",
        description = "Paid project purchases, payment notifications and experience levels."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::transactions::create_transaction,
        crate::inbound::http::transactions::transaction_callback,
        crate::inbound::http::transactions::check_purchase,
        crate::inbound::http::transactions::list_transactions,
        crate::inbound::http::gamification::get_config,
        crate::inbound::http::gamification::get_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateTransactionBody,
        CreatePurchaseResponse,
        CallbackAck,
        PurchaseCheck,
        GatewayNotification,
        TransactionStatus,
        TransactionSummary,
        TransactionPage,
        LevelStats,
        LevelCurve,
        GamificationConfig,
    )),
    tags(
        (name = "transactions", description = "Buying projects and payment notifications"),
        (name = "gamification", description = "Experience levels and titles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
