//! OpenAPI schema definitions for domain error types.
//!
//! The domain error stays framework-agnostic by not deriving `ToSchema`; these
//! wrappers mirror its wire shape for utoipa.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema, Serialize)]
#[schema(as = crate::domain::ErrorCode)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The project is free and cannot be bought.
    NotPurchasable,
    /// The buyer already owns the project.
    AlreadyPurchased,
    /// A payment notification failed signature verification.
    InvalidSignature,
    /// A dependency is temporarily unavailable; retry later.
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema, Serialize)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "already_purchased")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "project 3fa85f64-5717-4562-b3fc-2c963f66afa6 already purchased")]
    message: String,
    /// Correlation identifier for this request.
    #[schema(example = "2f7c3b5e-7d2a-4d8e-9c1f-0a5b6c7d8e9f")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}
