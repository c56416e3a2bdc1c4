//! Purchase HTTP handlers.
//!
//! ```text
//! POST /api/v1/transactions
//! POST /api/v1/transactions/callback
//! GET  /api/v1/transactions/check/{projectId}
//! GET  /api/v1/transactions?page=&perPage=&type=
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ProjectId;
use crate::domain::ports::{CreatePurchaseRequest, CreatePurchaseResponse};
use crate::domain::transactions::{GatewayNotification, PageRequest, TransactionPage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, lenient_filter, lenient_number, missing_field_error, parse_uuid,
};

const PROJECT_ID_FIELD: FieldName = FieldName::new("projectId");

/// Request body for starting a purchase.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionBody {
    pub project_id: Option<String>,
}

/// Acknowledgement returned to the payment gateway.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CallbackAck {
    #[schema(example = "ok")]
    pub status: String,
}

/// Whether the signed-in user owns a project.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseCheck {
    pub purchased: bool,
}

/// History query parameters. Out-of-range or unparsable values fall back to
/// the defaults instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// 1-based page number; values below 1 become 1.
    pub page: Option<String>,
    /// Page size in 1..=100; anything else becomes 10.
    pub per_page: Option<String>,
    /// `all`, `purchases` or `sales`; unknown values mean `all`.
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub kind: Option<String>,
}

fn parse_project_id(raw: &str) -> ApiResult<ProjectId> {
    parse_uuid(raw, PROJECT_ID_FIELD).map(ProjectId::from_uuid)
}

/// Start a purchase of a paid project.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    request_body = CreateTransactionBody,
    responses(
        (status = 201, description = "Payment session opened", body = CreatePurchaseResponse),
        (status = 400, description = "Invalid, free or already purchased project", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema),
        (status = 503, description = "Payment gateway unavailable; safe to retry", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "createTransaction"
)]
#[post("/transactions")]
pub async fn create_transaction(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTransactionBody>,
) -> ApiResult<HttpResponse> {
    let buyer_id = session.require_user_id()?;
    let raw = payload
        .into_inner()
        .project_id
        .ok_or_else(|| missing_field_error(PROJECT_ID_FIELD))?;
    let project_id = parse_project_id(&raw)?;

    let response = state
        .purchases
        .create_purchase(CreatePurchaseRequest {
            project_id,
            buyer_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Payment gateway notification endpoint.
///
/// Public: authenticity comes from the notification signature, not the
/// session.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/callback",
    request_body = GatewayNotification,
    responses(
        (status = 200, description = "Notification applied or already settled", body = CallbackAck),
        (status = 400, description = "Invalid signature", body = ErrorSchema),
        (status = 404, description = "Unknown order", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["transactions"],
    security([]),
    operation_id = "transactionCallback"
)]
#[post("/transactions/callback")]
pub async fn transaction_callback(
    state: web::Data<HttpState>,
    payload: web::Json<GatewayNotification>,
) -> ApiResult<web::Json<CallbackAck>> {
    let receipt = state
        .purchases
        .handle_notification(payload.into_inner())
        .await?;
    info!(
        transaction_id = %receipt.transaction_id,
        status = %receipt.status,
        outcome = ?receipt.outcome,
        "payment notification processed"
    );
    Ok(web::Json(CallbackAck {
        status: "ok".to_owned(),
    }))
}

/// Whether the signed-in user has bought the project.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/check/{projectId}",
    params(("projectId" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Purchase status", body = PurchaseCheck),
        (status = 400, description = "Invalid project id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "checkPurchase"
)]
#[get("/transactions/check/{project_id}")]
pub async fn check_purchase(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PurchaseCheck>> {
    let buyer_id = session.require_user_id()?;
    let project_id = parse_project_id(&path.into_inner())?;
    let purchased = state
        .purchases_query
        .has_purchased(&buyer_id, &project_id)
        .await?;
    Ok(web::Json(PurchaseCheck { purchased }))
}

/// The signed-in user's transaction history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(HistoryQuery),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionPage),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["transactions"],
    operation_id = "listTransactions"
)]
#[get("/transactions")]
pub async fn list_transactions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<TransactionPage>> {
    let user_id = session.require_user_id()?;
    let query = query.into_inner();
    let page = PageRequest::normalised(
        lenient_number(query.page.as_deref()),
        lenient_number(query.per_page.as_deref()),
    );
    let filter = lenient_filter(query.kind.as_deref());

    let listing = state
        .purchases_query
        .list_transactions(&user_id, filter, page)
        .await?;
    Ok(web::Json(listing))
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;
