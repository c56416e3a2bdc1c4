//! Tests for purchase HTTP handlers.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::DateTime;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    FixtureGamificationQuery, MockPurchaseCommand, MockPurchaseQuery, NotificationReceipt,
};
use crate::domain::transactions::{
    NotificationOutcome, PurchaseError, TransactionFilter, TransactionId, TransactionStatus,
    TransactionSummary,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::test_utils::{session_app, session_cookie};

const BUYER: &str = "11111111-1111-4111-8111-111111111111";
const PROJECT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const TRANSACTION: &str = "9b2f6f1e-0c1d-4f37-8a52-0d5c4f1e2a3b";

fn buyer() -> UserId {
    UserId::new(BUYER).expect("valid buyer id")
}

fn project() -> ProjectId {
    ProjectId::from_uuid(Uuid::parse_str(PROJECT).expect("valid project id"))
}

fn transaction_id() -> TransactionId {
    TransactionId::from_uuid(Uuid::parse_str(TRANSACTION).expect("valid transaction id"))
}

fn test_app(
    purchases: MockPurchaseCommand,
    purchases_query: MockPurchaseQuery,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(purchases),
        Arc::new(purchases_query),
        Arc::new(FixtureGamificationQuery),
    );
    session_app().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(create_transaction)
            .service(transaction_callback)
            .service(check_purchase)
            .service(list_transactions),
    )
}

fn notification_body() -> Value {
    json!({
        "transaction_time": "2024-05-01 10:00:00",
        "transaction_status": "settlement",
        "transaction_id": "9aed5972-5b6a-401e-894b-a32c91ed1a3a",
        "status_message": "midtrans payment notification",
        "status_code": "200",
        "signature_key": "f00d",
        "payment_type": "bank_transfer",
        "order_id": "PURCHASE-3fa85f64-1714557600",
        "merchant_id": "G141532850",
        "gross_amount": "50000.00",
        "fraud_status": "accept"
    })
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_with_session_token() {
    let mut purchases = MockPurchaseCommand::new();
    purchases
        .expect_create_purchase()
        .with(eq(CreatePurchaseRequest {
            project_id: project(),
            buyer_id: buyer(),
        }))
        .times(1)
        .returning(|_| {
            Ok(CreatePurchaseResponse {
                token: "66e4fa55-fdac-4ef9-91b5-733b97d1b862".to_owned(),
                redirect_url: "https://app.sandbox.midtrans.com/snap/v4/redirection/66e4fa55"
                    .to_owned(),
                transaction_id: transaction_id(),
            })
        });
    let app = actix_test::init_service(test_app(purchases, MockPurchaseQuery::new())).await;
    let cookie = session_cookie(&app, BUYER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/transactions")
            .cookie(cookie)
            .set_json(json!({ "projectId": PROJECT }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["token"], "66e4fa55-fdac-4ef9-91b5-733b97d1b862");
    assert_eq!(body["transactionId"], TRANSACTION);
    assert!(body["redirectUrl"].as_str().is_some());
}

#[rstest]
#[actix_web::test]
async fn create_requires_a_session() {
    let mut purchases = MockPurchaseCommand::new();
    purchases.expect_create_purchase().never();
    let app = actix_test::init_service(test_app(purchases, MockPurchaseQuery::new())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/transactions")
            .set_json(json!({ "projectId": PROJECT }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({ "projectId": "project-one" }), "invalid_uuid")]
#[actix_web::test]
async fn create_validates_project_id(#[case] payload: Value, #[case] code: &str) {
    let mut purchases = MockPurchaseCommand::new();
    purchases.expect_create_purchase().never();
    let app = actix_test::init_service(test_app(purchases, MockPurchaseQuery::new())).await;
    let cookie = session_cookie(&app, BUYER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/transactions")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case(
    PurchaseError::AlreadyPurchased { project_id: PROJECT.into() },
    StatusCode::BAD_REQUEST,
    "already_purchased"
)]
#[case(
    PurchaseError::NotPurchasable { project_id: PROJECT.into() },
    StatusCode::BAD_REQUEST,
    "not_purchasable"
)]
#[case(
    PurchaseError::ProjectNotFound { project_id: PROJECT.into() },
    StatusCode::NOT_FOUND,
    "not_found"
)]
#[case(
    PurchaseError::TransientGateway { message: "timed out".into() },
    StatusCode::SERVICE_UNAVAILABLE,
    "service_unavailable"
)]
#[actix_web::test]
async fn create_maps_purchase_failures(
    #[case] failure: PurchaseError,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let mut purchases = MockPurchaseCommand::new();
    purchases
        .expect_create_purchase()
        .times(1)
        .returning(move |_| Err(Error::from(failure.clone())));
    let app = actix_test::init_service(test_app(purchases, MockPurchaseQuery::new())).await;
    let cookie = session_cookie(&app, BUYER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/transactions")
            .cookie(cookie)
            .set_json(json!({ "projectId": PROJECT }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], code);
}

#[rstest]
#[actix_web::test]
async fn callback_acknowledges_without_session() {
    let mut purchases = MockPurchaseCommand::new();
    purchases
        .expect_handle_notification()
        .withf(|notification| {
            notification.order_id == "PURCHASE-3fa85f64-1714557600"
                && notification.transaction_status == "settlement"
                && notification.fraud_status == "accept"
        })
        .times(1)
        .returning(|_| {
            Ok(NotificationReceipt {
                transaction_id: transaction_id(),
                status: TransactionStatus::Success,
                outcome: NotificationOutcome::EnteredSuccess,
            })
        });
    let app = actix_test::init_service(test_app(purchases, MockPurchaseQuery::new())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/transactions/callback")
            .set_json(notification_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[rstest]
#[actix_web::test]
async fn callback_with_bad_signature_is_rejected() {
    let mut purchases = MockPurchaseCommand::new();
    purchases
        .expect_handle_notification()
        .times(1)
        .returning(|notification| {
            Err(Error::from(PurchaseError::InvalidSignature {
                order_id: notification.order_id,
            }))
        });
    let app = actix_test::init_service(test_app(purchases, MockPurchaseQuery::new())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/transactions/callback")
            .set_json(notification_body())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_signature");
}

#[rstest]
#[actix_web::test]
async fn check_reports_ownership() {
    let mut query = MockPurchaseQuery::new();
    query
        .expect_has_purchased()
        .with(eq(buyer()), eq(project()))
        .times(1)
        .returning(|_, _| Ok(true));
    let app = actix_test::init_service(test_app(MockPurchaseCommand::new(), query)).await;
    let cookie = session_cookie(&app, BUYER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/transactions/check/{PROJECT}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "purchased": true }));
}

#[rstest]
#[case("", TransactionFilter::All, 1, 10)]
#[case("?page=2&perPage=5&type=purchases", TransactionFilter::Purchases, 2, 5)]
#[case("?page=0&perPage=500&type=sales", TransactionFilter::Sales, 1, 10)]
#[case("?page=abc&type=refunds", TransactionFilter::All, 1, 10)]
#[actix_web::test]
async fn list_normalises_query(
    #[case] query_string: &str,
    #[case] filter: TransactionFilter,
    #[case] page: u32,
    #[case] per_page: u32,
) {
    let mut query = MockPurchaseQuery::new();
    query
        .expect_list_transactions()
        .withf(move |user, seen_filter, seen_page| {
            *user == buyer()
                && *seen_filter == filter
                && seen_page.page() == page
                && seen_page.per_page() == per_page
        })
        .times(1)
        .returning(|_, _, request| {
            let at = DateTime::from_timestamp(1_714_557_600, 0).expect("valid timestamp");
            Ok(TransactionPage::new(
                vec![TransactionSummary {
                    id: transaction_id(),
                    project_id: project(),
                    project_title: "Campus Navigator".to_owned(),
                    buyer_name: "Sari".to_owned(),
                    amount: 50_000,
                    status: TransactionStatus::Success,
                    created_at: at,
                }],
                1,
                request,
            ))
        });
    let app = actix_test::init_service(test_app(MockPurchaseCommand::new(), query)).await;
    let cookie = session_cookie(&app, BUYER).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/transactions{query_string}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], page);
    assert_eq!(body["perPage"], per_page);
    assert_eq!(body["items"][0]["projectTitle"], "Campus Navigator");
    assert_eq!(body["items"][0]["status"], "success");
}
