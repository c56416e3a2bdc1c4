//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("login"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("later"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn only_service_unavailable_is_retryable() {
    assert!(Error::service_unavailable("gateway down").is_retryable());
    assert!(!Error::new(ErrorCode::AlreadyPurchased, "owned").is_retryable());
    assert!(!Error::internal("boom").is_retryable());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let expected = trace_id.to_string();
    let error = TraceId::scope(trace_id, async move { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(expected.as_str()));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
fn serialises_codes_in_snake_case() {
    let error = Error::new(ErrorCode::InvalidSignature, "signature mismatch")
        .with_details(json!({ "orderId": "PURCHASE-1" }));
    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(value["code"], "invalid_signature");
    assert_eq!(value["message"], "signature mismatch");
    assert_eq!(value["details"]["orderId"], "PURCHASE-1");
    assert!(value.get("traceId").is_none());
}
