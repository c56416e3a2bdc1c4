//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::transactions::TransactionFilter;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ValidationCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a pagination number, treating anything unparsable as absent.
pub(crate) fn lenient_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// Parse the history `type` filter; unknown values list everything.
pub(crate) fn lenient_filter(raw: Option<&str>) -> TransactionFilter {
    match raw.map(str::parse::<TransactionFilter>) {
        Some(Ok(filter)) => filter,
        Some(Err(err)) => {
            debug!(error = %err, "falling back to the unfiltered history");
            TransactionFilter::All
        }
        None => TransactionFilter::All,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    const PROJECT_ID: FieldName = FieldName::new("projectId");

    #[rstest]
    fn missing_field_names_the_field() {
        let error = missing_field_error(PROJECT_ID);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "projectId", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn invalid_uuid_reports_value() {
        let error = parse_uuid("not-a-uuid", PROJECT_ID).expect_err("invalid");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "projectId", "value": "not-a-uuid", "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("3"), Some(3))]
    #[case(Some(" 7 "), Some(7))]
    #[case(Some("-2"), Some(-2))]
    #[case(Some("two"), None)]
    fn numbers_parse_leniently(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(lenient_number(raw), expected);
    }

    #[rstest]
    #[case(None, TransactionFilter::All)]
    #[case(Some("purchases"), TransactionFilter::Purchases)]
    #[case(Some("sales"), TransactionFilter::Sales)]
    #[case(Some("refunds"), TransactionFilter::All)]
    fn filters_fall_back_to_all(#[case] raw: Option<&str>, #[case] expected: TransactionFilter) {
        assert_eq!(lenient_filter(raw), expected);
    }
}
