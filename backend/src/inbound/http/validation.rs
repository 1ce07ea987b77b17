//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path identifiers arrive as strings so malformed values produce the
//! standard error envelope instead of Actix's bare 404.

use serde_json::json;
use uuid::Uuid;

use crate::domain::forms::{FormId, ResponseId};
use crate::domain::{ClientId, Error, UserId};

/// Validation error codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
        }
    }
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: &'static str, value: &str) -> Error {
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

fn parse_uuid(value: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    parse_uuid(value, "userId").map(UserId::from_uuid)
}

pub(crate) fn parse_client_id(value: &str) -> Result<ClientId, Error> {
    parse_uuid(value, "clientId").map(ClientId::from_uuid)
}

pub(crate) fn parse_form_id(value: &str) -> Result<FormId, Error> {
    parse_uuid(value, "formId").map(FormId::from_uuid)
}

pub(crate) fn parse_response_id(value: &str) -> Result<ResponseId, Error> {
    parse_uuid(value, "responseId").map(ResponseId::from_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn malformed_ids_name_the_field(#[case] raw: &str) {
        let err = parse_form_id(raw).expect_err("malformed id");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "formId", "value": raw, "code": "invalid_uuid"}))
        );
    }

    #[rstest]
    fn well_formed_ids_parse() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        assert_eq!(
            parse_response_id(raw).expect("valid").to_string(),
            raw.to_owned()
        );
        assert_eq!(parse_user_id(raw).expect("valid").to_string(), raw);
    }

    #[rstest]
    fn missing_fields_carry_a_code() {
        let err = missing_field_error("recipientEmail");
        assert_eq!(
            err.details().and_then(|d| d.get("code")),
            Some(&json!("missing_field"))
        );
    }
}
