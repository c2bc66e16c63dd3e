//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::interaction::InteractionKind;
use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidTimestamp,
    InvalidChoice,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidChoice => "invalid_choice",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("{name} must be an RFC 3339 timestamp"),
        ErrorCode::InvalidTimestamp,
        value,
    )
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

pub(crate) fn parse_interaction_kind(value: &str, field: FieldName) -> Result<InteractionKind, Error> {
    value.parse::<InteractionKind>().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be one of click, hover, focus, scroll"),
            ErrorCode::InvalidChoice,
            value,
        )
    })
}

pub(crate) fn parse_optional_interaction_kind(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<InteractionKind>, Error> {
    value
        .map(|raw| parse_interaction_kind(raw, field))
        .transpose()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use serde_json::Value;

    use super::*;

    const FIELD: FieldName = FieldName::new("start_date");

    #[rstest]
    fn accepts_rfc3339_timestamps() {
        let parsed =
            parse_rfc3339_timestamp("2026-03-01T12:00:00Z", FIELD).expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T12:00:00+00:00");
    }

    #[rstest]
    #[case("2026-03-01")]
    #[case("yesterday")]
    fn rejects_non_rfc3339_values(#[case] raw: &str) {
        let err = parse_rfc3339_timestamp(raw, FIELD).expect_err("invalid rejected");
        let details = err.details().expect("details");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("invalid_timestamp")
        );
        assert_eq!(
            details.get("field").and_then(Value::as_str),
            Some("start_date")
        );
    }

    #[rstest]
    fn optional_timestamp_passes_none_through() {
        assert_eq!(
            parse_optional_rfc3339_timestamp(None, FIELD).expect("ok"),
            None
        );
    }

    #[rstest]
    fn kind_parsing_is_case_sensitive() {
        let field = FieldName::new("type");
        assert!(parse_interaction_kind("click", field).is_ok());
        let err = parse_interaction_kind("Click", field).expect_err("case sensitive");
        let details = err.details().expect("details");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("invalid_choice")
        );
    }
}
