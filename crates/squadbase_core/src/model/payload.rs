//! Payload-map field extraction shared by the four catalog records.
//!
//! A `null` value behaves like an absent field on create paths; update
//! paths iterate present keys, so `null` there means "clear the field".

use crate::model::{EntityId, Payload, ValidationError};
use serde_json::Value;

/// Fails when the payload carries a key outside the record's column set.
pub(crate) fn reject_unknown_fields(
    payload: &Payload,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    for key in payload.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(ValidationError::UnknownField(key.clone()));
        }
    }
    Ok(())
}

pub(crate) fn text_value(
    value: &Value,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(ValidationError::InvalidFieldValue {
            field,
            expected: "a string",
        }),
    }
}

pub(crate) fn int_value(
    value: &Value,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number.as_i64().map(Some).ok_or({
            ValidationError::InvalidFieldValue {
                field,
                expected: "an integer",
            }
        }),
        _ => Err(ValidationError::InvalidFieldValue {
            field,
            expected: "an integer",
        }),
    }
}

/// Strict identifier parse: empty or malformed tokens are rejected.
pub(crate) fn id_value(
    value: &Value,
    field: &'static str,
) -> Result<Option<EntityId>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => EntityId::parse_str(text).map(Some).map_err(|_| {
            ValidationError::InvalidFieldValue {
                field,
                expected: "a UUID string",
            }
        }),
        _ => Err(ValidationError::InvalidFieldValue {
            field,
            expected: "a UUID string",
        }),
    }
}

/// Lenient optional-reference parse used by update paths: an empty string
/// (or `null`) clears the reference instead of storing a literal.
pub(crate) fn reference_value(
    value: &Value,
    field: &'static str,
) -> Result<Option<EntityId>, ValidationError> {
    match value {
        Value::String(text) if text.is_empty() => Ok(None),
        other => id_value(other, field),
    }
}

pub(crate) fn require_text(
    payload: &Payload,
    field: &'static str,
) -> Result<String, ValidationError> {
    optional_text(payload, field)?.ok_or(ValidationError::MissingField(field))
}

pub(crate) fn optional_text(
    payload: &Payload,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match payload.get(field) {
        None => Ok(None),
        Some(value) => text_value(value, field),
    }
}

pub(crate) fn require_int(payload: &Payload, field: &'static str) -> Result<i64, ValidationError> {
    optional_int(payload, field)?.ok_or(ValidationError::MissingField(field))
}

pub(crate) fn optional_int(
    payload: &Payload,
    field: &'static str,
) -> Result<Option<i64>, ValidationError> {
    match payload.get(field) {
        None => Ok(None),
        Some(value) => int_value(value, field),
    }
}

pub(crate) fn optional_id(
    payload: &Payload,
    field: &'static str,
) -> Result<Option<EntityId>, ValidationError> {
    match payload.get(field) {
        None => Ok(None),
        Some(value) => id_value(value, field),
    }
}

pub(crate) fn require_id(
    payload: &Payload,
    field: &'static str,
) -> Result<EntityId, ValidationError> {
    optional_id(payload, field)?.ok_or(ValidationError::MissingField(field))
}
