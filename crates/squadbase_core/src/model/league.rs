//! League record.
//!
//! # Invariants
//! - `(name, country)` is unique across the catalog.
//! - `api_id` carries the external provider's numeric id when the row was
//!   materialized through ingestion; user-created rows leave it unset.

use crate::model::payload::{
    int_value, optional_id, optional_int, optional_text, reject_unknown_fields, require_text,
    text_value,
};
use crate::model::{check_text_len, EntityId, Payload, ValidationError, DEFAULT_CLUB_BADGE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: EntityId,
    pub name: String,
    pub country: String,
    pub logo: Option<String>,
    pub api_id: Option<i64>,
}

impl League {
    pub const FIELDS: &'static [&'static str] = &["id", "name", "country", "logo", "api_id"];

    /// Creates a league with a generated id and the placeholder badge.
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            country: country.into(),
            logo: Some(DEFAULT_CLUB_BADGE.to_string()),
            api_id: None,
        }
    }

    /// Builds a league from a create payload, rejecting unknown fields.
    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        reject_unknown_fields(payload, Self::FIELDS)?;
        Ok(Self {
            id: optional_id(payload, "id")?.unwrap_or_else(Uuid::new_v4),
            name: require_text(payload, "name")?,
            country: require_text(payload, "country")?,
            logo: optional_text(payload, "logo")?
                .or_else(|| Some(DEFAULT_CLUB_BADGE.to_string())),
            api_id: optional_int(payload, "api_id")?,
        })
    }

    /// Applies a partial update payload. The `id` field never changes.
    pub fn apply_payload(&mut self, payload: &Payload) -> Result<(), ValidationError> {
        for (key, value) in payload {
            match key.as_str() {
                "id" => {}
                "name" => {
                    self.name = text_value(value, "name")?.ok_or(
                        ValidationError::InvalidFieldValue {
                            field: "name",
                            expected: "a non-null string",
                        },
                    )?;
                }
                "country" => {
                    self.country = text_value(value, "country")?.ok_or(
                        ValidationError::InvalidFieldValue {
                            field: "country",
                            expected: "a non-null string",
                        },
                    )?;
                }
                "logo" => self.logo = text_value(value, "logo")?,
                "api_id" => self.api_id = int_value(value, "api_id")?,
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text_len(&self.name, "name", 80)?;
        check_text_len(&self.country, "country", 80)?;
        if let Some(logo) = &self.logo {
            check_text_len(logo, "logo", 500)?;
        }
        Ok(())
    }
}
