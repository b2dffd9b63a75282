//! Team record.
//!
//! # Invariants
//! - `(name, founded)` is unique across the catalog.
//! - `league_id`/`stadium_id` are optional references; an update payload
//!   carrying an empty string (or `null`) clears the reference instead of
//!   storing a literal.
//! - `founded` must not lie in the future. SQLite CHECK constraints cannot
//!   consult the clock, so this rule lives here.

use crate::model::payload::{
    int_value, optional_id, optional_text, reject_unknown_fields, reference_value, require_int,
    require_text, text_value,
};
use crate::model::{check_text_len, EntityId, Payload, ValidationError, DEFAULT_CLUB_BADGE};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    pub name: String,
    pub founded: i64,
    pub logo: Option<String>,
    pub stadium_id: Option<EntityId>,
    pub league_id: Option<EntityId>,
}

impl Team {
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "founded",
        "logo",
        "stadium_id",
        "league_id",
    ];

    pub fn new(name: impl Into<String>, founded: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            founded,
            logo: Some(DEFAULT_CLUB_BADGE.to_string()),
            stadium_id: None,
            league_id: None,
        }
    }

    /// Builds a team from a create payload. Reference fields must be valid
    /// identifiers here; the empty-string-clears rule applies to updates
    /// only.
    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        reject_unknown_fields(payload, Self::FIELDS)?;
        Ok(Self {
            id: optional_id(payload, "id")?.unwrap_or_else(Uuid::new_v4),
            name: require_text(payload, "name")?,
            founded: require_int(payload, "founded")?,
            logo: optional_text(payload, "logo")?
                .or_else(|| Some(DEFAULT_CLUB_BADGE.to_string())),
            stadium_id: optional_id(payload, "stadium_id")?,
            league_id: optional_id(payload, "league_id")?,
        })
    }

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
                "founded" => {
                    self.founded = int_value(value, "founded")?.ok_or(
                        ValidationError::InvalidFieldValue {
                            field: "founded",
                            expected: "a non-null integer",
                        },
                    )?;
                }
                "logo" => self.logo = text_value(value, "logo")?,
                "stadium_id" => self.stadium_id = reference_value(value, "stadium_id")?,
                "league_id" => self.league_id = reference_value(value, "league_id")?,
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text_len(&self.name, "name", 80)?;
        if let Some(logo) = &self.logo {
            check_text_len(logo, "logo", 500)?;
        }
        let current_year = i64::from(Utc::now().year());
        if self.founded > current_year {
            return Err(ValidationError::FoundedInFuture {
                founded: self.founded,
                current_year,
            });
        }
        Ok(())
    }
}
