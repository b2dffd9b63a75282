//! Player record. Always belongs to exactly one team; rows follow their
//! team on deletion.

use crate::model::payload::{
    id_value, int_value, optional_id, optional_int, optional_text, reject_unknown_fields,
    require_id, require_text, text_value,
};
use crate::model::{
    check_positive, check_text_len, EntityId, Payload, ValidationError, DEFAULT_PLAYER_PHOTO,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub age: Option<i64>,
    pub number: Option<i64>,
    pub position: Option<String>,
    pub photo: Option<String>,
    pub team_id: EntityId,
}

impl Player {
    pub const FIELDS: &'static [&'static str] = &[
        "id", "name", "age", "number", "position", "photo", "team_id",
    ];

    pub fn new(name: impl Into<String>, team_id: EntityId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age: None,
            number: None,
            position: None,
            photo: Some(DEFAULT_PLAYER_PHOTO.to_string()),
            team_id,
        }
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        reject_unknown_fields(payload, Self::FIELDS)?;
        Ok(Self {
            id: optional_id(payload, "id")?.unwrap_or_else(Uuid::new_v4),
            name: require_text(payload, "name")?,
            age: optional_int(payload, "age")?,
            number: optional_int(payload, "number")?,
            position: optional_text(payload, "position")?,
            photo: optional_text(payload, "photo")?
                .or_else(|| Some(DEFAULT_PLAYER_PHOTO.to_string())),
            team_id: require_id(payload, "team_id")?,
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
                "age" => self.age = int_value(value, "age")?,
                "number" => self.number = int_value(value, "number")?,
                "position" => self.position = text_value(value, "position")?,
                "photo" => self.photo = text_value(value, "photo")?,
                "team_id" => {
                    self.team_id = id_value(value, "team_id")?.ok_or(
                        ValidationError::InvalidFieldValue {
                            field: "team_id",
                            expected: "a non-null UUID string",
                        },
                    )?;
                }
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text_len(&self.name, "name", 80)?;
        if let Some(position) = &self.position {
            check_text_len(position, "position", 40)?;
        }
        if let Some(photo) = &self.photo {
            check_text_len(photo, "photo", 500)?;
        }
        if let Some(age) = self.age {
            check_positive(age, "age")?;
        }
        if let Some(number) = self.number {
            check_positive(number, "number")?;
        }
        Ok(())
    }
}
