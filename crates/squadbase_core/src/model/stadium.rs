//! Stadium record. Unique by `(name, address)`; shared by any number of
//! teams.

use crate::model::payload::{
    int_value, optional_id, optional_int, optional_text, reject_unknown_fields, require_text,
    text_value,
};
use crate::model::{
    check_positive, check_text_len, EntityId, Payload, ValidationError, DEFAULT_STADIUM_IMAGE,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stadium {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub capacity: Option<i64>,
    pub surface: Option<String>,
    pub image: Option<String>,
}

impl Stadium {
    pub const FIELDS: &'static [&'static str] = &[
        "id", "name", "address", "city", "capacity", "surface", "image",
    ];

    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            city: city.into(),
            capacity: None,
            surface: None,
            image: Some(DEFAULT_STADIUM_IMAGE.to_string()),
        }
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        reject_unknown_fields(payload, Self::FIELDS)?;
        Ok(Self {
            id: optional_id(payload, "id")?.unwrap_or_else(Uuid::new_v4),
            name: require_text(payload, "name")?,
            address: require_text(payload, "address")?,
            city: require_text(payload, "city")?,
            capacity: optional_int(payload, "capacity")?,
            surface: optional_text(payload, "surface")?,
            image: optional_text(payload, "image")?
                .or_else(|| Some(DEFAULT_STADIUM_IMAGE.to_string())),
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
                "address" => {
                    self.address = text_value(value, "address")?.ok_or(
                        ValidationError::InvalidFieldValue {
                            field: "address",
                            expected: "a non-null string",
                        },
                    )?;
                }
                "city" => {
                    self.city = text_value(value, "city")?.ok_or(
                        ValidationError::InvalidFieldValue {
                            field: "city",
                            expected: "a non-null string",
                        },
                    )?;
                }
                "capacity" => self.capacity = int_value(value, "capacity")?,
                "surface" => self.surface = text_value(value, "surface")?,
                "image" => self.image = text_value(value, "image")?,
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text_len(&self.name, "name", 80)?;
        check_text_len(&self.address, "address", 150)?;
        check_text_len(&self.city, "city", 80)?;
        if let Some(image) = &self.image {
            check_text_len(image, "image", 500)?;
        }
        if let Some(capacity) = self.capacity {
            check_positive(capacity, "capacity")?;
        }
        Ok(())
    }
}
