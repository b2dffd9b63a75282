//! Catalog domain model.
//!
//! # Responsibility
//! - Define the four catalog records (league, team, stadium, player).
//! - Own field bounds and payload-map parsing shared by all write paths.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId` that is never reused.
//! - Records parsed from payload maps are validated before persistence.
//! - Optional foreign keys are `None`, never an empty-string sentinel.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod league;
pub(crate) mod payload;
pub mod player;
pub mod stadium;
pub mod team;

pub use league::League;
pub use player::Player;
pub use stadium::Stadium;
pub use team::Team;

/// Placeholder artwork applied when a create payload omits the field.
pub const DEFAULT_CLUB_BADGE: &str =
    "https://cdn.enjore.com/source/img/team/badge/q/1636120TLU33i410VLqAu.png";
pub const DEFAULT_PLAYER_PHOTO: &str = "https://media.api-sports.io/football/players/330612.png";
pub const DEFAULT_STADIUM_IMAGE: &str = "https://i.postimg.cc/fbWZrq56/121675725.webp";

/// Stable identifier for every catalog record.
pub type EntityId = uuid::Uuid;

/// Incoming field map, keyed by attribute name.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Rejection produced by payload parsing or record validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(&'static str),
    UnknownField(String),
    InvalidFieldValue {
        field: &'static str,
        expected: &'static str,
    },
    TooLong {
        field: &'static str,
        max: usize,
    },
    NotPositive(&'static str),
    FoundedInFuture {
        founded: i64,
        current_year: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::UnknownField(field) => write!(f, "unknown field `{field}`"),
            Self::InvalidFieldValue { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
            Self::TooLong { field, max } => {
                write!(f, "field `{field}` must be shorter than {max} characters")
            }
            Self::NotPositive(field) => write!(f, "field `{field}` must be positive"),
            Self::FoundedInFuture {
                founded,
                current_year,
            } => write!(
                f,
                "founded year {founded} is later than current year {current_year}"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn check_text_len(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() >= max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub(crate) fn check_positive(value: i64, field: &'static str) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(())
}
