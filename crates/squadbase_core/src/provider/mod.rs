//! External football-data provider boundary.
//!
//! # Responsibility
//! - Define the three query capabilities the ingestion pipeline consumes.
//! - Keep provider records plain data so pipelines test against fakes.
//!
//! # Invariants
//! - "No match" is a value (`None`/empty), never an error.
//! - Transport and non-success responses surface as one failure kind; the
//!   adapter performs no retry internally.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod api_football;

pub use api_football::ApiFootballProvider;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Single failure surface of the external provider.
#[derive(Debug)]
pub enum ProviderError {
    /// Non-success HTTP status returned by the provider.
    Status(u16),
    Transport(String),
    Decode(String),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "provider request failed with status {code}"),
            Self::Transport(message) => write!(f, "provider transport failure: {message}"),
            Self::Decode(message) => write!(f, "provider response decode failure: {message}"),
        }
    }
}

impl Error for ProviderError {}

/// League facts needed to materialize a local league row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueData {
    pub external_id: i64,
    pub logo: Option<String>,
}

/// Venue facts; only materialized when the provider supplied the full
/// name/address/city triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueData {
    pub name: String,
    pub address: String,
    pub city: String,
    pub capacity: Option<i64>,
    pub surface: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamData {
    pub external_id: i64,
    pub name: String,
    pub founded: Option<i64>,
    pub logo: Option<String>,
    pub venue: Option<VenueData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPlayer {
    pub name: String,
    pub age: Option<i64>,
    pub number: Option<i64>,
    pub position: Option<String>,
    pub photo: Option<String>,
}

/// Query capabilities of the external football-data source.
pub trait FootballProvider {
    fn fetch_league(&self, name: &str, country: &str) -> ProviderResult<Option<LeagueData>>;

    /// Fetches one team by exact name, scoped to a league's external id
    /// when one is known.
    fn fetch_team(
        &self,
        name: &str,
        league_external_id: Option<i64>,
    ) -> ProviderResult<Option<TeamData>>;

    /// Returns the team's full roster; possibly empty.
    fn fetch_roster(&self, team_external_id: i64) -> ProviderResult<Vec<RosterPlayer>>;
}
