//! Blocking HTTP adapter for the api-sports football API.
//!
//! # Responsibility
//! - Issue the three catalog queries against `/leagues`, `/teams` and
//!   `/players/squads` with a bounded timeout.
//! - Reduce provider payloads to the plain records the pipeline consumes,
//!   matching by exact name on the client side.
//!
//! # Invariants
//! - Every request carries the account key header and the configured
//!   season.
//! - Non-success responses map to `ProviderError::Status`; no retries.

use crate::provider::{
    FootballProvider, LeagueData, ProviderError, ProviderResult, RosterPlayer, TeamData, VenueData,
};
use log::info;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const API_KEY_HEADER: &str = "x-apisports-key";

/// Provider adapter over the api-sports HTTP surface.
pub struct ApiFootballProvider {
    client: Client,
    base_url: String,
    api_key: String,
    season: u16,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    league: LeagueInfo,
    country: CountryInfo,
}

#[derive(Debug, Deserialize)]
struct LeagueInfo {
    id: i64,
    name: String,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: TeamInfo,
    venue: Option<VenueInfo>,
}

#[derive(Debug, Deserialize)]
struct TeamInfo {
    id: i64,
    name: String,
    founded: Option<i64>,
    logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VenueInfo {
    name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    capacity: Option<i64>,
    surface: Option<String>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SquadEntry {
    #[serde(default)]
    players: Vec<SquadPlayer>,
}

#[derive(Debug, Deserialize)]
struct SquadPlayer {
    name: String,
    age: Option<i64>,
    number: Option<i64>,
    position: Option<String>,
    photo: Option<String>,
}

impl ApiFootballProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        season: u16,
    ) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            season,
        })
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<Vec<T>> {
        let url = format!("{}{path}", self.base_url);
        let started_at = Instant::now();
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        info!(
            "event=provider_fetch module=provider path={path} status={} duration_ms={}",
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let envelope: Envelope<T> = response
            .json()
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        Ok(envelope.response)
    }
}

impl FootballProvider for ApiFootballProvider {
    fn fetch_league(&self, name: &str, country: &str) -> ProviderResult<Option<LeagueData>> {
        let entries: Vec<LeagueEntry> =
            self.get("/leagues", &[("season", self.season.to_string())])?;
        Ok(match_league(&entries, name, country))
    }

    fn fetch_team(
        &self,
        name: &str,
        league_external_id: Option<i64>,
    ) -> ProviderResult<Option<TeamData>> {
        let mut query = vec![("season", self.season.to_string())];
        if let Some(league) = league_external_id {
            query.push(("league", league.to_string()));
        }
        let entries: Vec<TeamEntry> = self.get("/teams", &query)?;
        Ok(match_team(entries, name))
    }

    fn fetch_roster(&self, team_external_id: i64) -> ProviderResult<Vec<RosterPlayer>> {
        let entries: Vec<SquadEntry> =
            self.get("/players/squads", &[("team", team_external_id.to_string())])?;
        Ok(entries
            .into_iter()
            .next()
            .map(|squad| squad.players.into_iter().map(roster_player).collect())
            .unwrap_or_default())
    }
}

fn match_league(entries: &[LeagueEntry], name: &str, country: &str) -> Option<LeagueData> {
    entries
        .iter()
        .find(|entry| entry.league.name == name && entry.country.name == country)
        .map(|entry| LeagueData {
            external_id: entry.league.id,
            logo: entry.league.logo.clone(),
        })
}

fn match_team(entries: Vec<TeamEntry>, name: &str) -> Option<TeamData> {
    entries
        .into_iter()
        .find(|entry| entry.team.name == name)
        .map(|entry| TeamData {
            external_id: entry.team.id,
            name: entry.team.name,
            founded: entry.team.founded,
            logo: entry.team.logo,
            venue: entry.venue.and_then(venue_data),
        })
}

// A venue missing any of name/address/city cannot satisfy the stadium
// schema; the team is then created without a stadium reference.
fn venue_data(venue: VenueInfo) -> Option<VenueData> {
    match (venue.name, venue.address, venue.city) {
        (Some(name), Some(address), Some(city)) => Some(VenueData {
            name,
            address,
            city,
            capacity: venue.capacity,
            surface: venue.surface,
            image: venue.image,
        }),
        _ => None,
    }
}

fn roster_player(player: SquadPlayer) -> RosterPlayer {
    RosterPlayer {
        name: player.name,
        age: player.age,
        number: player.number,
        position: player.position,
        photo: player.photo,
    }
}
