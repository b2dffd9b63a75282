//! Team ingestion pipeline.
//!
//! # Responsibility
//! - Materialize a league → team → stadium → roster chain from a
//!   (team, league, country) request, reusing existing rows and fetching
//!   missing data from the provider exactly once per entity.
//!
//! # Invariants
//! - A request whose team already exists locally short-circuits with its
//!   id and performs no provider call beyond league resolution.
//! - "Provider has no match" is `Ok(None)`; no partial team row exists in
//!   that terminal.
//! - Rows committed by earlier steps are never rolled back by later
//!   failures; retries reuse them.

use crate::model::{EntityId, League, Player, Stadium, Team, ValidationError};
use crate::provider::{FootballProvider, ProviderError, RosterPlayer, TeamData, VenueData};
use crate::repo::entity_repo::{insert_row, RepoError};
use crate::repo::lookup;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pipeline failure: either the provider or the store gave up.
#[derive(Debug)]
pub enum IngestError {
    Provider(ProviderError),
    Repo(RepoError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ProviderError> for IngestError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

impl From<RepoError> for IngestError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ingestion request: all three parts are exact-match inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    pub team: String,
    pub league: String,
    pub country: String,
}

enum TeamResolution {
    Created(EntityId),
    Reused(EntityId),
}

/// Get-or-create pipeline over one store connection and one provider.
pub struct IngestService<'conn, P: FootballProvider> {
    conn: &'conn mut Connection,
    provider: P,
}

impl<'conn, P: FootballProvider> IngestService<'conn, P> {
    pub fn new(conn: &'conn mut Connection, provider: P) -> Self {
        Self { conn, provider }
    }

    /// Resolves the request to a fully populated team id.
    ///
    /// Returns `Ok(None)` when the provider recognizes neither the league
    /// nor the team; a league row created on the way stays in place for
    /// future requests.
    pub fn ingest_team(&mut self, request: &IngestRequest) -> Result<Option<EntityId>, IngestError> {
        let league = match self.resolve_league(&request.league, &request.country)? {
            Some(league) => league,
            None => {
                info!(
                    "event=ingest module=service stage=league status=not_found name={}",
                    request.league
                );
                return Ok(None);
            }
        };

        if let Some(team) = lookup::find_team_in_league(self.conn, &request.team, league.id)? {
            info!(
                "event=ingest module=service stage=team status=reused id={}",
                team.id
            );
            return Ok(Some(team.id));
        }

        let fetched = match self.provider.fetch_team(&request.team, league.api_id)? {
            Some(team) => team,
            None => {
                info!(
                    "event=ingest module=service stage=team status=not_found name={}",
                    request.team
                );
                return Ok(None);
            }
        };

        let stadium_id = match &fetched.venue {
            Some(venue) => Some(self.resolve_stadium(venue)?),
            None => None,
        };

        match self.create_team(&fetched, league.id, stadium_id)? {
            TeamResolution::Created(team_id) => {
                self.ingest_roster(team_id, fetched.external_id)?;
                info!(
                    "event=ingest module=service stage=done status=created id={team_id}"
                );
                Ok(Some(team_id))
            }
            // A concurrent identical request won the team insert; its
            // pipeline owns the roster.
            TeamResolution::Reused(team_id) => Ok(Some(team_id)),
        }
    }

    fn resolve_league(
        &mut self,
        name: &str,
        country: &str,
    ) -> Result<Option<League>, IngestError> {
        if let Some(existing) = lookup::find_league_by_name_country(self.conn, name, country)? {
            return Ok(Some(existing));
        }

        let Some(data) = self.provider.fetch_league(name, country)? else {
            return Ok(None);
        };

        let mut league = League::new(name, country);
        league.logo = data.logo;
        league.api_id = Some(data.external_id);
        match insert_row(self.conn, &league) {
            Ok(_) => {
                info!(
                    "event=ingest module=service stage=league status=created id={}",
                    league.id
                );
                Ok(Some(league))
            }
            Err(RepoError::Conflict(reason)) => {
                // Lost a uniqueness race; the winner's row is the one to
                // reuse.
                match lookup::find_league_by_name_country(self.conn, name, country)? {
                    Some(existing) => Ok(Some(existing)),
                    None => Err(RepoError::Conflict(reason).into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    fn resolve_stadium(&mut self, venue: &VenueData) -> Result<EntityId, IngestError> {
        if let Some(existing) =
            lookup::find_stadium_by_name_address(self.conn, &venue.name, &venue.address)?
        {
            return Ok(existing.id);
        }

        let mut stadium = Stadium::new(venue.name.clone(), venue.address.clone(), venue.city.clone());
        stadium.capacity = venue.capacity;
        stadium.surface = venue.surface.clone();
        stadium.image = venue.image.clone();
        match insert_row(self.conn, &stadium) {
            Ok(id) => Ok(id),
            Err(RepoError::Conflict(reason)) => {
                match lookup::find_stadium_by_name_address(self.conn, &venue.name, &venue.address)? {
                    Some(existing) => Ok(existing.id),
                    None => Err(RepoError::Conflict(reason).into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    fn create_team(
        &mut self,
        fetched: &TeamData,
        league_id: EntityId,
        stadium_id: Option<EntityId>,
    ) -> Result<TeamResolution, IngestError> {
        let founded = fetched
            .founded
            .ok_or(RepoError::Validation(ValidationError::MissingField(
                "founded",
            )))?;

        let mut team = Team::new(fetched.name.clone(), founded);
        team.logo = fetched.logo.clone();
        team.stadium_id = stadium_id;
        team.league_id = Some(league_id);
        match insert_row(self.conn, &team) {
            Ok(id) => Ok(TeamResolution::Created(id)),
            Err(RepoError::Conflict(reason)) => {
                match lookup::find_team_in_league(self.conn, &fetched.name, league_id)? {
                    Some(existing) => Ok(TeamResolution::Reused(existing.id)),
                    None => Err(RepoError::Conflict(reason).into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Accepted at-least-once step: one insert per roster entry, no
    /// wrapping transaction, first failure propagates and keeps the rows
    /// already committed.
    fn ingest_roster(
        &mut self,
        team_id: EntityId,
        team_external_id: i64,
    ) -> Result<(), IngestError> {
        let roster = self.provider.fetch_roster(team_external_id)?;
        let count = roster.len();
        for entry in &roster {
            let player = player_from_roster(entry, team_id);
            insert_row(self.conn, &player)?;
        }
        info!(
            "event=ingest module=service stage=roster status=ok team_id={team_id} players={count}"
        );
        Ok(())
    }
}

fn player_from_roster(entry: &RosterPlayer, team_id: EntityId) -> Player {
    let mut player = Player::new(entry.name.clone(), team_id);
    player.age = entry.age;
    player.number = entry.number;
    player.position = entry.position.clone();
    player.photo = entry.photo.clone();
    player
}
