//! Entity descriptors binding the catalog records to their tables.
//!
//! Bind order is positional and shared between INSERT and UPDATE, with
//! the id always at position 1.

use crate::model::{EntityId, League, Payload, Player, Stadium, Team, ValidationError};
use crate::repo::cleanup::{OrphanCandidate, ParentKind};
use crate::repo::entity_repo::{parse_id, CatalogEntity, RepoResult};
use rusqlite::types::Value as SqlValue;
use rusqlite::Row;

fn id_text(id: EntityId) -> SqlValue {
    SqlValue::Text(id.to_string())
}

fn opt_id_text(id: Option<EntityId>) -> SqlValue {
    id.map_or(SqlValue::Null, id_text)
}

fn opt_text(value: &Option<String>) -> SqlValue {
    value
        .as_ref()
        .map_or(SqlValue::Null, |text| SqlValue::Text(text.clone()))
}

fn opt_int(value: Option<i64>) -> SqlValue {
    value.map_or(SqlValue::Null, SqlValue::Integer)
}

fn opt_ref(row: &Row<'_>, column: &str, qualified: &str) -> RepoResult<Option<EntityId>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => Ok(Some(parse_id(&text, qualified)?)),
        None => Ok(None),
    }
}

impl CatalogEntity for League {
    const KIND: &'static str = "league";
    const TABLE: &'static str = "leagues";
    const SELECT_SQL: &'static str = "SELECT id, name, country, logo, api_id FROM leagues";
    const INSERT_SQL: &'static str = "INSERT INTO leagues (id, name, country, logo, api_id)
         VALUES (?1, ?2, ?3, ?4, ?5);";
    const UPDATE_SQL: &'static str = "UPDATE leagues
         SET name = ?2, country = ?3, logo = ?4, api_id = ?5
         WHERE id = ?1;";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        Self::from_payload(payload)
    }

    fn apply_payload(&mut self, payload: &Payload) -> Result<(), ValidationError> {
        Self::apply_payload(self, payload)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Self::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let league = Self {
            id: parse_id(&row.get::<_, String>("id")?, "leagues.id")?,
            name: row.get("name")?,
            country: row.get("country")?,
            logo: row.get("logo")?,
            api_id: row.get("api_id")?,
        };
        league.validate()?;
        Ok(league)
    }

    fn bind_values(&self) -> Vec<SqlValue> {
        vec![
            id_text(self.id),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.country.clone()),
            opt_text(&self.logo),
            opt_int(self.api_id),
        ]
    }
}

impl CatalogEntity for Stadium {
    const KIND: &'static str = "stadium";
    const TABLE: &'static str = "stadiums";
    const SELECT_SQL: &'static str =
        "SELECT id, name, address, city, capacity, surface, image FROM stadiums";
    const INSERT_SQL: &'static str =
        "INSERT INTO stadiums (id, name, address, city, capacity, surface, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);";
    const UPDATE_SQL: &'static str = "UPDATE stadiums
         SET name = ?2, address = ?3, city = ?4, capacity = ?5, surface = ?6, image = ?7
         WHERE id = ?1;";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        Self::from_payload(payload)
    }

    fn apply_payload(&mut self, payload: &Payload) -> Result<(), ValidationError> {
        Self::apply_payload(self, payload)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Self::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let stadium = Self {
            id: parse_id(&row.get::<_, String>("id")?, "stadiums.id")?,
            name: row.get("name")?,
            address: row.get("address")?,
            city: row.get("city")?,
            capacity: row.get("capacity")?,
            surface: row.get("surface")?,
            image: row.get("image")?,
        };
        stadium.validate()?;
        Ok(stadium)
    }

    fn bind_values(&self) -> Vec<SqlValue> {
        vec![
            id_text(self.id),
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.address.clone()),
            SqlValue::Text(self.city.clone()),
            opt_int(self.capacity),
            opt_text(&self.surface),
            opt_text(&self.image),
        ]
    }
}

impl CatalogEntity for Team {
    const KIND: &'static str = "team";
    const TABLE: &'static str = "teams";
    const SELECT_SQL: &'static str =
        "SELECT id, name, founded, logo, stadium_id, league_id FROM teams";
    const INSERT_SQL: &'static str =
        "INSERT INTO teams (id, name, founded, logo, stadium_id, league_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);";
    const UPDATE_SQL: &'static str = "UPDATE teams
         SET name = ?2, founded = ?3, logo = ?4, stadium_id = ?5, league_id = ?6
         WHERE id = ?1;";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        Self::from_payload(payload)
    }

    fn apply_payload(&mut self, payload: &Payload) -> Result<(), ValidationError> {
        Self::apply_payload(self, payload)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Self::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let team = Self {
            id: parse_id(&row.get::<_, String>("id")?, "teams.id")?,
            name: row.get("name")?,
            founded: row.get("founded")?,
            logo: row.get("logo")?,
            stadium_id: opt_ref(row, "stadium_id", "teams.stadium_id")?,
            league_id: opt_ref(row, "league_id", "teams.league_id")?,
        };
        team.validate()?;
        Ok(team)
    }

    fn bind_values(&self) -> Vec<SqlValue> {
        vec![
            id_text(self.id),
            SqlValue::Text(self.name.clone()),
            SqlValue::Integer(self.founded),
            opt_text(&self.logo),
            opt_id_text(self.stadium_id),
            opt_id_text(self.league_id),
        ]
    }

    // Deleting a team may strand its stadium and league; both are
    // re-checked inside the deleting transaction.
    fn orphan_candidates(&self) -> Vec<OrphanCandidate> {
        vec![
            OrphanCandidate {
                parent: ParentKind::Stadium,
                id: self.stadium_id,
            },
            OrphanCandidate {
                parent: ParentKind::League,
                id: self.league_id,
            },
        ]
    }
}

impl CatalogEntity for Player {
    const KIND: &'static str = "player";
    const TABLE: &'static str = "players";
    const SELECT_SQL: &'static str =
        "SELECT id, name, age, number, position, photo, team_id FROM players";
    const INSERT_SQL: &'static str =
        "INSERT INTO players (id, name, age, number, position, photo, team_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);";
    const UPDATE_SQL: &'static str = "UPDATE players
         SET name = ?2, age = ?3, number = ?4, position = ?5, photo = ?6, team_id = ?7
         WHERE id = ?1;";

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        Self::from_payload(payload)
    }

    fn apply_payload(&mut self, payload: &Payload) -> Result<(), ValidationError> {
        Self::apply_payload(self, payload)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Self::validate(self)
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let player = Self {
            id: parse_id(&row.get::<_, String>("id")?, "players.id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            number: row.get("number")?,
            position: row.get("position")?,
            photo: row.get("photo")?,
            team_id: parse_id(&row.get::<_, String>("team_id")?, "players.team_id")?,
        };
        player.validate()?;
        Ok(player)
    }

    fn bind_values(&self) -> Vec<SqlValue> {
        vec![
            id_text(self.id),
            SqlValue::Text(self.name.clone()),
            opt_int(self.age),
            opt_int(self.number),
            opt_text(&self.position),
            opt_text(&self.photo),
            id_text(self.team_id),
        ]
    }
}
