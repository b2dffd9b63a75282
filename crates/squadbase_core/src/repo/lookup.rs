//! Unique-key lookups consumed by the ingestion pipeline and boundary
//! callers.
//!
//! Each finder targets one natural key, so "reuse an existing row" never
//! depends on scanning.

use crate::model::{EntityId, League, Player, Stadium, Team};
use crate::repo::entity_repo::{CatalogEntity, RepoResult};
use rusqlite::{params, Connection};

pub fn find_league_by_name_country(
    conn: &Connection,
    name: &str,
    country: &str,
) -> RepoResult<Option<League>> {
    let sql = format!(
        "{} WHERE name = ?1 AND country = ?2;",
        <League as CatalogEntity>::SELECT_SQL
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![name, country])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(League::from_row(row)?));
    }
    Ok(None)
}

pub fn find_team_in_league(
    conn: &Connection,
    name: &str,
    league_id: EntityId,
) -> RepoResult<Option<Team>> {
    let sql = format!(
        "{} WHERE name = ?1 AND league_id = ?2;",
        <Team as CatalogEntity>::SELECT_SQL
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![name, league_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Team::from_row(row)?));
    }
    Ok(None)
}

pub fn find_stadium_by_name_address(
    conn: &Connection,
    name: &str,
    address: &str,
) -> RepoResult<Option<Stadium>> {
    let sql = format!(
        "{} WHERE name = ?1 AND address = ?2;",
        <Stadium as CatalogEntity>::SELECT_SQL
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![name, address])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Stadium::from_row(row)?));
    }
    Ok(None)
}

/// Returns every player of one team in deterministic `name, id` order.
pub fn players_of_team(conn: &Connection, team_id: EntityId) -> RepoResult<Vec<Player>> {
    let sql = format!(
        "{} WHERE team_id = ?1 ORDER BY name ASC, id ASC;",
        <Player as CatalogEntity>::SELECT_SQL
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([team_id.to_string()])?;
    let mut players = Vec::new();
    while let Some(row) = rows.next()? {
        players.push(Player::from_row(row)?);
    }
    Ok(players)
}
