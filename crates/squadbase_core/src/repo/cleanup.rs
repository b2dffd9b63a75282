//! Cascade cleanup of orphaned parent rows.
//!
//! # Responsibility
//! - Remove a league/stadium once no team references it.
//!
//! # Invariants
//! - The reference check and the delete are one conditional statement, so
//!   a concurrent team creation can never slip between them.
//! - Callers run this on the same transaction that deleted the
//!   referencing team.

use crate::model::EntityId;
use crate::repo::entity_repo::RepoResult;
use log::info;
use rusqlite::Connection;

/// Parent tables subject to orphan cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    League,
    Stadium,
}

impl ParentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::League => "league",
            Self::Stadium => "stadium",
        }
    }
}

/// A possibly-absent parent reference left behind by a deleted team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrphanCandidate {
    pub parent: ParentKind,
    pub id: Option<EntityId>,
}

const LEAGUE_ORPHAN_DELETE_SQL: &str = "DELETE FROM leagues
     WHERE id = ?1
       AND NOT EXISTS (SELECT 1 FROM teams WHERE teams.league_id = ?1);";

const STADIUM_ORPHAN_DELETE_SQL: &str = "DELETE FROM stadiums
     WHERE id = ?1
       AND NOT EXISTS (SELECT 1 FROM teams WHERE teams.stadium_id = ?1);";

/// Deletes the candidate parent when no team references it any more.
///
/// A `None` id is a no-op. Returns whether a row was removed.
pub fn remove_if_orphaned(conn: &Connection, candidate: &OrphanCandidate) -> RepoResult<bool> {
    let Some(id) = candidate.id else {
        return Ok(false);
    };

    let sql = match candidate.parent {
        ParentKind::League => LEAGUE_ORPHAN_DELETE_SQL,
        ParentKind::Stadium => STADIUM_ORPHAN_DELETE_SQL,
    };
    let removed = conn.execute(sql, [id.to_string()])?;
    if removed > 0 {
        info!(
            "event=cascade_cleanup module=repo parent={} status=removed id={id}",
            candidate.parent.as_str()
        );
    }
    Ok(removed > 0)
}
