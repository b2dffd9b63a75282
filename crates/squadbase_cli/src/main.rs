//! CLI probe over the catalog repository boundary.
//!
//! # Responsibility
//! - Provide a minimal executable to inspect a catalog database without
//!   the HTTP layer.
//! - Keep output deterministic (one JSON record per line, repository
//!   ordering).

use rusqlite::Connection;
use serde::Serialize;
use squadbase_core::db::open_db;
use squadbase_core::{
    CatalogEntity, CatalogRepository, League, Player, SqliteCatalogRepository, Stadium, Team,
};

fn main() {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(|| "squadbase.db".to_string());
    let entity = args.next().unwrap_or_else(|| "teams".to_string());

    let mut conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            std::process::exit(1);
        }
    };

    let listing = match entity.as_str() {
        "leagues" => list::<League>(&mut conn),
        "teams" => list::<Team>(&mut conn),
        "stadiums" => list::<Stadium>(&mut conn),
        "players" => list::<Player>(&mut conn),
        other => {
            eprintln!("unknown entity `{other}`; expected leagues|teams|stadiums|players");
            std::process::exit(2);
        }
    };

    match listing {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn list<E: CatalogEntity + Serialize>(
    conn: &mut Connection,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let repo = SqliteCatalogRepository::<E>::new(conn);
    let mut lines = Vec::new();
    for record in repo.list()? {
        lines.push(serde_json::to_string(&record)?);
    }
    Ok(lines)
}
