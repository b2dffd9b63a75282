use rusqlite::Connection;
use serde_json::json;
use squadbase_core::db::open_db_in_memory;
use squadbase_core::repo::lookup::players_of_team;
use squadbase_core::{
    CatalogRepository, EntityId, League, Payload, Player, RepoError, SqliteCatalogRepository,
    Stadium, Team,
};

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().expect("object literal").clone()
}

fn create<E: squadbase_core::CatalogEntity>(
    conn: &mut Connection,
    body: serde_json::Value,
) -> EntityId {
    SqliteCatalogRepository::<E>::new(conn)
        .create(&payload(body))
        .expect("record should create")
}

fn league_exists(conn: &mut Connection, id: EntityId) -> bool {
    SqliteCatalogRepository::<League>::new(conn)
        .get(id)
        .unwrap()
        .is_some()
}

fn stadium_exists(conn: &mut Connection, id: EntityId) -> bool {
    SqliteCatalogRepository::<Stadium>::new(conn)
        .get(id)
        .unwrap()
        .is_some()
}

#[test]
fn deleting_the_only_team_removes_orphaned_parents() {
    let mut conn = open_db_in_memory().unwrap();
    let league_id = create::<League>(&mut conn, json!({"name": "Abc", "country": "Xyz"}));
    let stadium_id = create::<Stadium>(
        &mut conn,
        json!({"name": "Arena", "address": "Main Street 1", "city": "Xyz"}),
    );
    let team_id = create::<Team>(
        &mut conn,
        json!({
            "name": "T1",
            "founded": 2000,
            "league_id": league_id.to_string(),
            "stadium_id": stadium_id.to_string()
        }),
    );

    SqliteCatalogRepository::<Team>::new(&mut conn)
        .delete(team_id)
        .unwrap();

    assert!(!league_exists(&mut conn, league_id));
    assert!(!stadium_exists(&mut conn, stadium_id));
}

#[test]
fn league_survives_until_its_last_team_is_gone() {
    let mut conn = open_db_in_memory().unwrap();
    let league_id = create::<League>(&mut conn, json!({"name": "Abc", "country": "Xyz"}));
    let t1 = create::<Team>(
        &mut conn,
        json!({"name": "T1", "founded": 2000, "league_id": league_id.to_string()}),
    );
    let t2 = create::<Team>(
        &mut conn,
        json!({"name": "T2", "founded": 2000, "league_id": league_id.to_string()}),
    );

    SqliteCatalogRepository::<Team>::new(&mut conn)
        .delete(t1)
        .unwrap();
    assert!(league_exists(&mut conn, league_id));

    SqliteCatalogRepository::<Team>::new(&mut conn)
        .delete(t2)
        .unwrap();
    assert!(!league_exists(&mut conn, league_id));
}

#[test]
fn shared_stadium_is_kept_while_another_team_references_it() {
    let mut conn = open_db_in_memory().unwrap();
    let stadium_id = create::<Stadium>(
        &mut conn,
        json!({"name": "Arena", "address": "Main Street 1", "city": "Xyz"}),
    );
    let t1 = create::<Team>(
        &mut conn,
        json!({"name": "T1", "founded": 2000, "stadium_id": stadium_id.to_string()}),
    );
    create::<Team>(
        &mut conn,
        json!({"name": "T2", "founded": 2001, "stadium_id": stadium_id.to_string()}),
    );

    SqliteCatalogRepository::<Team>::new(&mut conn)
        .delete(t1)
        .unwrap();
    assert!(stadium_exists(&mut conn, stadium_id));
}

#[test]
fn team_delete_cascades_its_players() {
    let mut conn = open_db_in_memory().unwrap();
    let team_id = create::<Team>(&mut conn, json!({"name": "T1", "founded": 2000}));
    create::<Player>(
        &mut conn,
        json!({"name": "Kai", "team_id": team_id.to_string()}),
    );
    create::<Player>(
        &mut conn,
        json!({"name": "Ben", "team_id": team_id.to_string()}),
    );
    assert_eq!(players_of_team(&conn, team_id).unwrap().len(), 2);

    SqliteCatalogRepository::<Team>::new(&mut conn)
        .delete(team_id)
        .unwrap();

    assert!(players_of_team(&conn, team_id).unwrap().is_empty());
    assert!(SqliteCatalogRepository::<Player>::new(&mut conn)
        .list()
        .unwrap()
        .is_empty());
}

#[test]
fn deleting_a_league_with_teams_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let league_id = create::<League>(&mut conn, json!({"name": "Abc", "country": "Xyz"}));
    create::<Team>(
        &mut conn,
        json!({"name": "T1", "founded": 2000, "league_id": league_id.to_string()}),
    );

    let err = SqliteCatalogRepository::<League>::new(&mut conn)
        .delete(league_id)
        .unwrap_err();
    assert!(matches!(err, RepoError::Constraint(_)));
    assert!(league_exists(&mut conn, league_id));
}

#[test]
fn deleting_an_unreferenced_parent_directly_works() {
    let mut conn = open_db_in_memory().unwrap();
    let stadium_id = create::<Stadium>(
        &mut conn,
        json!({"name": "Arena", "address": "Main Street 1", "city": "Xyz"}),
    );

    SqliteCatalogRepository::<Stadium>::new(&mut conn)
        .delete(stadium_id)
        .unwrap();
    assert!(!stadium_exists(&mut conn, stadium_id));
}

#[test]
fn team_without_parent_references_deletes_cleanly() {
    let mut conn = open_db_in_memory().unwrap();
    let team_id = create::<Team>(&mut conn, json!({"name": "T1", "founded": 2000}));

    SqliteCatalogRepository::<Team>::new(&mut conn)
        .delete(team_id)
        .unwrap();
    assert!(SqliteCatalogRepository::<Team>::new(&mut conn)
        .get(team_id)
        .unwrap()
        .is_none());
}
