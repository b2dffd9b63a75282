use rusqlite::Connection;
use serde_json::json;
use squadbase_core::db::open_db_in_memory;
use squadbase_core::repo::lookup::players_of_team;
use squadbase_core::{
    CatalogRepository, FootballProvider, IngestError, IngestRequest, IngestService, League,
    LeagueData, Payload, ProviderError, ProviderResult, RepoError, RosterPlayer,
    SqliteCatalogRepository, Stadium, Team, TeamData, ValidationError, VenueData,
};
use std::cell::Cell;

#[derive(Default)]
struct FakeProvider {
    league: Option<LeagueData>,
    team: Option<TeamData>,
    roster: Vec<RosterPlayer>,
    team_failure_status: Option<u16>,
    league_calls: Cell<u32>,
    team_calls: Cell<u32>,
    roster_calls: Cell<u32>,
}

impl FootballProvider for &FakeProvider {
    fn fetch_league(&self, _name: &str, _country: &str) -> ProviderResult<Option<LeagueData>> {
        self.league_calls.set(self.league_calls.get() + 1);
        Ok(self.league.clone())
    }

    fn fetch_team(
        &self,
        name: &str,
        _league_external_id: Option<i64>,
    ) -> ProviderResult<Option<TeamData>> {
        self.team_calls.set(self.team_calls.get() + 1);
        if let Some(status) = self.team_failure_status {
            return Err(ProviderError::Status(status));
        }
        Ok(self.team.clone().filter(|team| team.name == name))
    }

    fn fetch_roster(&self, _team_external_id: i64) -> ProviderResult<Vec<RosterPlayer>> {
        self.roster_calls.set(self.roster_calls.get() + 1);
        Ok(self.roster.clone())
    }
}

fn request() -> IngestRequest {
    IngestRequest {
        team: "Arsenal".to_string(),
        league: "Premier League".to_string(),
        country: "England".to_string(),
    }
}

fn league_data() -> LeagueData {
    LeagueData {
        external_id: 39,
        logo: Some("https://x/39.png".to_string()),
    }
}

fn team_data() -> TeamData {
    TeamData {
        external_id: 42,
        name: "Arsenal".to_string(),
        founded: Some(1886),
        logo: Some("https://x/42.png".to_string()),
        venue: Some(VenueData {
            name: "Emirates Stadium".to_string(),
            address: "Hornsey Rd".to_string(),
            city: "London".to_string(),
            capacity: Some(60_383),
            surface: Some("grass".to_string()),
            image: Some("https://x/v42.png".to_string()),
        }),
    }
}

fn roster(names: &[&str]) -> Vec<RosterPlayer> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| RosterPlayer {
            name: (*name).to_string(),
            age: Some(20 + index as i64),
            number: Some(index as i64 + 1),
            position: Some("Midfielder".to_string()),
            photo: None,
        })
        .collect()
}

fn full_provider() -> FakeProvider {
    FakeProvider {
        league: Some(league_data()),
        team: Some(team_data()),
        roster: roster(&["Kai", "Ben"]),
        ..FakeProvider::default()
    }
}

fn leagues(conn: &mut Connection) -> Vec<League> {
    SqliteCatalogRepository::<League>::new(conn).list().unwrap()
}

fn teams(conn: &mut Connection) -> Vec<Team> {
    SqliteCatalogRepository::<Team>::new(conn).list().unwrap()
}

fn stadiums(conn: &mut Connection) -> Vec<Stadium> {
    SqliteCatalogRepository::<Stadium>::new(conn).list().unwrap()
}

#[test]
fn full_ingest_materializes_the_whole_chain() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = full_provider();

    let team_id = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap()
        .expect("team should be ingested");

    assert_eq!(fake.league_calls.get(), 1);
    assert_eq!(fake.team_calls.get(), 1);
    assert_eq!(fake.roster_calls.get(), 1);

    let league_rows = leagues(&mut conn);
    assert_eq!(league_rows.len(), 1);
    assert_eq!(league_rows[0].api_id, Some(39));
    assert_eq!(league_rows[0].logo.as_deref(), Some("https://x/39.png"));

    let stadium_rows = stadiums(&mut conn);
    assert_eq!(stadium_rows.len(), 1);
    assert_eq!(stadium_rows[0].capacity, Some(60_383));

    let team_rows = teams(&mut conn);
    assert_eq!(team_rows.len(), 1);
    let team = &team_rows[0];
    assert_eq!(team.id, team_id);
    assert_eq!(team.founded, 1886);
    assert_eq!(team.league_id, Some(league_rows[0].id));
    assert_eq!(team.stadium_id, Some(stadium_rows[0].id));

    let players = players_of_team(&conn, team_id).unwrap();
    assert_eq!(players.len(), 2);
    assert!(players.iter().all(|player| player.team_id == team_id));
}

#[test]
fn rerun_returns_same_id_without_provider_calls_or_new_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = full_provider();
    let first = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap()
        .expect("first run should ingest");

    let untouched = full_provider();
    let second = IngestService::new(&mut conn, &untouched)
        .ingest_team(&request())
        .unwrap()
        .expect("second run should resolve");

    assert_eq!(first, second);
    assert_eq!(untouched.league_calls.get(), 0);
    assert_eq!(untouched.team_calls.get(), 0);
    assert_eq!(untouched.roster_calls.get(), 0);
    assert_eq!(players_of_team(&conn, first).unwrap().len(), 2);
    assert_eq!(teams(&mut conn).len(), 1);
}

#[test]
fn raw_create_of_ingested_league_pair_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = full_provider();
    IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap()
        .expect("team should be ingested");

    let body: Payload = json!({"name": "Premier League", "country": "England"})
        .as_object()
        .unwrap()
        .clone();
    let err = SqliteCatalogRepository::<League>::new(&mut conn)
        .create(&body)
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
    assert_eq!(leagues(&mut conn).len(), 1);
}

#[test]
fn existing_league_is_reused_without_a_provider_call() {
    let mut conn = open_db_in_memory().unwrap();
    let body: Payload = json!({"name": "Premier League", "country": "England", "api_id": 39})
        .as_object()
        .unwrap()
        .clone();
    let league_id = SqliteCatalogRepository::<League>::new(&mut conn)
        .create(&body)
        .unwrap();

    let fake = full_provider();
    let team_id = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap()
        .expect("team should be ingested");

    assert_eq!(fake.league_calls.get(), 0);
    assert_eq!(fake.team_calls.get(), 1);
    let team_rows = teams(&mut conn);
    assert_eq!(team_rows[0].id, team_id);
    assert_eq!(team_rows[0].league_id, Some(league_id));
}

#[test]
fn unknown_league_is_not_found_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = FakeProvider {
        team: Some(team_data()),
        ..FakeProvider::default()
    };

    let outcome = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap();

    assert_eq!(outcome, None);
    assert_eq!(fake.league_calls.get(), 1);
    assert_eq!(fake.team_calls.get(), 0);
    assert!(leagues(&mut conn).is_empty());
    assert!(teams(&mut conn).is_empty());
}

#[test]
fn unknown_team_keeps_the_resolved_league_for_retries() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = FakeProvider {
        league: Some(league_data()),
        ..FakeProvider::default()
    };

    let outcome = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap();
    assert_eq!(outcome, None);
    assert_eq!(leagues(&mut conn).len(), 1);
    assert!(teams(&mut conn).is_empty());

    // A retry after the provider learns the team reuses that league row.
    let retry = full_provider();
    let team_id = IngestService::new(&mut conn, &retry)
        .ingest_team(&request())
        .unwrap()
        .expect("retry should ingest");
    assert_eq!(retry.league_calls.get(), 0);
    assert_eq!(leagues(&mut conn).len(), 1);
    assert_eq!(teams(&mut conn)[0].id, team_id);
}

#[test]
fn provider_failure_aborts_the_step_and_keeps_earlier_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = FakeProvider {
        league: Some(league_data()),
        team_failure_status: Some(500),
        ..FakeProvider::default()
    };

    let err = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Provider(ProviderError::Status(500))
    ));

    assert_eq!(leagues(&mut conn).len(), 1);
    assert!(teams(&mut conn).is_empty());
}

#[test]
fn empty_roster_creates_a_team_with_no_players() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = FakeProvider {
        league: Some(league_data()),
        team: Some(team_data()),
        ..FakeProvider::default()
    };

    let team_id = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap()
        .expect("team should be ingested");

    assert!(players_of_team(&conn, team_id).unwrap().is_empty());
}

#[test]
fn missing_venue_creates_a_team_without_a_stadium() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = FakeProvider {
        league: Some(league_data()),
        team: Some(TeamData {
            venue: None,
            ..team_data()
        }),
        ..FakeProvider::default()
    };

    let team_id = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap()
        .expect("team should be ingested");

    assert!(stadiums(&mut conn).is_empty());
    let team_rows = teams(&mut conn);
    assert_eq!(team_rows[0].id, team_id);
    assert_eq!(team_rows[0].stadium_id, None);
}

#[test]
fn missing_founded_year_is_a_rejection_that_keeps_partial_progress() {
    let mut conn = open_db_in_memory().unwrap();
    let fake = FakeProvider {
        league: Some(league_data()),
        team: Some(TeamData {
            founded: None,
            ..team_data()
        }),
        ..FakeProvider::default()
    };

    let err = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Repo(RepoError::Validation(ValidationError::MissingField(
            "founded"
        )))
    ));

    // League and stadium stay as reusable partial progress; no team row.
    assert_eq!(leagues(&mut conn).len(), 1);
    assert_eq!(stadiums(&mut conn).len(), 1);
    assert!(teams(&mut conn).is_empty());
}

#[test]
fn malformed_roster_entry_fails_the_pipeline_but_keeps_committed_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let mut bad_roster = roster(&["Kai"]);
    bad_roster.push(RosterPlayer {
        name: "Ghost".to_string(),
        age: Some(0),
        number: Some(99),
        position: None,
        photo: None,
    });
    let fake = FakeProvider {
        league: Some(league_data()),
        team: Some(team_data()),
        roster: bad_roster,
        ..FakeProvider::default()
    };

    let err = IngestService::new(&mut conn, &fake)
        .ingest_team(&request())
        .unwrap_err();
    assert!(matches!(
        err,
        IngestError::Repo(RepoError::Validation(ValidationError::NotPositive("age")))
    ));

    // At-least-once roster step: the team and the first player survive.
    let team_rows = teams(&mut conn);
    assert_eq!(team_rows.len(), 1);
    let players = players_of_team(&conn, team_rows[0].id).unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Kai");
}
