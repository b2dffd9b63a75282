//! Core domain logic for the squadbase sports catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{EntityId, League, Payload, Player, Stadium, Team, ValidationError};
pub use provider::{
    ApiFootballProvider, FootballProvider, LeagueData, ProviderError, ProviderResult,
    RosterPlayer, TeamData, VenueData,
};
pub use repo::cleanup::{remove_if_orphaned, OrphanCandidate, ParentKind};
pub use repo::entity_repo::{
    CatalogEntity, CatalogRepository, RepoError, RepoResult, SqliteCatalogRepository,
};
pub use service::ingest_service::{IngestError, IngestRequest, IngestService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
