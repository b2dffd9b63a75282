//! Generic catalog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete once, parameterized over an
//!   entity descriptor, instead of four hand-duplicated modules.
//! - Fold store-level constraint failures into the repository error
//!   taxonomy so callers never see raw SQL errors.
//!
//! # Invariants
//! - `create`/`update` make no change when the payload is rejected.
//! - `update` never changes identity fields and serializes its
//!   read-merge-write against concurrent writers.
//! - `delete` runs the row removal and any cascade cleanup in the same
//!   transaction.

use crate::db::DbError;
use crate::model::payload::require_id;
use crate::model::{EntityId, Payload, ValidationError};
use crate::repo::cleanup::{self, OrphanCandidate};
use log::{debug, info};
use rusqlite::types::Value as SqlValue;
use rusqlite::{ffi, params_from_iter, Connection, ErrorCode, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error taxonomy shared by all catalog entities.
#[derive(Debug)]
pub enum RepoError {
    /// Payload/model rejection detected before any SQL ran.
    Validation(ValidationError),
    /// Store-reported CHECK/foreign-key/not-null violation.
    Constraint(String),
    /// Uniqueness collision or a concurrent writer holding the store.
    Conflict(String),
    NotFound(EntityId),
    /// Persisted state failed decoding or validation on read.
    InvalidData(String),
    Db(DbError),
}

impl RepoError {
    /// True for failures a boundary caller should answer as "bad request"
    /// rather than "not found" or a server-side fault.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Constraint(_) | Self::Conflict(_)
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Constraint(message) => write!(f, "constraint violated: {message}"),
            Self::Conflict(message) => write!(f, "conflicting write: {message}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        map_sqlite_error(value)
    }
}

/// Entity descriptor: the per-table facts the generic repository needs.
///
/// `bind_values` must produce values in the positional order shared by
/// `INSERT_SQL` and `UPDATE_SQL`, with the id at position 1.
pub trait CatalogEntity: Sized {
    /// Lowercase singular name used in diagnostics.
    const KIND: &'static str;
    const TABLE: &'static str;
    const SELECT_SQL: &'static str;
    const INSERT_SQL: &'static str;
    const UPDATE_SQL: &'static str;

    fn id(&self) -> EntityId;
    fn from_payload(payload: &Payload) -> Result<Self, ValidationError>;
    fn apply_payload(&mut self, payload: &Payload) -> Result<(), ValidationError>;
    fn validate(&self) -> Result<(), ValidationError>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
    fn bind_values(&self) -> Vec<SqlValue>;

    /// Parents to re-check for orphanhood after this record is deleted.
    fn orphan_candidates(&self) -> Vec<OrphanCandidate> {
        Vec::new()
    }
}

/// Repository interface for catalog CRUD operations.
pub trait CatalogRepository<E: CatalogEntity> {
    /// Creates one record from a field map and returns its id.
    fn create(&self, payload: &Payload) -> RepoResult<EntityId>;
    /// Inserts an already-typed record (ingestion path).
    fn insert_record(&self, record: &E) -> RepoResult<EntityId>;
    fn get(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// Returns every row in deterministic `name, id` order.
    fn list(&self) -> RepoResult<Vec<E>>;
    /// Applies a partial field map carrying `id`; returns the id back.
    fn update(&mut self, payload: &Payload) -> RepoResult<EntityId>;
    fn delete(&mut self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed generic catalog repository.
pub struct SqliteCatalogRepository<'conn, E: CatalogEntity> {
    conn: &'conn mut Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: CatalogEntity> SqliteCatalogRepository<'conn, E> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }
}

impl<E: CatalogEntity> CatalogRepository<E> for SqliteCatalogRepository<'_, E> {
    fn create(&self, payload: &Payload) -> RepoResult<EntityId> {
        let record = E::from_payload(payload)?;
        self.insert_record(&record)
    }

    fn insert_record(&self, record: &E) -> RepoResult<EntityId> {
        insert_row(self.conn, record)
    }

    fn get(&self, id: EntityId) -> RepoResult<Option<E>> {
        fetch_by_id(self.conn, id)
    }

    fn list(&self) -> RepoResult<Vec<E>> {
        let sql = format!("{} ORDER BY name ASC, id ASC;", E::SELECT_SQL);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(E::from_row(row)?);
        }
        Ok(records)
    }

    fn update(&mut self, payload: &Payload) -> RepoResult<EntityId> {
        let id = require_id(payload, "id")?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut record: E = match fetch_by_id(&tx, id)? {
            Some(record) => record,
            None => return Err(RepoError::NotFound(id)),
        };
        record.apply_payload(payload)?;
        record.validate()?;

        tx.execute(E::UPDATE_SQL, params_from_iter(record.bind_values()))?;
        tx.commit()?;
        debug!("event=entity_update module=repo kind={} id={id}", E::KIND);
        Ok(id)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let record: E = match fetch_by_id(&tx, id)? {
            Some(record) => record,
            None => return Err(RepoError::NotFound(id)),
        };

        let delete_sql = format!("DELETE FROM {} WHERE id = ?1;", E::TABLE);
        tx.execute(&delete_sql, [id.to_string()])?;

        // The orphan check must see the row already gone and must commit
        // atomically with it.
        for candidate in record.orphan_candidates() {
            cleanup::remove_if_orphaned(&tx, &candidate)?;
        }

        tx.commit()?;
        info!("event=entity_delete module=repo kind={} id={id}", E::KIND);
        Ok(())
    }
}

pub(crate) fn insert_row<E: CatalogEntity>(conn: &Connection, record: &E) -> RepoResult<EntityId> {
    record.validate()?;
    conn.execute(E::INSERT_SQL, params_from_iter(record.bind_values()))?;
    debug!(
        "event=entity_insert module=repo kind={} id={}",
        E::KIND,
        record.id()
    );
    Ok(record.id())
}

pub(crate) fn fetch_by_id<E: CatalogEntity>(
    conn: &Connection,
    id: EntityId,
) -> RepoResult<Option<E>> {
    let sql = format!("{} WHERE id = ?1;", E::SELECT_SQL);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(E::from_row(row)?));
    }
    Ok(None)
}

pub(crate) fn parse_id(value: &str, column: &str) -> RepoResult<EntityId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn map_sqlite_error(err: rusqlite::Error) -> RepoError {
    let classified = match &err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            let detail = message.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Some(RepoError::Conflict(detail))
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                | ffi::SQLITE_CONSTRAINT_CHECK
                | ffi::SQLITE_CONSTRAINT_NOTNULL => Some(RepoError::Constraint(detail)),
                _ if matches!(
                    failure.code,
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
                ) =>
                {
                    Some(RepoError::Conflict(detail))
                }
                _ => None,
            }
        }
        _ => None,
    };
    classified.unwrap_or_else(|| RepoError::Db(DbError::Sqlite(err)))
}
