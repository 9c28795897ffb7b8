//! Performer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert one performer row per call and hand back the stored record.
//! - List performers of one owning entity in insertion order.
//!
//! # Invariants
//! - Each insert is its own statement; batching and transactions belong to
//!   the caller.
//! - Table and column names come from `EntityKind::descriptor`.

use crate::db::DbError;
use crate::model::entity::{EntityId, EntityKind};
use crate::model::performer::{NewPerformer, Performer, PerformerValidationError};
use crate::repo::schema::ensure_table_ready;
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by performer and project persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(PerformerValidationError),
    Db(DbError),
    /// Target row does not exist (or is not visible to the caller).
    NotFound(EntityId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "planning repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "planning repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "planning repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid planning data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<PerformerValidationError> for RepoError {
    fn from(value: PerformerValidationError) -> Self {
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
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage capability the performer handlers are written against.
pub trait PerformerRepository {
    /// Persists one performer and returns it with its assigned identity.
    fn insert_performer(&self, performer: &NewPerformer) -> RepoResult<Performer>;
    /// Lists performers of one owning entity, oldest first.
    fn list_performers(&self, kind: EntityKind, owner_id: EntityId)
        -> RepoResult<Vec<Performer>>;
}

impl<R: PerformerRepository + ?Sized> PerformerRepository for &R {
    fn insert_performer(&self, performer: &NewPerformer) -> RepoResult<Performer> {
        (**self).insert_performer(performer)
    }

    fn list_performers(
        &self,
        kind: EntityKind,
        owner_id: EntityId,
    ) -> RepoResult<Vec<Performer>> {
        (**self).list_performers(kind, owner_id)
    }
}

/// SQLite-backed performer repository.
pub struct SqlitePerformerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePerformerRepository<'conn> {
    /// Creates repository from a migrated connection.
    ///
    /// Works with a `rusqlite::Transaction` too, through deref.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for kind in EntityKind::ALL {
            let descriptor = kind.descriptor();
            ensure_table_ready(
                conn,
                descriptor.performer_table,
                &["id", descriptor.owner_field, "btu_user_login", "created_at"],
            )?;
        }
        Ok(Self { conn })
    }
}

impl PerformerRepository for SqlitePerformerRepository<'_> {
    fn insert_performer(&self, performer: &NewPerformer) -> RepoResult<Performer> {
        performer.validate()?;

        let descriptor = performer.kind.descriptor();
        self.conn
            .prepare_cached(&format!(
                "INSERT INTO {table} ({owner}, btu_user_login) VALUES (?1, ?2);",
                table = descriptor.performer_table,
                owner = descriptor.owner_field,
            ))?
            .execute(params![performer.owner_id, performer.btu_user_login.as_str()])?;

        let id = self.conn.last_insert_rowid();
        let created_at: i64 = self.conn.query_row(
            &format!(
                "SELECT created_at FROM {table} WHERE id = ?1;",
                table = descriptor.performer_table,
            ),
            [id],
            |row| row.get(0),
        )?;

        debug!(
            "event=performer_insert module=repo status=ok kind={} owner_id={} performer_id={}",
            performer.kind, performer.owner_id, id
        );
        Ok(Performer::from_new(performer, id, created_at))
    }

    fn list_performers(
        &self,
        kind: EntityKind,
        owner_id: EntityId,
    ) -> RepoResult<Vec<Performer>> {
        let descriptor = kind.descriptor();
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT id, {owner} AS owner_id, btu_user_login, created_at
             FROM {table}
             WHERE {owner} = ?1
             ORDER BY id ASC;",
            table = descriptor.performer_table,
            owner = descriptor.owner_field,
        ))?;

        let mut rows = stmt.query([owner_id])?;
        let mut performers = Vec::new();
        while let Some(row) = rows.next()? {
            performers.push(parse_performer_row(kind, row)?);
        }
        Ok(performers)
    }
}

fn parse_performer_row(kind: EntityKind, row: &Row<'_>) -> RepoResult<Performer> {
    let btu_user_login: String = row.get("btu_user_login")?;
    if btu_user_login.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank btu_user_login in {}",
            kind.descriptor().performer_table
        )));
    }

    Ok(Performer {
        id: row.get("id")?,
        kind,
        owner_id: row.get("owner_id")?,
        btu_user_login,
        created_at: row.get("created_at")?,
    })
}
