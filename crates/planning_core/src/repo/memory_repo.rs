//! In-memory performer repository.
//!
//! Keeps the generic handlers testable without SQLite and lets callers
//! inject a write failure at a chosen position.

use crate::db::DbError;
use crate::model::entity::{EntityId, EntityKind};
use crate::model::performer::{NewPerformer, Performer};
use crate::repo::performer_repo::{PerformerRepository, RepoError, RepoResult};
use std::cell::{Cell, RefCell};

/// Performer store backed by a `Vec`, ids assigned per kind from 1.
#[derive(Debug, Default)]
pub struct InMemoryPerformerRepository {
    performers: RefCell<Vec<Performer>>,
    insert_calls: Cell<usize>,
    fail_on_call: Option<usize>,
}

impl InMemoryPerformerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `call`-th insert (1-based) and every insert after it.
    pub fn failing_from(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    /// Number of insert attempts, failed ones included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.get()
    }

    /// Snapshot of every stored performer in insertion order.
    pub fn performers(&self) -> Vec<Performer> {
        self.performers.borrow().clone()
    }
}

impl PerformerRepository for InMemoryPerformerRepository {
    fn insert_performer(&self, performer: &NewPerformer) -> RepoResult<Performer> {
        let call = self.insert_calls.get() + 1;
        self.insert_calls.set(call);
        performer.validate()?;

        if self.fail_on_call.is_some_and(|fail_on| call >= fail_on) {
            return Err(RepoError::Db(DbError::Sqlite(
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
                    Some(format!("injected failure on insert {call}")),
                ),
            )));
        }

        let mut performers = self.performers.borrow_mut();
        let next_id = performers
            .iter()
            .filter(|stored| stored.kind == performer.kind)
            .map(|stored| stored.id)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = Performer::from_new(performer, next_id, 0);
        performers.push(stored.clone());
        Ok(stored)
    }

    fn list_performers(
        &self,
        kind: EntityKind,
        owner_id: EntityId,
    ) -> RepoResult<Vec<Performer>> {
        Ok(self
            .performers
            .borrow()
            .iter()
            .filter(|stored| stored.kind == kind && stored.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
