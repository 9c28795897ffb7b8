//! Performer assignment records.
//!
//! # Responsibility
//! - Describe a performer before and after persistence.
//! - Serialize persisted performers with the owner field of their kind.
//!
//! # Invariants
//! - `id` is assigned by storage, never by callers.
//! - `btu_user_login` is never blank.

use crate::model::entity::{EntityId, EntityKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned performer identifier (unique per performer table).
pub type PerformerId = i64;

/// Validation errors for performers about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerformerValidationError {
    BlankLogin { kind: EntityKind, owner_id: EntityId },
}

impl Display for PerformerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLogin { kind, owner_id } => {
                write!(f, "{kind} performer for owner {owner_id} has a blank btu_user_login")
            }
        }
    }
}

impl Error for PerformerValidationError {}

/// Performer assignment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerformer {
    pub kind: EntityKind,
    pub owner_id: EntityId,
    pub btu_user_login: String,
}

impl NewPerformer {
    pub fn new(kind: EntityKind, owner_id: EntityId, btu_user_login: impl Into<String>) -> Self {
        Self {
            kind,
            owner_id,
            btu_user_login: btu_user_login.into(),
        }
    }

    /// Checks write-time invariants.
    pub fn validate(&self) -> Result<(), PerformerValidationError> {
        if self.btu_user_login.trim().is_empty() {
            return Err(PerformerValidationError::BlankLogin {
                kind: self.kind,
                owner_id: self.owner_id,
            });
        }
        Ok(())
    }
}

/// Persisted performer assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performer {
    pub id: PerformerId,
    pub kind: EntityKind,
    /// Id of the knot/cross/om/dboard/focable this performer belongs to.
    pub owner_id: EntityId,
    pub btu_user_login: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Performer {
    /// Binds storage-assigned fields to a new performer.
    pub fn from_new(new: &NewPerformer, id: PerformerId, created_at: i64) -> Self {
        Self {
            id,
            kind: new.kind,
            owner_id: new.owner_id,
            btu_user_login: new.btu_user_login.clone(),
            created_at,
        }
    }
}

/// Serialized as `{id, <owner_field>, btu_user_login, created_at}`, e.g.
/// `{"id": 3, "aop_om_id": 5, "btu_user_login": "alice", "created_at": ...}`.
impl Serialize for Performer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry(self.kind.descriptor().owner_field, &self.owner_id)?;
        map.serialize_entry("btu_user_login", &self.btu_user_login)?;
        map.serialize_entry("created_at", &self.created_at)?;
        map.end()
    }
}
