//! Typed planning update request.
//!
//! The validation layer hands over JSON of the shape below; absent keys
//! (or `null`) mean "nothing to do" for that part of the tree.
//!
//! ```text
//! aor_knots?:    { update?: [{ id, cupboard_users?: { create?: [..] },
//!                              passive_optical_equipments?: { update?: [..] } }] }
//! aor_oms?:      { update?: [{ id, performers?: { create?: [{ btu_user_login }] } }] }
//! aor_dboards?:  same as aor_oms
//! aor_focables?: same as aor_oms
//! ```

use crate::model::entity::EntityId;
use serde::Deserialize;

/// Top-level planning update payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanningUpdateRequest {
    pub aor_knots: Option<Section<KnotUpdate>>,
    pub aor_oms: Option<Section<PerformersUpdate>>,
    pub aor_dboards: Option<Section<PerformersUpdate>>,
    pub aor_focables: Option<Section<PerformersUpdate>>,
}

impl PlanningUpdateRequest {
    /// Parses a request from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Per-kind slice of a request holding the `update` action list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section<T> {
    pub update: Option<Vec<T>>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self { update: None }
    }
}

/// Block holding a `create` list of performers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateBlock {
    pub create: Option<Vec<PerformerDescriptor>>,
}

/// One user to assign as performer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PerformerDescriptor {
    pub btu_user_login: String,
}

/// Update entry for a knot; its performers are called `cupboard_users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnotUpdate {
    pub id: EntityId,
    pub cupboard_users: Option<CreateBlock>,
    pub passive_optical_equipments: Option<Section<PerformersUpdate>>,
}

/// Update entry for crosses, oms, dboards and focables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PerformersUpdate {
    pub id: EntityId,
    pub performers: Option<CreateBlock>,
}

/// Read access the generic handlers need from an update entry.
pub trait UpdateEntry {
    fn entity_id(&self) -> EntityId;
    fn create_block(&self) -> Option<&CreateBlock>;

    /// Nested cross section; only knots carry one.
    fn child_section(&self) -> Option<&Section<PerformersUpdate>> {
        None
    }
}

impl UpdateEntry for KnotUpdate {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn create_block(&self) -> Option<&CreateBlock> {
        self.cupboard_users.as_ref()
    }

    fn child_section(&self) -> Option<&Section<PerformersUpdate>> {
        self.passive_optical_equipments.as_ref()
    }
}

impl UpdateEntry for PerformersUpdate {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn create_block(&self) -> Option<&CreateBlock> {
        self.performers.as_ref()
    }
}
