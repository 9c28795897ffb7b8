//! Outcome tree assembled while walking a planning update.
//!
//! Each handler returns its own outcome and the caller merges it into its
//! parent, so the tree mirrors the request:
//!
//! ```text
//! { "update": { "<create_field>": { "create": [Performer..] },
//!               "passive_optical_equipments": { "update": {..} } } }
//! ```

use crate::model::entity::EntityKind;
use crate::model::performer::Performer;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Result of one section handler (`{ "update"?: .. }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateOutcome>,
}

impl SectionOutcome {
    /// Merges a later outcome of the same section into this one.
    pub fn merge(&mut self, other: SectionOutcome) {
        if let Some(next) = other.update {
            match &mut self.update {
                Some(current) => current.merge(next),
                None => self.update = Some(next),
            }
        }
    }

    /// Performers created directly by this section's `update` list.
    pub fn created(&self) -> &[Performer] {
        self.update
            .as_ref()
            .map(UpdateOutcome::created)
            .unwrap_or(&[])
    }

    /// Total performers created by this section, nested sections included.
    pub fn created_count(&self) -> usize {
        self.update.as_ref().map_or(0, UpdateOutcome::created_count)
    }
}

/// Result of one performer handler over an `update` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub kind: EntityKind,
    /// `Some` once any entry carried a create list, even an empty one.
    pub created: Option<Vec<Performer>>,
    /// Nested section outcome; only knots produce one.
    pub children: Option<Box<SectionOutcome>>,
}

impl UpdateOutcome {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            created: None,
            children: None,
        }
    }

    /// Returns whether no entry contributed anything.
    pub fn is_empty(&self) -> bool {
        self.created.is_none() && self.children.is_none()
    }

    pub fn created(&self) -> &[Performer] {
        self.created.as_deref().unwrap_or(&[])
    }

    pub fn children(&self) -> Option<&SectionOutcome> {
        self.children.as_deref()
    }

    pub fn created_count(&self) -> usize {
        self.created().len() + self.children().map_or(0, SectionOutcome::created_count)
    }

    /// Appends performers created for one entry, keeping input order.
    pub fn push_created(&mut self, performers: Vec<Performer>) {
        self.created.get_or_insert_with(Vec::new).extend(performers);
    }

    /// Merges the nested section outcome of one entry.
    pub fn push_children(&mut self, section: SectionOutcome) {
        match &mut self.children {
            Some(children) => children.merge(section),
            None => self.children = Some(Box::new(section)),
        }
    }

    pub fn merge(&mut self, other: UpdateOutcome) {
        if let Some(created) = other.created {
            self.push_created(created);
        }
        if let Some(children) = other.children {
            self.push_children(*children);
        }
    }
}

#[derive(Serialize)]
struct CreateOutcome<'a> {
    create: &'a [Performer],
}

impl Serialize for UpdateOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let descriptor = self.kind.descriptor();
        let mut map = serializer.serialize_map(None)?;
        if let Some(created) = &self.created {
            map.serialize_entry(descriptor.create_field, &CreateOutcome { create: created })?;
        }
        if let (Some(children), Some(child)) = (&self.children, descriptor.child) {
            map.serialize_entry(child.field, children)?;
        }
        map.end()
    }
}

/// Per-section results of one update request, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerformersBySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aor_knots: Option<SectionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aor_oms: Option<SectionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aor_dboards: Option<SectionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aor_focables: Option<SectionOutcome>,
}

impl PerformersBySection {
    pub fn is_empty(&self) -> bool {
        self.aor_knots.is_none()
            && self.aor_oms.is_none()
            && self.aor_dboards.is_none()
            && self.aor_focables.is_none()
    }

    pub fn created_count(&self) -> usize {
        [
            &self.aor_knots,
            &self.aor_oms,
            &self.aor_dboards,
            &self.aor_focables,
        ]
        .into_iter()
        .flatten()
        .map(SectionOutcome::created_count)
        .sum()
    }
}

/// Success envelope of a planning update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningResponse {
    pub status: &'static str,
    pub performers: PerformersBySection,
}

impl PlanningResponse {
    /// HTTP status the outer layer answers a successful update with.
    pub const HTTP_STATUS: u16 = 201;

    pub fn success(performers: PerformersBySection) -> Self {
        Self {
            status: "success",
            performers,
        }
    }
}

/// Bare `{status}` envelope used by set-planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const HTTP_STATUS: u16 = 200;

    pub fn success() -> Self {
        Self { status: "success" }
    }
}
