//! Entity kinds that can receive performers.
//!
//! # Invariants
//! - `DESCRIPTORS[kind as usize].kind == kind` for every kind.
//! - Only knots carry a nested child section (their cross-connects).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Database identifier of a knot, cross, om, dboard, focable or project.
pub type EntityId = i64;

/// Network entity kinds that own performer assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Connection knot (communication node).
    Knot,
    /// Cross-connect nested inside a knot.
    Cross,
    /// Optical splice closure.
    Om,
    /// Distribution board (cabinet).
    Dboard,
    /// Fiber-optic cable.
    Focable,
}

/// Nested section an entity update may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSection {
    /// Request/response key of the nested section.
    pub field: &'static str,
    /// Kind of the entities listed in the nested section.
    pub kind: EntityKind,
}

/// Per-kind naming table shared by request handling, storage and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    /// Top-level request key; `None` for kinds reachable only through nesting.
    pub section_key: Option<&'static str>,
    /// Key of the block holding the `create` list.
    pub create_field: &'static str,
    /// Column and JSON field carrying the owning entity id.
    pub owner_field: &'static str,
    pub entity_table: &'static str,
    pub performer_table: &'static str,
    pub child: Option<ChildSection>,
}

const DESCRIPTORS: [EntityDescriptor; 5] = [
    EntityDescriptor {
        kind: EntityKind::Knot,
        section_key: Some("aor_knots"),
        create_field: "cupboard_users",
        owner_field: "project_knot_id",
        entity_table: "project_knots",
        performer_table: "knot_performers",
        child: Some(ChildSection {
            field: "passive_optical_equipments",
            kind: EntityKind::Cross,
        }),
    },
    EntityDescriptor {
        kind: EntityKind::Cross,
        section_key: None,
        create_field: "performers",
        owner_field: "project_knot_cross_id",
        entity_table: "project_knot_crosses",
        performer_table: "cross_performers",
        child: None,
    },
    EntityDescriptor {
        kind: EntityKind::Om,
        section_key: Some("aor_oms"),
        create_field: "performers",
        owner_field: "aop_om_id",
        entity_table: "aop_oms",
        performer_table: "om_performers",
        child: None,
    },
    EntityDescriptor {
        kind: EntityKind::Dboard,
        section_key: Some("aor_dboards"),
        create_field: "performers",
        owner_field: "aop_dboard_id",
        entity_table: "aop_dboards",
        performer_table: "dboard_performers",
        child: None,
    },
    EntityDescriptor {
        kind: EntityKind::Focable,
        section_key: Some("aor_focables"),
        create_field: "performers",
        owner_field: "aop_focable_id",
        entity_table: "aop_focables",
        performer_table: "focable_performers",
        child: None,
    },
];

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Knot,
        EntityKind::Cross,
        EntityKind::Om,
        EntityKind::Dboard,
        EntityKind::Focable,
    ];

    /// Returns the naming row for this kind.
    pub fn descriptor(self) -> &'static EntityDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Knot => "knot",
            Self::Cross => "cross",
            Self::Om => "om",
            Self::Dboard => "dboard",
            Self::Focable => "focable",
        }
    }

    /// Parses the lowercase name produced by `as_str`.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, DESCRIPTORS};

    #[test]
    fn descriptor_rows_line_up_with_kinds() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.descriptor().kind, kind);
        }
        assert_eq!(DESCRIPTORS.len(), EntityKind::ALL.len());
    }

    #[test]
    fn only_knots_have_a_child_section() {
        let with_child: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|kind| kind.descriptor().child.is_some())
            .collect();
        assert_eq!(with_child, vec![EntityKind::Knot]);

        let child = EntityKind::Knot.descriptor().child.unwrap();
        assert_eq!(child.kind, EntityKind::Cross);
        assert_eq!(child.field, "passive_optical_equipments");
    }

    #[test]
    fn knots_use_cupboard_users_and_others_use_performers() {
        assert_eq!(EntityKind::Knot.descriptor().create_field, "cupboard_users");
        for kind in [
            EntityKind::Cross,
            EntityKind::Om,
            EntityKind::Dboard,
            EntityKind::Focable,
        ] {
            assert_eq!(kind.descriptor().create_field, "performers");
        }
    }

    #[test]
    fn parse_accepts_display_names() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(&kind.to_string()), Some(kind));
        }
        assert_eq!(EntityKind::parse(" DBOARD "), Some(EntityKind::Dboard));
        assert_eq!(EntityKind::parse("cupboard"), None);
    }
}
