use serde::{Deserialize, Serialize};

/// Stable identifier of an entity, unique per kind within one snapshot.
pub type EntityId = u64;

/// The kind of a map entity.
///
/// The declaration order is the canonical output order: points, then
/// polylines, then relations. `Ord` follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// A single coordinate with tags.
    #[serde(rename = "node")]
    Point,
    /// An ordered sequence of point references.
    #[serde(rename = "way")]
    Polyline,
    /// An ordered sequence of typed, role-annotated members.
    #[serde(rename = "relation")]
    Relation,
}

impl EntityKind {
    /// All kinds, in canonical output order.
    pub const ALL: [EntityKind; 3] = [Self::Point, Self::Polyline, Self::Relation];

    /// Element name used in serialized documents and record streams.
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Point => "node",
            Self::Polyline => "way",
            Self::Relation => "relation",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.element_name())
    }
}
