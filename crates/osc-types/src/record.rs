//! Comparison-normalized entity records.
//!
//! Each record carries its identity, content, and [`Provenance`]. Content
//! takes part in [`SemanticEq`]; provenance (including the revision) never
//! does.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::{EntityId, EntityKind};

/// Absolute tolerance, in degrees, under which two coordinates are equal.
pub const COORDINATE_TOLERANCE: f64 = 1e-7;

/// Key/value tags. Keys are unique and iterate in ascending order.
pub type Tags = BTreeMap<String, String>;

/// Bookkeeping metadata carried through to output but excluded from equality.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Revision number of the entity.
    pub revision: u32,
    /// When the entity was last modified.
    pub modified_at: Option<DateTime<Utc>>,
    /// Numeric id of the last author.
    pub author_id: Option<u64>,
    /// Display name of the last author.
    pub author_name: Option<String>,
    /// Id of the change group the last edit belonged to.
    pub change_group_id: Option<u64>,
}

impl Provenance {
    /// Provenance with only a revision set.
    pub fn with_revision(revision: u32) -> Self {
        Self {
            revision,
            ..Self::default()
        }
    }
}

/// One member of a relation: a typed reference plus its role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(rename = "ref")]
    pub id: EntityId,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn new(kind: EntityKind, id: EntityId, role: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            role: role.into(),
        }
    }
}

/// A single coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: EntityId,
    pub tags: Tags,
    pub lat: f64,
    pub lon: f64,
    pub provenance: Provenance,
}

/// An ordered chain of point references. Order is significant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polyline {
    pub id: EntityId,
    pub tags: Tags,
    pub point_refs: Vec<EntityId>,
    pub provenance: Provenance,
}

/// An ordered list of members. Order and roles are significant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub id: EntityId,
    pub tags: Tags,
    pub members: Vec<Member>,
    pub provenance: Provenance,
}

/// Semantic equality: content only, provenance excluded.
///
/// Unlike `PartialEq`, which compares every field including provenance.
pub trait SemanticEq {
    fn semantically_eq(&self, other: &Self) -> bool;
}

impl SemanticEq for Point {
    fn semantically_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.tags == other.tags
            && (self.lat - other.lat).abs() <= COORDINATE_TOLERANCE
            && (self.lon - other.lon).abs() <= COORDINATE_TOLERANCE
    }
}

impl SemanticEq for Polyline {
    fn semantically_eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tags == other.tags && self.point_refs == other.point_refs
    }
}

impl SemanticEq for Relation {
    fn semantically_eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tags == other.tags && self.members == other.members
    }
}

/// A normalized entity of any kind.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityRecord {
    Point(Point),
    Polyline(Polyline),
    Relation(Relation),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Point(_) => EntityKind::Point,
            Self::Polyline(_) => EntityKind::Polyline,
            Self::Relation(_) => EntityKind::Relation,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Self::Point(p) => p.id,
            Self::Polyline(w) => w.id,
            Self::Relation(r) => r.id,
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            Self::Point(p) => &p.tags,
            Self::Polyline(w) => &w.tags,
            Self::Relation(r) => &r.tags,
        }
    }

    /// Mutable access to the tags, used by stream rewriters.
    pub fn tags_mut(&mut self) -> &mut Tags {
        match self {
            Self::Point(p) => &mut p.tags,
            Self::Polyline(w) => &mut w.tags,
            Self::Relation(r) => &mut r.tags,
        }
    }

    pub fn provenance(&self) -> &Provenance {
        match self {
            Self::Point(p) => &p.provenance,
            Self::Polyline(w) => &w.provenance,
            Self::Relation(r) => &r.provenance,
        }
    }
}

impl SemanticEq for EntityRecord {
    fn semantically_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Point(a), Self::Point(b)) => a.semantically_eq(b),
            (Self::Polyline(a), Self::Polyline(b)) => a.semantically_eq(b),
            (Self::Relation(a), Self::Relation(b)) => a.semantically_eq(b),
            _ => false,
        }
    }
}

impl From<Point> for EntityRecord {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Polyline> for EntityRecord {
    fn from(w: Polyline) -> Self {
        Self::Polyline(w)
    }
}

impl From<Relation> for EntityRecord {
    fn from(r: Relation) -> Self {
        Self::Relation(r)
    }
}
