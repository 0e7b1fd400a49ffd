//! Raw entity records as delivered by a decoder.
//!
//! Every field of a [`RawEntity`] is optional. A missing mandatory field
//! surfaces from [`RawEntity::normalize`] as a
//! [`TypeError::MalformedRecord`] naming the field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::kind::{EntityId, EntityKind};
use crate::record::{EntityRecord, Member, Point, Polyline, Provenance, Relation, Tags};

/// An unvalidated entity record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changeset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<EntityId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
}

impl RawEntity {
    /// An empty raw record of the given kind. Every field is absent.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            id: None,
            version: None,
            timestamp: None,
            uid: None,
            user: None,
            changeset: None,
            tags: None,
            lat: None,
            lon: None,
            nodes: None,
            members: None,
        }
    }

    /// Normalize into an [`EntityRecord`], validating mandatory fields.
    ///
    /// Mandatory for every kind: `id` and `tags`. Points additionally need
    /// finite `lat`/`lon`, polylines need `nodes`, relations need `members`.
    /// A missing `version` normalizes to revision 0.
    pub fn normalize(self) -> TypeResult<EntityRecord> {
        let kind = self.kind;
        let malformed = |id: Option<EntityId>, reason: &str| TypeError::MalformedRecord {
            kind,
            id,
            reason: reason.to_string(),
        };

        let id = self.id.ok_or_else(|| malformed(None, "missing id"))?;
        let tags = self.tags.ok_or_else(|| malformed(Some(id), "missing tags"))?;
        let provenance = Provenance {
            revision: self.version.unwrap_or(0),
            modified_at: self.timestamp,
            author_id: self.uid,
            author_name: self.user,
            change_group_id: self.changeset,
        };

        let record = match kind {
            EntityKind::Point => {
                let (lat, lon) = match (self.lat, self.lon) {
                    (Some(lat), Some(lon)) => (lat, lon),
                    _ => return Err(malformed(Some(id), "missing coordinates")),
                };
                if !lat.is_finite() || !lon.is_finite() {
                    return Err(malformed(Some(id), "non-finite coordinates"));
                }
                EntityRecord::Point(Point {
                    id,
                    tags,
                    lat,
                    lon,
                    provenance,
                })
            }
            EntityKind::Polyline => EntityRecord::Polyline(Polyline {
                id,
                tags,
                point_refs: self
                    .nodes
                    .ok_or_else(|| malformed(Some(id), "missing point references"))?,
                provenance,
            }),
            EntityKind::Relation => EntityRecord::Relation(Relation {
                id,
                tags,
                members: self
                    .members
                    .ok_or_else(|| malformed(Some(id), "missing members"))?,
                provenance,
            }),
        };
        Ok(record)
    }
}

impl TryFrom<RawEntity> for EntityRecord {
    type Error = TypeError;

    fn try_from(raw: RawEntity) -> TypeResult<Self> {
        raw.normalize()
    }
}

impl From<&EntityRecord> for RawEntity {
    fn from(record: &EntityRecord) -> Self {
        let provenance = record.provenance();
        let mut raw = RawEntity::new(record.kind());
        raw.id = Some(record.id());
        raw.version = Some(provenance.revision);
        raw.timestamp = provenance.modified_at;
        raw.uid = provenance.author_id;
        raw.user = provenance.author_name.clone();
        raw.changeset = provenance.change_group_id;
        raw.tags = Some(record.tags().clone());
        match record {
            EntityRecord::Point(p) => {
                raw.lat = Some(p.lat);
                raw.lon = Some(p.lon);
            }
            EntityRecord::Polyline(w) => raw.nodes = Some(w.point_refs.clone()),
            EntityRecord::Relation(r) => raw.members = Some(r.members.clone()),
        }
        raw
    }
}
