//! Partition → document tree.
//!
//! Ordering rules, all fixed:
//! - sections `create`, `modify`, `delete`; a section with no ids for any
//!   kind is omitted
//! - within a section, points, then polylines, then relations, each by
//!   ascending id
//! - entity attributes `id version timestamp uid user changeset`, then
//!   `lat lon` for points; absent optional attributes and an empty `user`
//!   are left out
//! - children: point refs or members in stored order, then tags by key
//!
//! `create` and `modify` draw content from the modified snapshot, `delete`
//! from the original.

use chrono::{DateTime, Utc};
use osc_diff::{ChangeAction, Partition};
use osc_snapshot::EntitySnapshot;
use osc_types::{EntityKind, EntityRecord};
use tracing::debug;

use crate::document::Element;
use crate::error::{ChangesetError, ChangesetResult};

/// Timestamp layout used for every rendered timestamp.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Root element settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Value of the root `generator` attribute.
    pub generator: String,
    /// Value of the root `version` attribute.
    pub version: String,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            generator: "osc-delta".into(),
            version: "0.6".into(),
        }
    }
}

/// Builds changeset document trees.
///
/// Entities without a modification time are stamped with a fallback
/// timestamp fixed when the serializer is created, so every entity in one
/// document gets the same substitute value.
#[derive(Clone, Debug)]
pub struct ChangesetSerializer {
    options: SerializerOptions,
    fallback_timestamp: DateTime<Utc>,
}

impl ChangesetSerializer {
    /// A serializer whose fallback timestamp is the current UTC time.
    pub fn new(options: SerializerOptions) -> Self {
        Self {
            options,
            fallback_timestamp: Utc::now(),
        }
    }

    /// Override the fallback timestamp.
    pub fn with_fallback_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.fallback_timestamp = timestamp;
        self
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Build the document tree for a partition.
    ///
    /// Fails only if the partition names an id missing from the snapshot
    /// its section draws from, which means the partition was not computed
    /// from these snapshots.
    pub fn serialize(
        &self,
        partition: &Partition,
        original: &EntitySnapshot,
        modified: &EntitySnapshot,
    ) -> ChangesetResult<Element> {
        let mut root = Element::new("osmChange")
            .attr("version", &self.options.version)
            .attr("generator", &self.options.generator);

        for action in ChangeAction::ALL {
            if partition.is_action_empty(action) {
                continue;
            }
            let source = match action {
                ChangeAction::Create | ChangeAction::Modify => modified,
                ChangeAction::Delete => original,
            };
            let mut section = Element::new(action.section_name());
            for kind in EntityKind::ALL {
                for &id in partition.kind(kind).ids(action) {
                    let record = source
                        .get(kind, id)
                        .ok_or(ChangesetError::MissingEntity { action, kind, id })?;
                    section.push(self.entity_element(record));
                }
            }
            debug!(%action, entities = section.children.len(), "section serialized");
            root.push(section);
        }

        Ok(root)
    }

    /// Render one entity with its attributes, structure, and sorted tags.
    pub fn entity_element(&self, record: &EntityRecord) -> Element {
        let provenance = record.provenance();
        let timestamp = provenance.modified_at.unwrap_or(self.fallback_timestamp);

        let mut el = Element::new(record.kind().element_name())
            .attr("id", record.id())
            .attr("version", provenance.revision)
            .attr("timestamp", timestamp.format(TIMESTAMP_FORMAT))
            .attr_opt("uid", provenance.author_id)
            .attr_opt(
                "user",
                provenance.author_name.as_deref().filter(|name| !name.is_empty()),
            )
            .attr_opt("changeset", provenance.change_group_id);

        match record {
            EntityRecord::Point(p) => {
                el = el
                    .attr("lat", format_coordinate(p.lat))
                    .attr("lon", format_coordinate(p.lon));
            }
            EntityRecord::Polyline(w) => {
                for point_ref in &w.point_refs {
                    el.push(Element::new("nd").attr("ref", point_ref));
                }
            }
            EntityRecord::Relation(r) => {
                for member in &r.members {
                    el.push(
                        Element::new("member")
                            .attr("type", member.kind.element_name())
                            .attr("ref", member.id)
                            .attr("role", &member.role),
                    );
                }
            }
        }

        // Tags are a BTreeMap, so iteration is already ascending by key.
        for (k, v) in record.tags() {
            el.push(Element::new("tag").attr("k", k).attr("v", v));
        }
        el
    }
}

impl Default for ChangesetSerializer {
    fn default() -> Self {
        Self::new(SerializerOptions::default())
    }
}

/// Coordinates are written with seven fractional digits, the precision
/// covered by the equality tolerance.
fn format_coordinate(value: f64) -> String {
    format!("{value:.7}")
}
