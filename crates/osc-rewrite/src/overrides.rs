use std::collections::HashMap;

use osc_types::{EntityId, EntityKind, EntityRecord, Tags};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RewriteError, RewriteResult};
use crate::rewriter::{RewriteOutcome, RewriteStats, Rewriter};

/// A set of entities that all receive the same tags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideGroup {
    /// Kind of the listed ids. Defaults to polylines.
    #[serde(default = "default_kind")]
    pub kind: EntityKind,
    pub ids: Vec<EntityId>,
    /// Tags merged over each entity's own. An empty value is written as an
    /// empty string, not treated as a removal.
    pub tags: Tags,
}

fn default_kind() -> EntityKind {
    EntityKind::Polyline
}

/// Merges configured tags onto selected entities.
///
/// When an entity appears in several groups, the last group wins.
#[derive(Clone, Debug, Default)]
pub struct TagOverrides {
    by_entity: HashMap<(EntityKind, EntityId), Tags>,
}

impl TagOverrides {
    pub fn new(groups: &[OverrideGroup]) -> RewriteResult<Self> {
        let mut by_entity = HashMap::new();
        for (index, group) in groups.iter().enumerate() {
            if group.ids.is_empty() || group.tags.is_empty() {
                return Err(RewriteError::InvalidOverride {
                    index,
                    kind: group.kind,
                    reason: "a group needs at least one id and one tag".into(),
                });
            }
            for &id in &group.ids {
                if by_entity
                    .insert((group.kind, id), group.tags.clone())
                    .is_some()
                {
                    debug!(kind = %group.kind, id, group = index, "later override group wins");
                }
            }
        }
        Ok(Self { by_entity })
    }

    /// Number of entities with an override.
    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }
}

impl Rewriter for TagOverrides {
    fn name(&self) -> &'static str {
        "tag-overrides"
    }

    fn rewrite(&self, mut record: EntityRecord, _stats: &mut RewriteStats) -> RewriteOutcome {
        let Some(overrides) = self.by_entity.get(&(record.kind(), record.id())) else {
            return RewriteOutcome::Keep(record);
        };

        let tags = record.tags_mut();
        let mut changed = false;
        for (k, v) in overrides {
            if tags.get(k) != Some(v) {
                tags.insert(k.clone(), v.clone());
                changed = true;
            }
        }

        if changed {
            debug!(kind = %record.kind(), id = record.id(), "tags overridden");
            RewriteOutcome::Modified(record)
        } else {
            RewriteOutcome::Keep(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_types::{Point, Polyline, Provenance};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn way(id: EntityId, pairs: &[(&str, &str)]) -> EntityRecord {
        Polyline {
            id,
            tags: tags(pairs),
            point_refs: vec![1, 2],
            provenance: Provenance::default(),
        }
        .into()
    }

    fn group(ids: &[EntityId], pairs: &[(&str, &str)]) -> OverrideGroup {
        OverrideGroup {
            kind: EntityKind::Polyline,
            ids: ids.to_vec(),
            tags: tags(pairs),
        }
    }

    #[test]
    fn merges_tags_and_keeps_others() {
        let overrides = TagOverrides::new(&[group(
            &[10, 11],
            &[("highway", "motorway_link"), ("name", "")],
        )])
        .unwrap();
        let mut stats = RewriteStats::default();

        let out = overrides.rewrite(
            way(10, &[("highway", "primary"), ("name", "Old Rd"), ("lanes", "2")]),
            &mut stats,
        );
        match out {
            RewriteOutcome::Modified(rec) => assert_eq!(
                rec.tags(),
                &tags(&[("highway", "motorway_link"), ("name", ""), ("lanes", "2")])
            ),
            other => panic!("expected Modified, got {:?}", other),
        }
    }

    #[test]
    fn unlisted_entities_pass_through() {
        let overrides = TagOverrides::new(&[group(&[10], &[("access", "no")])]).unwrap();
        let mut stats = RewriteStats::default();
        let rec = way(99, &[("highway", "service")]);
        assert_eq!(
            overrides.rewrite(rec.clone(), &mut stats),
            RewriteOutcome::Keep(rec)
        );
    }

    #[test]
    fn kind_must_match() {
        let overrides = TagOverrides::new(&[group(&[5], &[("access", "no")])]).unwrap();
        let mut stats = RewriteStats::default();
        let point: EntityRecord = Point {
            id: 5,
            tags: Tags::new(),
            lat: 0.0,
            lon: 0.0,
            provenance: Provenance::default(),
        }
        .into();
        assert!(matches!(
            overrides.rewrite(point, &mut stats),
            RewriteOutcome::Keep(_)
        ));
    }

    #[test]
    fn already_applied_override_is_keep() {
        let overrides = TagOverrides::new(&[group(&[1], &[("access", "no")])]).unwrap();
        let mut stats = RewriteStats::default();
        assert!(matches!(
            overrides.rewrite(way(1, &[("access", "no")]), &mut stats),
            RewriteOutcome::Keep(_)
        ));
    }

    #[test]
    fn last_group_wins() {
        let overrides = TagOverrides::new(&[
            group(&[1, 2], &[("access", "no")]),
            group(&[2], &[("access", "yes")]),
        ])
        .unwrap();
        assert_eq!(overrides.len(), 2);
        let mut stats = RewriteStats::default();
        match overrides.rewrite(way(2, &[]), &mut stats) {
            RewriteOutcome::Modified(rec) => {
                assert_eq!(rec.tags().get("access").map(String::as_str), Some("yes"))
            }
            other => panic!("expected Modified, got {:?}", other),
        }
    }

    #[test]
    fn empty_group_rejected() {
        let err = TagOverrides::new(&[group(&[], &[("a", "b")])]).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidOverride { index: 0, .. }));
        let err = TagOverrides::new(&[group(&[1], &[]), group(&[2], &[])]).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidOverride { index: 0, .. }));
    }

    #[test]
    fn groups_parse_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            overrides: Vec<OverrideGroup>,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            [[overrides]]
            ids = [1135684894, 24210972]
            tags = { highway = "motorway_link", name = "" }

            [[overrides]]
            kind = "node"
            ids = [7]
            tags = { access = "no" }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.overrides.len(), 2);
        assert_eq!(parsed.overrides[0].kind, EntityKind::Polyline);
        assert_eq!(parsed.overrides[1].kind, EntityKind::Point);
        assert_eq!(parsed.overrides[0].tags.get("name").map(String::as_str), Some(""));
    }
}
