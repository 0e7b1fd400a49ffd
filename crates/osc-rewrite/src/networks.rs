//! Route network tag stripping.
//!
//! For polylines tagged `highway`:
//! - `network` and `ref` are parallel `;`-separated lists. Each `network`
//!   entry in the target set is removed along with the `ref` entry at the
//!   same position. A list left empty removes its tag.
//! - A `destination:ref` made only of digits is removed, whatever the
//!   network.
//!
//! Relations whose `network` list names any target are dropped. Points are
//! never touched.

use std::collections::BTreeSet;

use osc_types::{EntityRecord, Tags};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rewriter::{RewriteOutcome, RewriteStats, Rewriter};

/// Networks stripped when no targets are configured.
pub const DEFAULT_TARGET_NETWORKS: [&str; 3] = ["AU:QLD:S", "AU:QLD:MR", "AU:QLD:NR"];

const NETWORK: &str = "network";
const REF: &str = "ref";
const DESTINATION_REF: &str = "destination:ref";
const HIGHWAY: &str = "highway";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStripConfig {
    pub targets: Vec<String>,
}

impl Default for NetworkStripConfig {
    fn default() -> Self {
        Self {
            targets: DEFAULT_TARGET_NETWORKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NetworkTagStripper {
    targets: BTreeSet<String>,
}

impl NetworkTagStripper {
    pub fn new(config: &NetworkStripConfig) -> Self {
        Self {
            targets: config.targets.iter().cloned().collect(),
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    fn names_target(&self, network: Option<&String>) -> bool {
        network.is_some_and(|value| split_list(value).any(|n| self.targets.contains(n)))
    }

    /// Strip network/ref and numeric destination refs from highway tags.
    /// Returns `true` if anything changed.
    fn strip_highway_tags(&self, tags: &mut Tags) -> bool {
        let mut changed = false;

        if let Some(network) = tags.get(NETWORK) {
            let networks: Vec<&str> = split_list(network).collect();
            let removed: BTreeSet<usize> = networks
                .iter()
                .enumerate()
                .filter(|(_, n)| self.targets.contains(**n))
                .map(|(i, _)| i)
                .collect();

            if !removed.is_empty() {
                let kept_networks = keep_unremoved(&networks, &removed);
                let refs: Vec<&str> = tags
                    .get(REF)
                    .map(|r| split_list(r).collect())
                    .unwrap_or_default();
                let kept_refs = keep_unremoved(&refs, &removed);

                set_or_remove(tags, NETWORK, kept_networks);
                set_or_remove(tags, REF, kept_refs);
                changed = true;
            }
        }

        if tags.get(DESTINATION_REF).is_some_and(|v| is_numeric(v)) {
            tags.remove(DESTINATION_REF);
            changed = true;
        }

        changed
    }
}

impl Default for NetworkTagStripper {
    fn default() -> Self {
        Self::new(&NetworkStripConfig::default())
    }
}

impl Rewriter for NetworkTagStripper {
    fn name(&self) -> &'static str {
        "network-tags"
    }

    fn rewrite(&self, mut record: EntityRecord, stats: &mut RewriteStats) -> RewriteOutcome {
        match &mut record {
            EntityRecord::Point(_) => RewriteOutcome::Keep(record),
            EntityRecord::Polyline(way) => {
                if !way.tags.contains_key(HIGHWAY) {
                    return RewriteOutcome::Keep(record);
                }
                stats.highway_polylines += 1;
                if self.strip_highway_tags(&mut way.tags) {
                    debug!(id = way.id, "stripped network tags from way");
                    RewriteOutcome::Modified(record)
                } else {
                    RewriteOutcome::Keep(record)
                }
            }
            EntityRecord::Relation(rel) => {
                if self.names_target(rel.tags.get(NETWORK)) {
                    debug!(id = rel.id, network = ?rel.tags.get(NETWORK), "dropping relation");
                    RewriteOutcome::Drop
                } else {
                    RewriteOutcome::Keep(record)
                }
            }
        }
    }
}

/// Split a `;`-separated list, trimming entries and skipping empty ones.
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Entries whose positions are not in `removed`. Positions past the end of
/// `items` are ignored.
fn keep_unremoved(items: &[&str], removed: &BTreeSet<usize>) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, s)| s.to_string())
        .collect()
}

fn set_or_remove(tags: &mut Tags, key: &str, values: Vec<String>) {
    if values.is_empty() {
        tags.remove(key);
    } else {
        tags.insert(key.to_string(), values.join(";"));
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_types::{EntityKind, Member, Point, Polyline, Provenance, Relation};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn way(pairs: &[(&str, &str)]) -> EntityRecord {
        Polyline {
            id: 1,
            tags: tags(pairs),
            point_refs: vec![1, 2],
            provenance: Provenance::default(),
        }
        .into()
    }

    fn relation(pairs: &[(&str, &str)]) -> EntityRecord {
        Relation {
            id: 2,
            tags: tags(pairs),
            members: vec![Member::new(EntityKind::Polyline, 1, "")],
            provenance: Provenance::default(),
        }
        .into()
    }

    fn strip(record: EntityRecord) -> (RewriteOutcome, RewriteStats) {
        let mut stats = RewriteStats::default();
        let out = NetworkTagStripper::default().rewrite(record, &mut stats);
        (out, stats)
    }

    fn modified_tags(out: RewriteOutcome) -> Tags {
        match out {
            RewriteOutcome::Modified(rec) => rec.tags().clone(),
            other => panic!("expected Modified, got {:?}", other),
        }
    }

    #[test]
    fn single_target_network_removes_network_and_ref() {
        let (out, stats) = strip(way(&[
            ("highway", "primary"),
            ("network", "AU:QLD:S"),
            ("ref", "15"),
            ("name", "Gympie Rd"),
        ]));
        assert_eq!(
            modified_tags(out),
            tags(&[("highway", "primary"), ("name", "Gympie Rd")])
        );
        assert_eq!(stats.highway_polylines, 1);
    }

    #[test]
    fn mixed_lists_keep_non_target_entries_in_position() {
        let (out, _) = strip(way(&[
            ("highway", "motorway"),
            ("network", "AU:NR; AU:QLD:MR ;AU:QLD:S;AU:M"),
            ("ref", "A1;32;15;M1"),
        ]));
        assert_eq!(
            modified_tags(out),
            tags(&[
                ("highway", "motorway"),
                ("network", "AU:NR;AU:M"),
                ("ref", "A1;M1")
            ])
        );
    }

    #[test]
    fn shorter_ref_list_is_tolerated() {
        let (out, _) = strip(way(&[
            ("highway", "primary"),
            ("network", "AU:NR;AU:QLD:S"),
            ("ref", "A1"),
        ]));
        assert_eq!(
            modified_tags(out),
            tags(&[("highway", "primary"), ("network", "AU:NR"), ("ref", "A1")])
        );
    }

    #[test]
    fn numeric_destination_ref_removed_regardless_of_network() {
        let (out, _) = strip(way(&[("highway", "trunk"), ("destination:ref", "42")]));
        assert_eq!(modified_tags(out), tags(&[("highway", "trunk")]));

        let (out, _) = strip(way(&[("highway", "trunk"), ("destination:ref", "M1")]));
        assert!(matches!(out, RewriteOutcome::Keep(_)));
    }

    #[test]
    fn non_highway_ways_untouched() {
        let (out, stats) = strip(way(&[("network", "AU:QLD:S"), ("ref", "15")]));
        assert!(matches!(out, RewriteOutcome::Keep(_)));
        assert_eq!(stats.highway_polylines, 0);
    }

    #[test]
    fn non_target_network_untouched() {
        let (out, _) = strip(way(&[
            ("highway", "primary"),
            ("network", "AU:NSW:S"),
            ("ref", "7"),
        ]));
        assert!(matches!(out, RewriteOutcome::Keep(_)));
    }

    #[test]
    fn target_relations_dropped() {
        let (out, _) = strip(relation(&[
            ("type", "route"),
            ("network", "AU:NR;AU:QLD:NR"),
        ]));
        assert_eq!(out, RewriteOutcome::Drop);

        let (out, _) = strip(relation(&[("type", "route"), ("network", "AU:NR")]));
        assert!(matches!(out, RewriteOutcome::Keep(_)));

        let (out, _) = strip(relation(&[("type", "multipolygon")]));
        assert!(matches!(out, RewriteOutcome::Keep(_)));
    }

    #[test]
    fn points_pass_through() {
        let point: EntityRecord = Point {
            id: 3,
            tags: tags(&[("network", "AU:QLD:S")]),
            lat: 0.0,
            lon: 0.0,
            provenance: Provenance::default(),
        }
        .into();
        let (out, _) = strip(point);
        assert!(matches!(out, RewriteOutcome::Keep(_)));
    }

    #[test]
    fn custom_targets() {
        let stripper = NetworkTagStripper::new(&NetworkStripConfig {
            targets: vec!["US:I".into()],
        });
        assert_eq!(stripper.targets().collect::<Vec<_>>(), vec!["US:I"]);
        let mut stats = RewriteStats::default();
        let out = stripper.rewrite(
            way(&[("highway", "motorway"), ("network", "US:I"), ("ref", "95")]),
            &mut stats,
        );
        assert_eq!(modified_tags(out), tags(&[("highway", "motorway")]));
    }

    #[test]
    fn numeric_check() {
        assert!(is_numeric("0123"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("12a"));
        assert!(!is_numeric(" 12"));
    }
}
