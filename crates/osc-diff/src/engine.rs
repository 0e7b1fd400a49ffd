//! Snapshot diff: partition ids into created, deleted, and modified.
//!
//! Each kind is compared independently. Content equality follows
//! [`SemanticEq`]: tags, coordinates within tolerance, ordered point refs,
//! ordered members. Provenance never makes an entity "modified".

use osc_snapshot::EntitySnapshot;
use osc_types::{EntityKind, SemanticEq};
use tracing::info;

use crate::partition::{KindPartition, Partition};

/// Diff every kind between two snapshots.
pub fn diff_snapshots(original: &EntitySnapshot, modified: &EntitySnapshot) -> Partition {
    let mut partition = Partition::new();
    for kind in EntityKind::ALL {
        *partition.kind_mut(kind) = diff_kind(original, modified, kind);
    }

    let summary = partition.summary();
    info!(
        created = summary.created.iter().sum::<usize>(),
        modified = summary.modified.iter().sum::<usize>(),
        deleted = summary.deleted.iter().sum::<usize>(),
        "diff complete"
    );
    partition
}

/// Diff a single kind between two snapshots.
///
/// Ids only in `modified` are created, ids only in `original` are deleted,
/// and ids in both whose records are not semantically equal are modified.
pub fn diff_kind(
    original: &EntitySnapshot,
    modified: &EntitySnapshot,
    kind: EntityKind,
) -> KindPartition {
    let mut result = KindPartition::new();

    // Deleted and modified.
    for old in original.entities(kind) {
        let id = old.id();
        match modified.get(kind, id) {
            Some(new) => {
                if !old.semantically_eq(new) {
                    result.modified.insert(id);
                }
            }
            None => {
                result.deleted.insert(id);
            }
        }
    }

    // Created.
    for id in modified.ids(kind) {
        if !original.contains(kind, id) {
            result.created.insert(id);
        }
    }

    result
}
