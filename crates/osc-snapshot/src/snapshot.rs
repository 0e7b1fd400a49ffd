use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use osc_types::{EntityId, EntityKind, EntityRecord, RawEntity};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SnapshotError, SnapshotResult};

/// What to do when one input stream contains the same `(kind, id)` twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Abort the build with [`SnapshotError::DuplicateId`].
    #[default]
    Reject,
    /// Keep the last-seen record, counting the replacement.
    KeepLast,
}

/// Counts collected while building a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub points: usize,
    pub polylines: usize,
    pub relations: usize,
    /// Records that replaced an earlier record under [`DuplicatePolicy::KeepLast`].
    pub duplicates_replaced: usize,
}

impl SnapshotStats {
    /// Number of entities of the given kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Point => self.points,
            EntityKind::Polyline => self.polylines,
            EntityKind::Relation => self.relations,
        }
    }

    fn count_mut(&mut self, kind: EntityKind) -> &mut usize {
        match kind {
            EntityKind::Point => &mut self.points,
            EntityKind::Polyline => &mut self.polylines,
            EntityKind::Relation => &mut self.relations,
        }
    }
}

/// Immutable index of every entity in one input collection.
///
/// Entries are keyed by `(kind, id)` and iterate in canonical order: kinds
/// in [`EntityKind::ALL`] order, ids ascending within a kind.
#[derive(Clone, Debug, Default)]
pub struct EntitySnapshot {
    entries: BTreeMap<(EntityKind, EntityId), EntityRecord>,
    stats: SnapshotStats,
}

impl EntitySnapshot {
    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from a stream of raw records in a single pass.
    ///
    /// The first failing item (stream error, malformed record, or a
    /// rejected duplicate) aborts the build.
    pub fn from_raw<I, E>(records: I, policy: DuplicatePolicy) -> SnapshotResult<Self>
    where
        I: IntoIterator<Item = Result<RawEntity, E>>,
        E: Into<SnapshotError>,
    {
        let mut builder = SnapshotBuilder::new(policy);
        for raw in records {
            let raw = raw.map_err(|e| -> SnapshotError { e.into() })?;
            builder.insert_raw(raw)?;
        }
        Ok(builder.finish())
    }

    /// Build a snapshot from already-normalized records.
    pub fn from_records<I>(records: I, policy: DuplicatePolicy) -> SnapshotResult<Self>
    where
        I: IntoIterator<Item = EntityRecord>,
    {
        let mut builder = SnapshotBuilder::new(policy);
        for record in records {
            builder.insert(record)?;
        }
        Ok(builder.finish())
    }

    /// Look up an entity by kind and id.
    pub fn get(&self, kind: EntityKind, id: EntityId) -> Option<&EntityRecord> {
        self.entries.get(&(kind, id))
    }

    /// Returns `true` if an entity with this kind and id exists.
    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        self.entries.contains_key(&(kind, id))
    }

    /// Ids of all entities of one kind, ascending.
    pub fn ids(&self, kind: EntityKind) -> impl Iterator<Item = EntityId> + '_ {
        self.entries
            .range((kind, EntityId::MIN)..=(kind, EntityId::MAX))
            .map(|((_, id), _)| *id)
    }

    /// All entities of one kind, ascending by id.
    pub fn entities(&self, kind: EntityKind) -> impl Iterator<Item = &EntityRecord> + '_ {
        self.entries
            .range((kind, EntityId::MIN)..=(kind, EntityId::MAX))
            .map(|(_, record)| record)
    }

    /// All entities in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> + '_ {
        self.entries.values()
    }

    /// Total number of entities across all kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the snapshot holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts collected while building.
    pub fn stats(&self) -> SnapshotStats {
        self.stats
    }
}

/// Single-pass builder for an [`EntitySnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    entries: BTreeMap<(EntityKind, EntityId), EntityRecord>,
    policy: DuplicatePolicy,
    stats: SnapshotStats,
}

impl SnapshotBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Normalize a raw record and insert it.
    pub fn insert_raw(&mut self, raw: RawEntity) -> SnapshotResult<()> {
        self.insert(raw.normalize()?)
    }

    /// Insert a normalized record, applying the duplicate policy.
    pub fn insert(&mut self, record: EntityRecord) -> SnapshotResult<()> {
        let kind = record.kind();
        let id = record.id();
        match self.entries.entry((kind, id)) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                *self.stats.count_mut(kind) += 1;
            }
            Entry::Occupied(mut slot) => match self.policy {
                DuplicatePolicy::Reject => return Err(SnapshotError::DuplicateId { kind, id }),
                DuplicatePolicy::KeepLast => {
                    debug!(%kind, id, "replacing duplicate record");
                    slot.insert(record);
                    self.stats.duplicates_replaced += 1;
                }
            },
        }
        Ok(())
    }

    /// Number of entities inserted so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the index into an immutable snapshot.
    pub fn finish(self) -> EntitySnapshot {
        info!(
            points = self.stats.points,
            polylines = self.stats.polylines,
            relations = self.stats.relations,
            duplicates_replaced = self.stats.duplicates_replaced,
            "snapshot built"
        );
        EntitySnapshot {
            entries: self.entries,
            stats: self.stats,
        }
    }
}
