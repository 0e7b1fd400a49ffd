use std::collections::BTreeSet;
use std::fmt;

use osc_types::{EntityId, EntityKind};

/// The kind of change a changeset section describes.
///
/// Declaration order is the canonical section order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeAction {
    Create,
    Modify,
    Delete,
}

impl ChangeAction {
    /// All actions, in canonical section order.
    pub const ALL: [ChangeAction; 3] = [Self::Create, Self::Modify, Self::Delete];

    /// Section element name.
    pub const fn section_name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

/// Created, deleted, and modified ids for one entity kind.
///
/// The three sets are disjoint. Ids present in both snapshots with
/// semantically equal content appear in none of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KindPartition {
    /// Present in the modified snapshot only.
    pub created: BTreeSet<EntityId>,
    /// Present in the original snapshot only.
    pub deleted: BTreeSet<EntityId>,
    /// Present in both, semantically unequal.
    pub modified: BTreeSet<EntityId>,
}

impl KindPartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no id was created, deleted, or modified.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// The id set for one action.
    pub fn ids(&self, action: ChangeAction) -> &BTreeSet<EntityId> {
        match action {
            ChangeAction::Create => &self.created,
            ChangeAction::Modify => &self.modified,
            ChangeAction::Delete => &self.deleted,
        }
    }

    /// Total number of changed ids.
    pub fn len(&self) -> usize {
        self.created.len() + self.deleted.len() + self.modified.len()
    }
}

/// The result of diffing two snapshots: one [`KindPartition`] per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub points: KindPartition,
    pub polylines: KindPartition,
    pub relations: KindPartition,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// The partition for one kind.
    pub fn kind(&self, kind: EntityKind) -> &KindPartition {
        match kind {
            EntityKind::Point => &self.points,
            EntityKind::Polyline => &self.polylines,
            EntityKind::Relation => &self.relations,
        }
    }

    pub fn kind_mut(&mut self, kind: EntityKind) -> &mut KindPartition {
        match kind {
            EntityKind::Point => &mut self.points,
            EntityKind::Polyline => &mut self.polylines,
            EntityKind::Relation => &mut self.relations,
        }
    }

    /// Returns `true` if nothing changed for any kind.
    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|&k| self.kind(k).is_empty())
    }

    /// Returns `true` if no kind has any id for this action.
    pub fn is_action_empty(&self, action: ChangeAction) -> bool {
        EntityKind::ALL
            .iter()
            .all(|&k| self.kind(k).ids(action).is_empty())
    }

    /// Per-kind counts for reporting.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for kind in EntityKind::ALL {
            let part = self.kind(kind);
            let i = kind_index(kind);
            summary.created[i] = part.created.len();
            summary.modified[i] = part.modified.len();
            summary.deleted[i] = part.deleted.len();
        }
        summary
    }
}

/// Per-kind change counts, indexed in [`EntityKind::ALL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub created: [usize; 3],
    pub modified: [usize; 3],
    pub deleted: [usize; 3],
}

impl DiffSummary {
    /// Count for one action and kind.
    pub fn count(&self, action: ChangeAction, kind: EntityKind) -> usize {
        let row = match action {
            ChangeAction::Create => &self.created,
            ChangeAction::Modify => &self.modified,
            ChangeAction::Delete => &self.deleted,
        };
        row[kind_index(kind)]
    }

    /// Total changes across all actions and kinds.
    pub fn total(&self) -> usize {
        self.created.iter().chain(&self.modified).chain(&self.deleted).sum()
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, action) in ChangeAction::ALL.into_iter().enumerate() {
            if n > 0 {
                f.write_str("; ")?;
            }
            write!(
                f,
                "{action}: {} nodes, {} ways, {} relations",
                self.count(action, EntityKind::Point),
                self.count(action, EntityKind::Polyline),
                self.count(action, EntityKind::Relation),
            )?;
        }
        Ok(())
    }
}

fn kind_index(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Point => 0,
        EntityKind::Polyline => 1,
        EntityKind::Relation => 2,
    }
}
