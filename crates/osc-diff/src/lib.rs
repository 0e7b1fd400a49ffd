//! Diff engine for osc-delta.
//!
//! Compares an original and a modified [`EntitySnapshot`](osc_snapshot::EntitySnapshot)
//! and partitions entity ids, per kind, into created, deleted, and
//! semantically modified sets. Kinds are diffed independently and the
//! computation is pure: no I/O, no failure modes.
//!
//! # Key Types
//!
//! - [`KindPartition`] -- created/deleted/modified ids for one entity kind
//! - [`Partition`] -- one [`KindPartition`] per kind
//! - [`ChangeAction`] -- create/modify/delete, in canonical section order
//! - [`DiffSummary`] -- per-kind counts for reporting

pub mod engine;
pub mod partition;

pub use engine::{diff_kind, diff_snapshots};
pub use partition::{ChangeAction, DiffSummary, KindPartition, Partition};
