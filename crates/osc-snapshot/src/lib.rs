//! Entity snapshots for osc-delta.
//!
//! An [`EntitySnapshot`] is the complete, immutable index of one input
//! collection, keyed by `(kind, id)`. Snapshots are built in a single pass
//! by a [`SnapshotBuilder`] and are never mutated afterwards.
//!
//! # Architecture
//!
//! - **SnapshotBuilder**: folds raw records into an index, enforcing the
//!   configured [`DuplicatePolicy`]
//! - **EntitySnapshot**: ordered, read-only lookup by kind and id
//! - **jsonl**: line-delimited JSON record source and sink
//! - **build_pair**: builds the original and modified snapshots, optionally
//!   on two threads

pub mod error;
pub mod jsonl;
pub mod pair;
pub mod snapshot;

pub use error::{SnapshotError, SnapshotResult};
pub use jsonl::{load_snapshot, read_records, write_records, write_records_to_file, JsonLinesReader};
pub use pair::build_pair;
pub use snapshot::{DuplicatePolicy, EntitySnapshot, SnapshotBuilder, SnapshotStats};
