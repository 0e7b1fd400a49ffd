use osc_snapshot::SnapshotError;
use osc_types::EntityKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    /// Reading, normalizing, or writing the record stream failed.
    #[error(transparent)]
    Stream(#[from] SnapshotError),

    /// An override group that could never change anything.
    #[error("override group {index} for {kind}: {reason}")]
    InvalidOverride {
        index: usize,
        kind: EntityKind,
        reason: String,
    },
}

pub type RewriteResult<T> = Result<T, RewriteError>;
