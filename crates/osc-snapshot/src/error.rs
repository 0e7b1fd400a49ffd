use osc_types::{EntityId, EntityKind, TypeError};

/// Errors from snapshot construction and record stream I/O.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The same `(kind, id)` appeared twice in one input stream.
    #[error("duplicate {kind} id {id} in one input stream")]
    DuplicateId { kind: EntityKind, id: EntityId },

    /// A record lacked a mandatory field for its kind.
    #[error(transparent)]
    Malformed(#[from] TypeError),

    /// A line of a record stream could not be decoded.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// I/O error reading or writing a record stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
