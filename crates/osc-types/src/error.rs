use thiserror::Error;

use crate::kind::{EntityId, EntityKind};

/// Errors produced while normalizing raw entity records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    /// A raw record lacks a field that is mandatory for its kind, or carries
    /// a value that cannot be represented.
    #[error(
        "malformed {kind} record ({}): {reason}",
        .id.map_or_else(|| "no id".to_string(), |id| format!("id {id}"))
    )]
    MalformedRecord {
        kind: EntityKind,
        id: Option<EntityId>,
        reason: String,
    },
}

/// Result alias for type-level operations.
pub type TypeResult<T> = Result<T, TypeError>;
