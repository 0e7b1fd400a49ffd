use osc_diff::ChangeAction;
use osc_types::{EntityId, EntityKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangesetError {
    /// The partition names an id that the snapshot it draws from lacks.
    #[error("{action} section references {kind} {id}, which is not in its snapshot")]
    MissingEntity {
        action: ChangeAction,
        kind: EntityKind,
        id: EntityId,
    },

    /// An attribute value holds a character that XML 1.0 forbids.
    #[error("{element} attribute {attribute} contains U+{codepoint:04X}, which XML 1.0 does not allow")]
    InvalidCharacter {
        element: &'static str,
        attribute: &'static str,
        codepoint: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChangesetResult<T> = Result<T, ChangesetError>;
