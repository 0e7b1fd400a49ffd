//! Entity data model for osc-delta.
//!
//! This crate defines the comparison-normalized view of map entities that
//! every other osc-delta crate works with. Raw records handed over by an
//! external decoder are normalized into [`EntityRecord`] values, which carry
//! provenance metadata through to output but exclude it from equality.
//!
//! # Key Types
//!
//! - [`EntityKind`] -- Point, polyline, or relation, in canonical output order
//! - [`EntityRecord`] -- Tagged union over [`Point`], [`Polyline`], [`Relation`]
//! - [`Provenance`] -- Revision-adjacent bookkeeping excluded from equality
//! - [`RawEntity`] -- Loosely-typed record as delivered by a decoder
//! - [`SemanticEq`] -- The equality rule used by the diff engine

pub mod error;
pub mod kind;
pub mod raw;
pub mod record;

pub use error::{TypeError, TypeResult};
pub use kind::{EntityId, EntityKind};
pub use raw::RawEntity;
pub use record::{
    EntityRecord, Member, Point, Polyline, Provenance, Relation, SemanticEq, Tags,
    COORDINATE_TOLERANCE,
};
