//! Changeset serialization for osc-delta.
//!
//! Turns a diff [`Partition`](osc_diff::Partition) plus the two snapshots it
//! was computed from into an ordered document tree, and renders that tree
//! as an osmChange XML document.
//!
//! # Architecture
//!
//! - **Element**: a minimal ordered document tree (name, attributes, children)
//! - **ChangesetSerializer**: builds the tree with fixed section, kind, id,
//!   attribute, and tag ordering so identical diffs render identically
//! - **RenderedChangeset**: the fully buffered text encoding, its BLAKE3
//!   content hash, and single-write / atomic-file output

pub mod document;
pub mod error;
pub mod serializer;
pub mod writer;

pub use document::Element;
pub use error::{ChangesetError, ChangesetResult};
pub use serializer::{ChangesetSerializer, SerializerOptions};
pub use writer::{RenderedChangeset, XML_DECLARATION};
