//! Entity stream rewriters for osc-delta.
//!
//! Rewriters turn one record stream into another, typically to produce the
//! "modified" input of a diff. Each record is passed through a
//! [`Rewriter`], which keeps, modifies, or drops it. Stream order is
//! preserved and counts are returned as [`RewriteStats`].
//!
//! # Rewriters
//!
//! - [`TagOverrides`] -- merge configured tags onto selected entities
//! - [`NetworkTagStripper`] -- remove route network tagging from highways
//!   and delete route relations of the targeted networks

pub mod error;
pub mod networks;
pub mod overrides;
pub mod rewriter;

pub use error::{RewriteError, RewriteResult};
pub use networks::{NetworkStripConfig, NetworkTagStripper, DEFAULT_TARGET_NETWORKS};
pub use overrides::{OverrideGroup, TagOverrides};
pub use rewriter::{
    rewrite_file, rewrite_records, KindCounts, RewriteOutcome, RewriteStats, Rewriter,
};
