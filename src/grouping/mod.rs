//! Clustering and branch reconciliation.
//!
//! [`build_groups`] clusters conversation items into root+branch groups by
//! normalized base title. [`trim_branch_new_part`] reconciles each branch
//! against its root so shared history is never re-printed, and
//! [`excerpt_messages`] narrows a sequence to topic hits plus context.

pub mod builder;
pub mod excerpt;
pub mod reconcile;

pub use builder::{Group, build_groups};
pub use excerpt::{compile_topic_pattern, excerpt_messages};
pub use reconcile::trim_branch_new_part;
