//! Loaders for the collaborator-supplied inputs: normalized conversation
//! records and the plain-text used-links / deliverable-pattern lists.
//!
//! Structural problems (missing files, malformed JSON) fail fast with
//! context; recoverable oddities inside records (bad timestamps, empty
//! messages) are coerced or dropped so one damaged record cannot sink the
//! whole build.

pub mod lists;
pub mod records;

pub use lists::{expand_user, load_patterns, load_used_links};
pub use records::load_conversations;
