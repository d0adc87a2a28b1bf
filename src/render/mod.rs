//! Raw narrative rendering: header, table of contents, per-group sections
//! and the deduplicated sources registry.

pub mod raw;
pub mod sources;

pub use raw::render_raw;
pub use sources::{Source, dedupe_sources, extract_sources, registry_section, section_delim};
