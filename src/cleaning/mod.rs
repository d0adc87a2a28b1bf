//! Cleaning pipeline for the working-copy document.
//!
//! The pipeline is a fixed sequence of text-to-text stages. The early stages
//! (noise stripping, citation removal, markup sanitization, appendix guards)
//! are pure string rewrites listed in [`base_stages`]; the later stages
//! (dedup, deliverable extraction, source reorganization, artifact
//! quarantine) carry options or produce side outputs and are orchestrated by
//! the assembler. Every stage is idempotent so re-running a dossier through
//! the pipeline never degrades it further.

pub mod appendix;
pub mod artifacts;
pub mod dedup;
pub mod deliverables;
pub mod sources;
pub mod stages;

pub use appendix::{
    APPENDIX_HEADER, dedupe_appendix_header, is_appendix_header_line,
    remove_appendix_header_lines, strip_existing_appendix,
};
pub use artifacts::{Artifact, extract_research_artifacts, filter_artifacts};
pub use dedup::{MIN_BLOCK_SIZE, deduplicate_blocks};
pub use deliverables::{DEFAULT_PATTERNS, extract_deliverables};
pub use sources::{SourceBucket, reorganize_sources_section, tag_source};
pub use stages::{sanitize_ui_markup, strip_citation_markers, strip_tool_noise};

/// A named pure text-rewrite stage.
pub struct Stage {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The unconditional front of the pipeline, in execution order.
pub fn base_stages() -> Vec<Stage> {
    vec![
        Stage { name: "tool-noise", apply: strip_tool_noise },
        Stage { name: "citations", apply: strip_citation_markers },
        Stage { name: "ui-markup", apply: sanitize_ui_markup },
        Stage { name: "appendix-tail", apply: strip_existing_appendix },
        Stage { name: "appendix-lines", apply: remove_appendix_header_lines },
    ]
}

/// Run the unconditional stages in order.
pub fn run_base_stages(text: &str) -> String {
    let mut working = text.to_string();
    for stage in base_stages() {
        working = (stage.apply)(&working);
    }
    working
}
