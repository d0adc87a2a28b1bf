use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::ColumnConfig;

/// Inclusive bounds accepted for the excerpt context window.
pub const MIN_CONTEXT: usize = 0;
pub const MAX_CONTEXT: usize = 200;

/// Whether the dossier carries full transcripts or topic excerpts only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Full,
    Excerpts,
}

/// Options for one build invocation; immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub mode: BuildMode,
    /// Messages of context kept around each excerpt hit.
    pub context: usize,
    /// Paragraph-level deduplication of the working document.
    pub dedup: bool,
    /// Produce the cleaned working variant in addition to the raw narrative.
    pub split: bool,
    /// Deliverable-section header patterns; `Some(vec![])` selects defaults,
    /// `None` skips deliverable extraction entirely.
    pub patterns: Option<Vec<String>>,
    /// URLs already used in drafts; promotes matching registry entries.
    pub used_links: Option<HashSet<String>>,
    pub config: Option<ColumnConfig>,
}

/// Explicit rendering context threaded through every call that would
/// otherwise reach for ambient state.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Wall-clock instant of this build, epoch seconds.
    pub generated_at: f64,
    /// Path of the export the records came from, shown in the header.
    pub source_root: PathBuf,
}

impl RenderContext {
    pub fn new(generated_at: f64, source_root: PathBuf) -> Self {
        RenderContext { generated_at, source_root }
    }
}
