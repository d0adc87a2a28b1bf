//! Column config: typed schema, strict loading, filter matching, and the
//! control-layer front matter generated from it.
//!
//! Config problems are hard errors at load time. Everything downstream can
//! then assume a well-formed config.

pub mod control;
pub mod de;
pub mod schema;

pub use control::{generate_completeness_check, generate_control_layer};
pub use schema::{
    ColumnConfig, ControlLayerSections, IncludeBucket, SegmentScoring, ThreadFilters,
    load_column_config, matches_thread_filter, short_tag,
};
