//! Working-index generation: the navigational preamble of the working
//! document, in plain and config-tagged variants.

pub mod tagged;
pub mod working;

pub use tagged::generate_working_index_with_tags;
pub use working::generate_working_index;
