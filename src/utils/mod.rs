pub mod text;
pub mod time;

pub use text::{normalize_text, safe_slug, truncate_chars};
pub use time::{ts_to_date_str, ts_to_rfc3339};
