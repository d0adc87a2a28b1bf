use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static UNSAFE_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-\.\s]").expect("valid regex"));

/// Collapse internal whitespace runs to single spaces and trim.
///
/// This is the projection used for branch reconciliation and paragraph
/// deduplication, so two texts that differ only in whitespace compare equal.
pub fn normalize_text(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Normalize a free-form label into a filesystem-safe slug
///
/// Collapses whitespace, drops characters outside `[\w\-.\s]`, replaces
/// spaces with underscores and caps the result at `max_len` characters.
pub fn safe_slug(s: &str, max_len: usize) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(s.trim(), " ");
    let cleaned = UNSAFE_SLUG_CHARS.replace_all(&collapsed, "");
    let slug: String = cleaned.trim().replace(' ', "_");
    slug.chars().take(max_len).collect()
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
