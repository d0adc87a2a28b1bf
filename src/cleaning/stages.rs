//! Destructive text transforms applied to the raw narrative, in order.
//!
//! Every stage is a pure `&str -> String` function and idempotent: applying
//! a stage twice yields the same text as applying it once. Order still
//! matters across stages (markup must go before appendix detection, the
//! registry must survive until source reorganization), which is why the
//! pipeline runner in `cleaning::mod` holds an explicit stage list.

use std::sync::LazyLock;

use regex::Regex;

/// JSON keys that mark a fragment as tool/action noise.
const TOOL_KEYS: [&str; 18] = [
    "search_query",
    "tool_call",
    "function",
    "action",
    "open",
    "click",
    "find",
    "screenshot",
    "response_length",
    "file_path",
    "command",
    "terminal",
    "browser",
    "task_violates_safety_guidelines",
    "updates",
    "comments",
    "title",
    "prompt",
];

static JSON_TOOL_BLOB: LazyLock<Regex> = LazyLock::new(|| {
    let keys = TOOL_KEYS.join("|");
    Regex::new(&format!(r#"(?s)\{{\s*['"]?(?:{})['"]?.*?\}}"#, keys)).expect("valid regex")
});

static TOOL_CALL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[tool_call:.*?\]").expect("valid regex"));

static TOOL_LINE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:\*\*)?tool\s*\(.*").expect("valid regex"));

static TOOL_LINE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:\*\*)?tool\s+\w+.*").expect("valid regex"));

static TOOL_STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Successfully created|Successfully updated|Failed with error).*?\n")
        .expect("valid regex")
});

static META_PROMPT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[^\n]*(?:Make sure to|remember to|don't forget to).*$")
        .expect("valid regex")
});

static BOILERPLATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^##\s+(?:how to invoke the file_search tool|how to handle results from file_search|tool usage instructions)",
    )
    .expect("valid regex")
});

static NEXT_SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s").expect("valid regex"));

static TRUNCATION_NOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^The file is too long and its contents have been truncated\..*$")
        .expect("valid regex")
});

pub(crate) static ZERO_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{200b}-\u{200f}\u{2060}\u{feff}]").expect("valid regex")
});

pub(crate) static JSON_TOOL_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\s*JSON\s*/\s*Tool\s*Call\s*\]").expect("valid regex")
});

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

/// Stage 1: remove tool-call JSON blobs, tool markers, tool status lines,
/// meta-prompt instructions and tool-usage boilerplate blocks.
pub fn strip_tool_noise(text: &str) -> String {
    let mut text = JSON_TOOL_BLOB.replace_all(text, "").into_owned();
    text = TOOL_CALL_MARKER.replace_all(&text, "").into_owned();
    text = TOOL_LINE_CALL.replace_all(&text, "").into_owned();
    text = TOOL_LINE_WORD.replace_all(&text, "").into_owned();
    text = TOOL_STATUS_LINE.replace_all(&text, "").into_owned();
    text = META_PROMPT_LINE.replace_all(&text, "").into_owned();
    text = strip_boilerplate_blocks(&text);
    text = TRUNCATION_NOTE.replace_all(&text, "").into_owned();
    text = drop_tool_json_lines(&text);
    collapse_blank_runs(&text).trim().to_string()
}

/// Remove instruction blocks that leak into transcripts: from a matching
/// `##` boilerplate heading up to (not including) the next `##` heading.
fn strip_boilerplate_blocks(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;
    for line in text.split('\n') {
        if BOILERPLATE_HEADER.is_match(line) {
            skipping = true;
            continue;
        }
        if skipping {
            if !NEXT_SECTION_HEADER.is_match(line) {
                continue;
            }
            skipping = false;
        }
        kept.push(line);
    }
    kept.join("\n")
}

/// Drop whole lines that are tool/system JSON or tool-call annotations.
fn drop_tool_json_lines(text: &str) -> String {
    let quoted_keys = ["task_violates_safety_guidelines", "updates", "comments"];
    text.split('\n')
        .filter(|line| {
            let normalized = ZERO_WIDTH.replace_all(line.trim(), "");
            if JSON_TOOL_ANNOTATION.is_match(&normalized) {
                return false;
            }
            if normalized.starts_with('{') && TOOL_KEYS.iter().any(|k| normalized.contains(k)) {
                return false;
            }
            if quoted_keys.iter().any(|k| {
                normalized.contains(&format!("\"{}\"", k))
                    || normalized.contains(&format!("'{}'", k))
            }) {
                return false;
            }
            true
        })
        .collect::<Vec<_>>()
        .join("\n")
}

static CITETURN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<citeturn[^>]*>").expect("valid regex"));

static NAVLIST_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<navlist>.*?</navlist>").expect("valid regex"));

static TURN_NEWS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bturn\d+news\d+\b").expect("valid regex"));

static LONE_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\](\s|\z)").expect("valid regex"));

static REGISTRY_ENTRY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\d+\]\s").expect("valid regex"));

static PHANTOM_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【[^】]*†[^】]*】").expect("valid regex"));

static CJK_BRACKET_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【[^】]*】").expect("valid regex"));

static REF_REMOVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[REF REMOVED\]").expect("valid regex"));

/// Stage 2: remove inline citation tags, navigation-list blocks, bare
/// citation tokens, lone numeric brackets and phantom citation markers.
///
/// Lone-bracket removal skips sources-registry entry lines (`[n] ` at line
/// start) so the registry stays parseable for the reorganization stage.
pub fn strip_citation_markers(text: &str) -> String {
    let mut text = CITETURN_TAG.replace_all(text, "").into_owned();
    text = NAVLIST_BLOCK.replace_all(&text, "").into_owned();
    text = TURN_NEWS_TOKEN.replace_all(&text, "").into_owned();

    text = text
        .split('\n')
        .map(|line| {
            if REGISTRY_ENTRY_LINE.is_match(line) {
                line.to_string()
            } else {
                LONE_CITATION.replace_all(line, "$1").into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    text = PHANTOM_CITATION.replace_all(&text, "").into_owned();
    text = CJK_BRACKET_BLOCK.replace_all(&text, "").into_owned();
    text = REF_REMOVED.replace_all(&text, "").into_owned();

    text = MULTI_SPACE.replace_all(&text, " ").into_owned();
    collapse_blank_runs(&text).trim().to_string()
}

static ANGLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*/?>\s*").expect("valid regex"));

static SPAN_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<span[^>]*>.*?</span>").expect("valid regex"));

static PRIVATE_USE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)[\u{e000}-\u{f8ff}].*?[\u{e000}-\u{f8ff}]").expect("valid regex")
});

static PRIVATE_USE_GLYPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{e000}-\u{f8ff}]").expect("valid regex"));

static NON_PRINTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\u{ad}\u{fffd}\u{fffe}]").expect("valid regex"));

static RESIDUAL_TURN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:cite)?turn\d+(?:search|news|view|file)\w*").expect("valid regex")
});

static CITETURN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bciteturn\d+\w+\b").expect("valid regex"));

static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={60,}").expect("valid regex"));

/// Stage 3: strip chat-UI markup tags, private-use glyphs and the spans they
/// bound, non-printing artifacts, residual citation tokens, and long `=`
/// separator lines that could be confused with appendix dividers.
///
/// The exact 70-character delimiter is preserved: it frames the sources
/// registry and the appendix, which later stages locate by that frame.
pub fn sanitize_ui_markup(text: &str) -> String {
    let mut text = SPAN_BLOCK.replace_all(text, "").into_owned();
    text = ANGLE_TAG.replace_all(&text, "").into_owned();
    text = PRIVATE_USE_SPAN.replace_all(&text, "").into_owned();
    text = PRIVATE_USE_GLYPH.replace_all(&text, "").into_owned();
    text = NON_PRINTING.replace_all(&text, "").into_owned();
    text = RESIDUAL_TURN_TOKEN.replace_all(&text, "").into_owned();
    text = CITETURN_WORD.replace_all(&text, "").into_owned();

    let canonical_delim = "=".repeat(70);
    text = text
        .split('\n')
        .map(|line| {
            if SEPARATOR_LINE.is_match(line) && line != canonical_delim { "" } else { line }
        })
        .collect::<Vec<_>>()
        .join("\n");

    text = MULTI_SPACE.replace_all(&text, " ").into_owned();
    collapse_blank_runs(&text).trim().to_string()
}
