use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::utils::truncate_chars;

/// A registry entry: URL plus display label, deduplicated by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub label: String,
}

/// The 70-character delimiter framing registry and appendix blocks.
pub fn section_delim() -> String {
    "=".repeat(70)
}

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s)\]}"']*[^\s)\]}"'.,;:!?]"#).expect("valid regex")
});

static TRAILING_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.,;:!?'"]$"#).expect("valid regex"));

/// Scan message text for URLs, in document order, unique per call.
///
/// Labels derive from the URL's host plus a 50-character path prefix; URLs
/// the `url` crate cannot parse fall back to a 60-character prefix of the
/// raw URL.
pub fn extract_sources(text: &str) -> Vec<Source> {
    let mut seen = Vec::new();
    let mut sources = Vec::new();
    for m in URL_RE.find_iter(text) {
        let url = TRAILING_PUNCT.replace(m.as_str(), "").into_owned();
        if seen.contains(&url) {
            continue;
        }
        seen.push(url.clone());
        let label = derive_label(&url);
        sources.push(Source { url, label });
    }
    sources
}

fn derive_label(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let path = parsed.path();
            if path == "/" {
                host.to_string()
            } else {
                format!("{}{}", host, truncate_chars(path, 50))
            }
        }
        Err(_) => truncate_chars(url, 60).to_string(),
    }
}

/// Drop later duplicates of the same URL; the first occurrence's label wins.
pub fn dedupe_sources(all: Vec<Source>) -> Vec<Source> {
    let mut unique: Vec<Source> = Vec::new();
    for source in all {
        if !unique.iter().any(|s| s.url == source.url) {
            unique.push(source);
        }
    }
    unique
}

/// Emit the sources registry block, entries alphabetical by label.
pub fn registry_section(sources: &[Source]) -> String {
    let mut ordered: Vec<&Source> = sources.iter().collect();
    ordered.sort_by(|a, b| {
        (a.label.to_lowercase(), &a.url).cmp(&(b.label.to_lowercase(), &b.url))
    });

    let delim = section_delim();
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", delim));
    out.push_str("SOURCES REGISTRY\n");
    out.push_str(&format!("{}\n\n", delim));
    for (i, source) in ordered.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n    {}\n\n", i + 1, source.label, source.url));
    }
    out
}
