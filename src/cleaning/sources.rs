use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::render::section_delim;

/// Category buckets for registry entries, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceBucket {
    UsedInDrafts,
    Candidate,
    Legal,
    Media,
    Economic,
    Internal,
    Other,
}

impl SourceBucket {
    pub fn display_label(self) -> &'static str {
        match self {
            SourceBucket::UsedInDrafts => "**Used in Drafts**",
            SourceBucket::Candidate => "**Candidates for Next Column**",
            SourceBucket::Legal => "Legal Sources",
            SourceBucket::Media => "Media Sources",
            SourceBucket::Economic => "Economic Sources",
            SourceBucket::Internal => "Internal Documents",
            SourceBucket::Other => "Other Sources",
        }
    }
}

const DISPLAY_ORDER: [SourceBucket; 7] = [
    SourceBucket::UsedInDrafts,
    SourceBucket::Candidate,
    SourceBucket::Legal,
    SourceBucket::Media,
    SourceBucket::Economic,
    SourceBucket::Internal,
    SourceBucket::Other,
];

const CANDIDATE_KEYWORDS: [&str; 10] = [
    "research", "analysis", "report", "study", "project", "draft", "document", "paper",
    "article", "summary",
];

const LEGAL_KEYWORDS: [&str; 7] =
    [".gov.br", ".senado", ".camara", "judicial", "legal", "court", "law"];

const MEDIA_KEYWORDS: [&str; 13] = [
    "news", "folha", "globo", "estadao", "uol", "bbc", "cnn", "press", "media",
    "jornalismo", "nytimes", "wsj", "reuters",
];

const ECONOMIC_KEYWORDS: [&str; 11] = [
    "economic", "financial", "trade", "economy", "banco", "bcb", "imf", "world bank",
    "commerce", "bloomberg", "forbes",
];

const INTERNAL_KEYWORDS: [&str; 6] =
    ["note", "transcript", "internal", "memo", "meeting", "summary"];

fn any_keyword(url_lower: &str, label_lower: &str, keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|kw| url_lower.contains(kw) || label_lower.contains(kw))
}

/// Assign a registry entry to its category bucket. Usage wins over keyword
/// matches, candidate keywords win over domain keywords.
pub fn tag_source(url: &str, label: &str, used_links: Option<&HashSet<String>>) -> SourceBucket {
    if let Some(used) = used_links
        && used.contains(url)
    {
        return SourceBucket::UsedInDrafts;
    }

    let url_lower = url.to_lowercase();
    let label_lower = label.to_lowercase();

    if any_keyword(&url_lower, &label_lower, &CANDIDATE_KEYWORDS) {
        SourceBucket::Candidate
    } else if any_keyword(&url_lower, &label_lower, &LEGAL_KEYWORDS) {
        SourceBucket::Legal
    } else if any_keyword(&url_lower, &label_lower, &MEDIA_KEYWORDS) {
        SourceBucket::Media
    } else if any_keyword(&url_lower, &label_lower, &ECONOMIC_KEYWORDS) {
        SourceBucket::Economic
    } else if any_keyword(&url_lower, &label_lower, &INTERNAL_KEYWORDS) {
        SourceBucket::Internal
    } else {
        SourceBucket::Other
    }
}

static REGISTRY_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^={70}\nSOURCES REGISTRY\n={70}\n\n(.+)$").expect("valid regex")
});

static REGISTRY_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]\s+(.+?)\n\s+(https?://\S+)").expect("valid regex"));

/// Rewrite the trailing sources registry grouped by category, renumbering
/// entries sequentially across buckets. Text without a registry passes
/// through untouched.
pub fn reorganize_sources_section(text: &str, used_links: Option<&HashSet<String>>) -> String {
    let Some(caps) = REGISTRY_SECTION.captures(text) else {
        return text.to_string();
    };
    let section_start = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let mut entries: Vec<(String, String)> = Vec::new();
    for caps in REGISTRY_ENTRY.captures_iter(body) {
        let label = caps[2].trim().to_string();
        let url = caps[3].trim().to_string();
        entries.push((url, label));
    }
    if entries.is_empty() {
        return text.to_string();
    }

    let delim = section_delim();
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..section_start]);
    out.push_str(&delim);
    out.push('\n');
    out.push_str("SOURCES REGISTRY\n");
    out.push_str(&delim);
    out.push_str("\n\n");

    let mut num = 1;
    for bucket in DISPLAY_ORDER {
        let mut grouped: Vec<&(String, String)> = entries
            .iter()
            .filter(|(url, label)| tag_source(url, label, used_links) == bucket)
            .collect();
        if grouped.is_empty() {
            continue;
        }
        grouped.sort_by(|a, b| a.1.to_lowercase().cmp(&b.1.to_lowercase()));

        out.push_str(&format!("{}:\n\n", bucket.display_label()));
        for (url, label) in grouped {
            out.push_str(&format!("[{}] {}\n    {}\n\n", num, label, url));
            num += 1;
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_text(entries: &[(&str, &str)]) -> String {
        let delim = section_delim();
        let mut text = format!("body\n\n{}\nSOURCES REGISTRY\n{}\n\n", delim, delim);
        for (i, (label, url)) in entries.iter().enumerate() {
            text.push_str(&format!("[{}] {}\n    {}\n\n", i + 1, label, url));
        }
        text
    }

    #[test]
    fn test_tag_source_used_links_wins() {
        let mut used = HashSet::new();
        used.insert("https://example.com/research".to_string());
        assert_eq!(
            tag_source("https://example.com/research", "example.com/research", Some(&used)),
            SourceBucket::UsedInDrafts
        );
    }

    #[test]
    fn test_tag_source_candidate_before_domain() {
        // "report" is a candidate keyword even on a news domain
        assert_eq!(
            tag_source("https://bbc.co.uk/report/1", "bbc.co.uk/report/1", None),
            SourceBucket::Candidate
        );
        assert_eq!(
            tag_source("https://bbc.co.uk/item", "bbc.co.uk/item", None),
            SourceBucket::Media
        );
    }

    #[test]
    fn test_tag_source_buckets() {
        assert_eq!(
            tag_source("https://www12.senado.leg.br/x", "senado.leg.br/x", None),
            SourceBucket::Legal
        );
        assert_eq!(
            tag_source("https://bloomberg.com/x", "bloomberg.com/x", None),
            SourceBucket::Economic
        );
        assert_eq!(
            tag_source("https://site.io/meeting-memo", "site.io/meeting-memo", None),
            SourceBucket::Internal
        );
        assert_eq!(
            tag_source("https://plain.example/x", "plain.example/x", None),
            SourceBucket::Other
        );
    }

    #[test]
    fn test_reorganize_groups_and_renumbers() {
        let text = registry_text(&[
            ("plain.example/x", "https://plain.example/x"),
            ("reuters.com/item", "https://reuters.com/item"),
        ]);
        let out = reorganize_sources_section(&text, None);
        assert!(out.contains("Media Sources:\n\n[1] reuters.com/item"));
        assert!(out.contains("Other Sources:\n\n[2] plain.example/x"));
        assert!(out.starts_with("body\n\n"));
    }

    #[test]
    fn test_reorganize_sorts_within_bucket() {
        let text = registry_text(&[
            ("zeta.example/b", "https://zeta.example/b"),
            ("Alpha.example/a", "https://alpha.example/a"),
        ]);
        let out = reorganize_sources_section(&text, None);
        let alpha = out.find("[1] Alpha.example/a").unwrap();
        let zeta = out.find("[2] zeta.example/b").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_reorganize_without_registry_is_noop() {
        let text = "no registry here\n";
        assert_eq!(reorganize_sources_section(text, None), text);
    }
}
