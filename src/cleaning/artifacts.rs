use std::sync::LazyLock;

use regex::Regex;

use crate::cleaning::appendix::is_appendix_header_line;
use crate::cleaning::stages::{JSON_TOOL_ANNOTATION, ZERO_WIDTH};
use crate::utils::truncate_chars;

/// A quarantined tool-call fragment destined for the research appendix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub label: &'static str,
    pub snippet: String,
}

impl Artifact {
    pub fn render(&self) -> String {
        format!("[{}] {}...", self.label, self.snippet)
    }
}

struct ArtifactPattern {
    regex: &'static LazyLock<Regex>,
    label: &'static str,
}

static SEARCH_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Search Query\].*").expect("valid regex"));
static JSON_CALL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[JSON/Tool Call\].*").expect("valid regex"));
static INLINE_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\\{\".*?\\}").expect("valid regex"));
static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Image.*?\]").expect("valid regex"));
static MODEL_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[GPT Model.*?\]").expect("valid regex"));
static CITATION_WIDGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Citation Widget.*?\]").expect("valid regex"));

const DROP_LABEL: &str = "JSON/Tool Call";

static PATTERNS: [ArtifactPattern; 6] = [
    ArtifactPattern { regex: &SEARCH_QUERY, label: "Search Fragment" },
    ArtifactPattern { regex: &JSON_CALL_LINE, label: DROP_LABEL },
    ArtifactPattern { regex: &INLINE_JSON, label: DROP_LABEL },
    ArtifactPattern { regex: &IMAGE_REF, label: "Image Reference" },
    ArtifactPattern { regex: &MODEL_INFO, label: "Model Info" },
    ArtifactPattern { regex: &CITATION_WIDGET, label: "Citation Widget" },
];

/// Pull tool-call fragments out of the working text into a quarantine list.
///
/// Lines whose match is a JSON blob are dropped outright. Other matches are
/// captured only when substantial (over 20 characters), with the snippet
/// capped at 200 characters. Stray appendix header lines are removed here as
/// an extra guard.
pub fn extract_research_artifacts(text: &str) -> (String, Vec<Artifact>) {
    let mut artifacts: Vec<Artifact> = Vec::new();
    let mut kept: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let normalized = ZERO_WIDTH.replace_all(line, "");
        if is_appendix_header_line(&normalized) {
            continue;
        }
        if JSON_TOOL_ANNOTATION.is_match(&normalized) {
            continue;
        }

        let mut found = false;
        for pat in &PATTERNS {
            let Some(m) = pat.regex.find(&normalized) else {
                continue;
            };
            let snippet = truncate_chars(m.as_str(), 200).to_string();
            if is_appendix_header_line(&snippet) {
                found = true;
                break;
            }
            if pat.label == DROP_LABEL {
                found = true;
                break;
            }
            if m.as_str().chars().count() > 20 {
                artifacts.push(Artifact { label: pat.label, snippet });
                found = true;
                break;
            }
        }

        if !found {
            kept.push(line);
        }
    }

    (kept.join("\n"), artifacts)
}

/// Drop rendered artifacts that would smuggle appendix markers or tool-call
/// annotations back into the document.
pub fn filter_artifacts(artifacts: Vec<Artifact>) -> Vec<String> {
    artifacts
        .into_iter()
        .map(|a| a.render())
        .filter(|rendered| {
            !rendered.contains("APPENDIX: RESEARCH LOG")
                && !rendered.contains("RESEARCH LOG & TOOL ARTIFACTS")
                && !rendered.contains("JSON/Tool Call")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_captures_long_search_fragment() {
        let text = "before\n[Search Query] how to model tariff pass-through rates\nafter";
        let (cleaned, artifacts) = extract_research_artifacts(text);
        assert_eq!(cleaned, "before\nafter");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].label, "Search Fragment");
        assert!(artifacts[0].render().starts_with("[Search Fragment] [Search Query]"));
        assert!(artifacts[0].render().ends_with("..."));
    }

    #[test]
    fn test_extract_short_match_keeps_line() {
        // Bracket markers of 20 chars or fewer stay in the body
        let text = "see [Image: map]";
        let (cleaned, artifacts) = extract_research_artifacts(text);
        assert_eq!(cleaned, text);
        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_extract_drops_json_lines_without_capture() {
        let text = "keep\n[JSON/Tool Call] {\"query\": \"x\"}\n{\"cmd\": \"run_full_pipeline\"}\nkeep2";
        let (cleaned, artifacts) = extract_research_artifacts(text);
        assert_eq!(cleaned, "keep\nkeep2");
        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_extract_drops_stray_appendix_header() {
        let text = "a\nAPPENDIX: RESEARCH LOG & TOOL ARTIFACTS\nb";
        let (cleaned, artifacts) = extract_research_artifacts(text);
        assert_eq!(cleaned, "a\nb");
        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_extract_snippet_capped_at_200_chars() {
        let long = format!("[Citation Widget {}]", "x".repeat(400));
        let (_, artifacts) = extract_research_artifacts(&long);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].snippet.chars().count(), 200);
    }

    #[test]
    fn test_filter_artifacts_removes_markers() {
        let artifacts = vec![
            Artifact { label: "Model Info", snippet: "[GPT Model: research preview]".into() },
            Artifact {
                label: "Search Fragment",
                snippet: "[Search Query] APPENDIX: RESEARCH LOG & TOOL ARTIFACTS".into(),
            },
        ];
        let rendered = filter_artifacts(artifacts);
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].contains("Model Info"));
    }
}
