use std::sync::LazyLock;

use regex::Regex;

/// The literal header framing the research-log appendix. The working
/// document must contain this line exactly once when artifacts were
/// quarantined, and never otherwise.
pub const APPENDIX_HEADER: &str = "APPENDIX: RESEARCH LOG & TOOL ARTIFACTS";

static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z]").expect("valid regex"));

/// Detect appendix header lines robustly: reduce the line to letters only so
/// punctuation, soft hyphens and spacing variants still register.
pub fn is_appendix_header_line(line: &str) -> bool {
    let letters = NON_LETTERS.replace_all(line, "").to_uppercase();
    letters.contains("APPENDIX") && letters.contains("RESEARCHLOGTOOLARTIFACTS")
}

/// Drop everything from a pre-existing appendix header onward, including a
/// delimiter line directly above it. Guards against an old appendix being
/// duplicated when the assembler emits the real one.
pub fn strip_existing_appendix(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    for (idx, line) in lines.iter().enumerate() {
        if is_appendix_header_line(line) {
            let mut end = idx;
            if end > 0 && lines[end - 1].len() >= 60 && lines[end - 1].bytes().all(|b| b == b'=')
            {
                end -= 1;
            }
            return lines[..end].join("\n").trim_end().to_string();
        }
    }
    text.to_string()
}

/// Remove any stray appendix header lines wherever they occur.
pub fn remove_appendix_header_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| !is_appendix_header_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Final safety pass: keep the first appendix header occurrence and strip
/// the marker token from any later occurrence, preserving surrounding text.
pub fn dedupe_appendix_header(text: &str) -> String {
    let parts: Vec<&str> = text.split(APPENDIX_HEADER).collect();
    if parts.len() <= 2 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    out.push_str(parts[0]);
    out.push_str(APPENDIX_HEADER);
    out.push_str(parts[1]);
    for part in &parts[2..] {
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_appendix_header_line_variants() {
        assert!(is_appendix_header_line("APPENDIX: RESEARCH LOG & TOOL ARTIFACTS"));
        assert!(is_appendix_header_line("appendix - research log / tool artifacts"));
        assert!(is_appendix_header_line("APPENDIX: RESEARCH\u{00ad}LOG & TOOL ARTIFACTS"));
        assert!(!is_appendix_header_line("APPENDIX: NOTES"));
        assert!(!is_appendix_header_line("RESEARCH LOG"));
    }

    #[test]
    fn test_strip_existing_appendix_drops_tail() {
        let delim = "=".repeat(70);
        let text = format!(
            "body line\n\n{}\nAPPENDIX: RESEARCH LOG & TOOL ARTIFACTS\n{}\n\nold artifact",
            delim, delim
        );
        assert_eq!(strip_existing_appendix(&text), "body line");
    }

    #[test]
    fn test_strip_existing_appendix_noop_without_header() {
        assert_eq!(strip_existing_appendix("just text"), "just text");
    }

    #[test]
    fn test_strip_existing_appendix_idempotent() {
        let text = "body\nAPPENDIX: RESEARCH LOG & TOOL ARTIFACTS\nrest";
        let once = strip_existing_appendix(text);
        assert_eq!(strip_existing_appendix(&once), once);
    }

    #[test]
    fn test_remove_appendix_header_lines() {
        let text = "keep\nAPPENDIX: RESEARCH LOG & TOOL ARTIFACTS\nkeep too";
        assert_eq!(remove_appendix_header_lines(text), "keep\nkeep too");
    }

    #[test]
    fn test_dedupe_appendix_header_keeps_first() {
        let text = format!(
            "intro {h} first tail {h} second tail {h} third",
            h = APPENDIX_HEADER
        );
        let deduped = dedupe_appendix_header(&text);
        assert_eq!(deduped.matches(APPENDIX_HEADER).count(), 1);
        // Surrounding content is preserved, only later markers are dropped
        assert!(deduped.contains("second tail"));
        assert!(deduped.contains("third"));
    }

    #[test]
    fn test_dedupe_appendix_header_single_untouched() {
        let text = format!("intro {} tail", APPENDIX_HEADER);
        assert_eq!(dedupe_appendix_header(&text), text);
    }
}
