use std::sync::LazyLock;

use regex::Regex;

use crate::models::ConversationItem;
use crate::utils::ts_to_date_str;

const PRIORITY_KEYWORDS: [&str; 8] = [
    "draft", "decision", "deliverable", "output", "final", "review", "summary", "analysis",
];

static NUMBERED_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").expect("valid regex"));

fn is_section_header(line: &str) -> bool {
    line.starts_with("##") || line.starts_with("===") || NUMBERED_SECTION.is_match(line)
}

fn header_label(line: &str) -> String {
    line.trim()
        .trim_start_matches('#')
        .trim()
        .trim_start_matches('=')
        .trim()
        .to_string()
}

fn date_or_unknown(ctime: f64) -> String {
    if ctime > 0.0 { ts_to_date_str(ctime) } else { "Unknown".to_string() }
}

/// Generate the navigational index placed at the top of the working
/// document: a timeline of the latest conversations, keyword-and-recency
/// scored priority threads, and section navigation over the cleaned text.
pub fn generate_working_index(
    text: &str,
    conversations: &[ConversationItem],
    topics: &[String],
    now: f64,
) -> String {
    let mut out = String::from("## WORKING INDEX\n\n");

    if !conversations.is_empty() {
        out.push_str("### Timeline\n\n");
        let mut sorted: Vec<&ConversationItem> = conversations.iter().collect();
        sorted.sort_by(|a, b| b.create_time.total_cmp(&a.create_time));
        for conv in sorted.iter().take(10) {
            let cid_label = if conv.id.is_empty() {
                "unknown".to_string()
            } else {
                format!("{}...", conv.id.chars().take(8).collect::<String>())
            };
            out.push_str(&format!(
                "  - {}: {} (ID: {})\n",
                date_or_unknown(conv.create_time),
                conv.title,
                cid_label
            ));
        }
        out.push('\n');
    }

    if !conversations.is_empty() && !topics.is_empty() {
        out.push_str("### Priority Threads (Read These First)\n\n");

        let mut scored: Vec<(f64, &ConversationItem)> = Vec::new();
        for conv in conversations {
            let title_lower = conv.title.to_lowercase();
            let mut score = 0.0_f64;

            for kw in PRIORITY_KEYWORDS {
                if title_lower.contains(kw) {
                    score += 2.0;
                }
            }
            for topic in topics {
                if title_lower.contains(&topic.to_lowercase()) {
                    score += 3.0;
                }
            }
            if conv.create_time > 0.0 {
                let days_ago = (now - conv.create_time) / 86400.0;
                if days_ago < 30.0 {
                    score += (30.0 - days_ago) / 10.0;
                }
            }

            if score > 0.0 {
                scored.push((score, conv));
            }
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (i, (_score, conv)) in scored.iter().take(5).enumerate() {
            out.push_str(&format!(
                "  {}. [{}] {}\n",
                i + 1,
                date_or_unknown(conv.create_time),
                conv.title
            ));
        }
        out.push('\n');
    }

    out.push_str("### Sections\n\n");
    let mut section_num = 0;
    for (i, line) in text.split('\n').enumerate() {
        if !is_section_header(line) {
            continue;
        }
        section_num += 1;
        let header = header_label(line);
        if !header.is_empty() && header != "WORKING INDEX" {
            out.push_str(&format!("  {:02}. Line ~{}: {}\n", section_num, i, header));
        }
    }

    out.push_str("\n---\n\n");
    out
}
