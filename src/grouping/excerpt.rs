use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::models::Message;

/// Build a case-insensitive alternation over the literal topic strings.
///
/// Empty or whitespace-only topic lists compile to a pattern that can never
/// match, so excerpt mode degrades to "no hits" rather than "match all".
pub fn compile_topic_pattern(topics: &[String]) -> Result<Regex> {
    let parts: Vec<String> =
        topics.iter().filter(|t| !t.trim().is_empty()).map(|t| regex::escape(t)).collect();
    let pattern = if parts.is_empty() {
        // 'a' followed by start-of-text: unsatisfiable
        "a^".to_string()
    } else {
        parts.join("|")
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .context("Failed to compile topic pattern")
}

/// Reduce a message sequence to topic hits plus `context` messages of
/// surrounding context, clamped to bounds, in original order.
pub fn excerpt_messages(msgs: &[Message], pattern: &Regex, context: usize) -> Vec<Message> {
    if msgs.is_empty() {
        return Vec::new();
    }

    let mut keep = vec![false; msgs.len()];
    for (i, m) in msgs.iter().enumerate() {
        if pattern.is_match(&m.text) {
            let lo = i.saturating_sub(context);
            let hi = (i + context).min(msgs.len() - 1);
            for flag in &mut keep[lo..=hi] {
                *flag = true;
            }
        }
    }

    msgs.iter()
        .zip(keep)
        .filter_map(|(m, kept)| kept.then(|| m.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(texts: &[&str]) -> Vec<Message> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Message {
                timestamp: i as f64,
                role: "user".to_string(),
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_excerpt_hit_with_context_window() {
        let input = msgs(&["m0", "m1", "m2", "m3", "m4", "topic here", "m6", "m7"]);
        let pattern = compile_topic_pattern(&["topic".to_string()]).unwrap();

        let out = excerpt_messages(&input, &pattern, 1);
        let texts: Vec<&str> = out.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m4", "topic here", "m6"]);
    }

    #[test]
    fn test_excerpt_window_clamped_at_bounds() {
        let input = msgs(&["topic", "m1"]);
        let pattern = compile_topic_pattern(&["topic".to_string()]).unwrap();

        let out = excerpt_messages(&input, &pattern, 3);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_excerpt_overlapping_windows_union() {
        let input = msgs(&["a topic", "m1", "topic b", "m3", "m4"]);
        let pattern = compile_topic_pattern(&["topic".to_string()]).unwrap();

        let out = excerpt_messages(&input, &pattern, 1);
        // Union of [0..=1] and [1..=3]; each message appears once
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_excerpt_no_hits_is_empty() {
        let input = msgs(&["m0", "m1"]);
        let pattern = compile_topic_pattern(&["missing".to_string()]).unwrap();
        assert!(excerpt_messages(&input, &pattern, 2).is_empty());
    }

    #[test]
    fn test_excerpt_case_insensitive() {
        let input = msgs(&["TARIFF news"]);
        let pattern = compile_topic_pattern(&["tariff".to_string()]).unwrap();
        assert_eq!(excerpt_messages(&input, &pattern, 0).len(), 1);
    }

    #[test]
    fn test_empty_topics_never_match() {
        let input = msgs(&["anything", "a"]);
        let pattern = compile_topic_pattern(&[]).unwrap();
        assert!(excerpt_messages(&input, &pattern, 0).is_empty());
    }

    #[test]
    fn test_topic_strings_are_escaped() {
        let input = msgs(&["price (usd)"]);
        let pattern = compile_topic_pattern(&["(usd)".to_string()]).unwrap();
        assert_eq!(excerpt_messages(&input, &pattern, 0).len(), 1);
    }
}
