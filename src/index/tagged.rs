use std::collections::BTreeMap;

use crate::config::{ColumnConfig, matches_thread_filter, short_tag};
use crate::models::ConversationItem;
use crate::render::section_delim;
use crate::utils::ts_to_rfc3339;

/// Generate the tagged priority-thread index plus the coverage audit.
///
/// Every conversation with an id and a title is listed; the tag comes from
/// the first matching include bucket, with `OTHER` as the fallback. The
/// coverage audit counts listed threads per tag.
pub fn generate_working_index_with_tags(
    conversations: &[ConversationItem],
    config: &ColumnConfig,
) -> (String, Vec<String>) {
    if conversations.is_empty() {
        return (String::new(), Vec::new());
    }

    let delim = section_delim();
    let mut index = format!("PRIORITY THREADS (with category tags)\n{}\n", delim);

    let mut threads: Vec<(&ConversationItem, String)> = Vec::new();
    let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();

    for conv in conversations {
        if conv.id.is_empty() || conv.title.is_empty() {
            continue;
        }
        let (_included, bucket) = matches_thread_filter(&conv.title, config);
        let tag = short_tag(bucket.as_deref());
        *tag_counts.entry(tag.clone()).or_insert(0) += 1;
        threads.push((conv, tag));
    }

    threads.sort_by(|a, b| a.0.create_time.total_cmp(&b.0.create_time));

    for (conv, tag) in &threads {
        index.push_str(&format!(
            "[{}] {}\n  ID: {} | Created: {}\n\n",
            tag,
            conv.title,
            conv.id,
            ts_to_rfc3339(conv.create_time)
        ));
    }

    let mut coverage = vec![
        format!("\n{}", delim),
        "COVERAGE AUDIT".to_string(),
        delim,
        format!("Included threads (total): {}", threads.len()),
    ];
    for (tag, count) in &tag_counts {
        coverage.push(format!("  - [{}]: {}", tag, count));
    }
    coverage.push(String::new());

    (index, coverage)
}
