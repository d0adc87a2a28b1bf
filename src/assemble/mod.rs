//! Working-document assembly: runs the cleaning pipeline over the raw
//! narrative, prefixes front matter and the working index, and emits the
//! research appendix exactly once at the end.
//!
//! The assembler fails hard only when cleaning leaves nothing to publish.
//! Integrity problems detected after assembly (a duplicated appendix header
//! slipping through) are warned to stderr, never fatal: a dossier with a
//! cosmetic defect still beats no dossier.

use anyhow::{Result, bail};

use crate::cleaning::{
    APPENDIX_HEADER, MIN_BLOCK_SIZE, deduplicate_blocks, dedupe_appendix_header,
    extract_deliverables, extract_research_artifacts, filter_artifacts,
    reorganize_sources_section, run_base_stages,
};
use crate::config::{generate_completeness_check, generate_control_layer};
use crate::index::{generate_working_index, generate_working_index_with_tags};
use crate::models::{BuildOptions, ConversationItem, RenderContext};
use crate::render::section_delim;

const APPENDIX_PREAMBLE: &str = "This section contains metadata, tool-call fragments, and provenance\ninformation from the research extraction process.\n\n";

/// Run the full cleaning pipeline and assemble the working document.
///
/// `conversations` are the items that went into the raw narrative; they feed
/// the working index and the completeness check.
pub fn build_working_document(
    raw_txt: &str,
    conversations: &[ConversationItem],
    topics: &[String],
    opts: &BuildOptions,
    ctx: &RenderContext,
) -> Result<String> {
    let mut working = run_base_stages(raw_txt);

    if opts.dedup {
        working = deduplicate_blocks(&working, MIN_BLOCK_SIZE);
    }
    if let Some(patterns) = &opts.patterns {
        working = extract_deliverables(&working, patterns);
    }

    working = reorganize_sources_section(&working, opts.used_links.as_ref());

    let (cleaned, artifacts) = extract_research_artifacts(&working);
    working = cleaned;
    let artifacts = filter_artifacts(artifacts);

    if let Some(config) = &opts.config {
        let control_layer = generate_control_layer(config);
        let completeness = generate_completeness_check(conversations, ctx.generated_at);
        let delim = section_delim();
        working = format!(
            "{}COMPLETENESS CHECK\n{}\n{}\n{}\n\n{}",
            control_layer, delim, completeness, delim, working
        );
    }

    if working.trim().is_empty() {
        bail!("No included threads or segments survived cleaning; check filters, keywords and patterns");
    }

    let (index, coverage) = match &opts.config {
        Some(config) => generate_working_index_with_tags(conversations, config),
        None => (
            generate_working_index(&working, conversations, topics, ctx.generated_at),
            Vec::new(),
        ),
    };

    let mut final_txt = index;
    if !coverage.is_empty() {
        final_txt.push('\n');
        final_txt.push_str(&coverage.join("\n"));
    }
    final_txt.push('\n');
    final_txt.push_str(&working);

    let append_expected = !artifacts.is_empty();
    if append_expected {
        let delim = section_delim();
        final_txt.push_str(&format!(
            "\n\n{}\n{}\n{}\n\n{}{}",
            delim,
            APPENDIX_HEADER,
            delim,
            APPENDIX_PREAMBLE,
            artifacts.join("\n\n")
        ));
    }

    final_txt = dedupe_appendix_header(&final_txt);

    if append_expected {
        let header_count = final_txt.matches(APPENDIX_HEADER).count();
        if header_count != 1 {
            eprintln!(
                "WARNING: Appendix header appears {} times (expected 1)",
                header_count
            );
        }
        let marker_count = final_txt.matches("RESEARCH LOG & TOOL ARTIFACTS").count();
        if marker_count != 1 {
            eprintln!(
                "WARNING: 'RESEARCH LOG & TOOL ARTIFACTS' appears {} times (expected 1)",
                marker_count
            );
        }
    }

    Ok(final_txt)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::Message;

    const NOW: f64 = 1_700_000_000.0;

    fn ctx() -> RenderContext {
        RenderContext::new(NOW, PathBuf::from("/tmp/source"))
    }

    fn conv(id: &str, title: &str, create_time: f64) -> ConversationItem {
        ConversationItem::new(
            id.to_string(),
            title.to_string(),
            create_time,
            vec![Message {
                timestamp: create_time,
                role: "user".to_string(),
                text: "hello".to_string(),
            }],
        )
    }

    #[test]
    fn test_appendix_emitted_once_with_artifacts() {
        let raw = "Useful finding about tariffs.\n\n[Search Query] tariff pass-through evidence basis\n";
        let convs = vec![conv("c1", "Tariff thread", NOW)];
        let out = build_working_document(raw, &convs, &[], &BuildOptions::default(), &ctx()).unwrap();
        assert_eq!(out.matches(APPENDIX_HEADER).count(), 1);
        assert!(out.contains("[Search Fragment] [Search Query] tariff pass-through"));
        assert!(out.contains("This section contains metadata"));
        // The artifact line left the body
        let body_end = out.find(APPENDIX_HEADER).unwrap();
        assert!(!out[..body_end].contains("[Search Query]"));
    }

    #[test]
    fn test_no_appendix_without_artifacts() {
        let raw = "Plain narrative only.\n";
        let out =
            build_working_document(raw, &[], &[], &BuildOptions::default(), &ctx()).unwrap();
        assert!(!out.contains(APPENDIX_HEADER));
    }

    #[test]
    fn test_stray_appendix_header_does_not_duplicate() {
        let raw = format!(
            "Finding one.\n\n[Search Query] fresh tool fragment capture\n\n{}\nold artifact text\n",
            APPENDIX_HEADER
        );
        let out =
            build_working_document(&raw, &[], &[], &BuildOptions::default(), &ctx()).unwrap();
        assert_eq!(out.matches(APPENDIX_HEADER).count(), 1);
        assert!(!out.contains("old artifact text"));
    }

    #[test]
    fn test_empty_after_cleaning_is_fatal() {
        let raw = "[tool_call: browser.open]\n";
        let err = build_working_document(raw, &[], &[], &BuildOptions::default(), &ctx())
            .unwrap_err();
        assert!(err.to_string().contains("No included threads"));
    }

    #[test]
    fn test_config_adds_front_matter_and_tagged_index() {
        let config = serde_json::from_str(
            r#"{
                "column_name": "Trade Watch",
                "thread_filters": {"include": {"tariff_policy": ["tariff"]}},
                "control_layer_sections": {"scope_router": "Tariff mechanics only."}
            }"#,
        )
        .unwrap();
        let opts = BuildOptions { config: Some(config), ..BuildOptions::default() };
        let convs = vec![conv("c1", "Tariff modeling", NOW - 86400.0)];
        let out = build_working_document("Body text.\n", &convs, &[], &opts, &ctx()).unwrap();

        assert!(out.starts_with("PRIORITY THREADS (with category tags)\n"));
        assert!(out.contains("COVERAGE AUDIT"));
        assert!(out.contains("[TARIFF] Tariff modeling"));
        assert!(out.contains("CONTROL LAYER — Trade Watch"));
        assert!(out.contains("COMPLETENESS CHECK"));
        assert!(out.contains("Recent matches (< 7 days): 1."));
        assert!(out.contains("Body text."));
    }

    #[test]
    fn test_standard_index_without_config() {
        let convs = vec![conv("c1", "Tariff draft", NOW)];
        let topics = vec!["tariff".to_string()];
        let out = build_working_document("## Findings\nBody.\n", &convs, &topics, &BuildOptions::default(), &ctx())
            .unwrap();
        assert!(out.starts_with("## WORKING INDEX\n\n"));
        assert!(out.contains("### Timeline"));
        assert!(out.contains("### Priority Threads (Read These First)"));
        assert!(out.contains("### Sections"));
    }

    #[test]
    fn test_deliverables_and_dedup_options() {
        let long = "z".repeat(250);
        let raw = format!(
            "## Decision\npick option B\n\nchatter to drop\n\n## Notes\n{}\n\n## Notes\n{}\n",
            long, long
        );
        let opts = BuildOptions {
            dedup: true,
            patterns: Some(Vec::new()),
            ..BuildOptions::default()
        };
        let out = build_working_document(&raw, &[], &[], &opts, &ctx()).unwrap();
        assert!(out.contains("pick option B"));
        assert!(!out.contains("chatter to drop"));
        // The repeated long paragraph survives only once
        assert_eq!(out.matches(&long).count(), 1);
    }
}
