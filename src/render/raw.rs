use anyhow::Result;

use crate::grouping::{Group, compile_topic_pattern, excerpt_messages, trim_branch_new_part};
use crate::models::{BuildMode, BuildOptions, Message, RenderContext};
use crate::render::sources::{dedupe_sources, extract_sources, registry_section, section_delim};
use crate::utils::{ts_to_date_str, ts_to_rfc3339};

/// Render the raw dossier narrative.
///
/// Layout: header block, table of contents, one numbered section per group
/// (root messages, then each branch's reconciled suffix under a branch
/// marker), and the deduplicated sources registry at the end.
pub fn render_raw(
    groups: &[Group],
    topics: &[String],
    opts: &BuildOptions,
    ctx: &RenderContext,
) -> Result<String> {
    let topic_pattern = compile_topic_pattern(topics)?;
    let topic_label =
        if topics.is_empty() { "Dossier".to_string() } else { topics.join(", ") };

    let mut out = String::new();
    out.push_str(&format!("DOSSIER: {}\n", topic_label));
    out.push_str(&format!("Generated: {}\n", ts_to_rfc3339(ctx.generated_at)));
    out.push_str(&format!("Source: {}\n", ctx.source_root.display()));
    out.push('\n');

    out.push_str(&generate_toc(groups));

    let delim = section_delim();
    let mut all_sources = Vec::new();

    for (num, group) in groups.iter().enumerate() {
        let root = group.root();
        out.push_str(&format!("\n{}\n", delim));
        out.push_str(&format!("{}. {}\n", num + 1, root.display_title()));
        out.push_str(&format!("{}\n\n", delim));

        let root_msgs = match opts.mode {
            BuildMode::Full => root.messages.clone(),
            BuildMode::Excerpts => excerpt_messages(&root.messages, &topic_pattern, opts.context),
        };

        if root_msgs.is_empty() {
            out.push_str(match opts.mode {
                BuildMode::Excerpts => "[No matching excerpts in root conversation.]\n\n",
                BuildMode::Full => "[No messages in root conversation.]\n\n",
            });
        } else {
            for msg in &root_msgs {
                push_message(&mut out, msg);
                all_sources.extend(extract_sources(&msg.text));
            }
        }

        for (branch_idx, branch) in group.branches().iter().enumerate() {
            out.push_str(&format!(
                "\n--- Branch {}: {} ---\n\n",
                branch_idx + 1,
                branch.display_title()
            ));

            // Reconcile against the full root history before any excerpting
            let mut branch_msgs = trim_branch_new_part(&root.messages, &branch.messages);
            if opts.mode == BuildMode::Excerpts {
                branch_msgs = excerpt_messages(&branch_msgs, &topic_pattern, opts.context);
            }

            if branch_msgs.is_empty() {
                out.push_str(match opts.mode {
                    BuildMode::Excerpts => "[No matching excerpts in this branch.]\n\n",
                    BuildMode::Full => "[No new messages in this branch.]\n\n",
                });
            } else {
                for msg in &branch_msgs {
                    push_message(&mut out, msg);
                    all_sources.extend(extract_sources(&msg.text));
                }
            }
        }
    }

    let unique = dedupe_sources(all_sources);
    if !unique.is_empty() {
        out.push_str(&registry_section(&unique));
    }

    Ok(out)
}

fn push_message(out: &mut String, msg: &Message) {
    out.push_str(&format!("{}:\n\n{}\n\n", capitalize_role(&msg.role), msg.text));
}

fn capitalize_role(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Table of contents with estimated line offsets (informational only).
fn generate_toc(groups: &[Group]) -> String {
    let mut toc = String::from("## TABLE OF CONTENTS\n");
    // Header plus metadata occupy roughly this many lines
    let mut line_num: usize = 10;

    for group in groups {
        let root = group.root();
        let branch_count = group.branches().len();

        let mut label = format!("Line ~{}: {}", line_num, root.display_title());
        if branch_count > 0 {
            label.push_str(&format!(
                " (+{} branch{})",
                branch_count,
                if branch_count != 1 { "es" } else { "" }
            ));
        }
        label.push_str(&format!(" - {}", ts_to_date_str(root.create_time)));
        toc.push_str(&format!("  {}\n", label));

        // Rough per-section estimate: message-count heuristics plus separators
        let mut est = (root.messages.len() / 3).max(10);
        for branch in group.branches() {
            est += (branch.messages.len() / 5).max(8);
        }
        line_num += est + 3;
    }

    toc.push('\n');
    toc
}
