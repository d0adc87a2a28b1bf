use crate::config::schema::ColumnConfig;
use crate::models::ConversationItem;
use crate::render::section_delim;
use crate::utils::ts_to_date_str;

/// Render the control-layer front matter from the config sections. Sections
/// absent from the config are omitted entirely.
pub fn generate_control_layer(config: &ColumnConfig) -> String {
    let delim = section_delim();
    let column_name = config.column_name.as_deref().unwrap_or("Report");

    let mut lines: Vec<String> = vec![
        delim.clone(),
        format!("CONTROL LAYER — {}", column_name),
        delim.clone(),
        String::new(),
    ];

    let sections = &config.control_layer_sections;

    if let Some(scope_router) = &sections.scope_router {
        lines.push("SCOPE ROUTER".to_string());
        lines.push(String::new());
        lines.push(scope_router.clone());
        lines.push(String::new());
    }

    if !sections.do_not_repeat_rules.is_empty() {
        lines.push("DO-NOT-REPEAT RULES".to_string());
        lines.push(String::new());
        for rule in &sections.do_not_repeat_rules {
            lines.push(format!("• {}", rule));
        }
        lines.push(String::new());
    }

    if let Some(mechanism_focus) = &sections.mechanism_focus {
        lines.push("MECHANISM FOCUS (from OP v2)".to_string());
        lines.push(String::new());
        lines.push(mechanism_focus.clone());
        lines.push(String::new());
    }

    if let Some(evidence) = &sections.evidence_vs_inference {
        lines.push("EVIDENCE VS INFERENCE".to_string());
        lines.push(String::new());
        lines.push(evidence.clone());
        lines.push(String::new());
    }

    if !sections.stress_tests.is_empty() {
        lines.push("STRESS TESTS".to_string());
        lines.push(String::new());
        for test in &sections.stress_tests {
            lines.push(format!("• {}", test));
        }
        lines.push(String::new());
    }

    lines.push(delim);
    lines.push(String::new());

    lines.join("\n")
}

/// Summary statistics over the conversations that made it into the build.
/// `now` is the wall-clock instant threaded from the render context.
pub fn generate_completeness_check(convs: &[ConversationItem], now: f64) -> String {
    if convs.is_empty() {
        return "No conversations found.".to_string();
    }

    let dates: Vec<f64> = convs
        .iter()
        .map(|c| c.create_time)
        .filter(|t| *t > 0.0)
        .collect();
    if dates.is_empty() {
        return "No date information available.".to_string();
    }

    let latest = dates.iter().cloned().fold(f64::MIN, f64::max);
    let recent_matches = dates.iter().filter(|d| now - **d < 7.0 * 86400.0).count();

    format!(
        "Searched conversations up to {}.\nLast relevant match: {}.\nRecent matches (< 7 days): {}.\nTotal conversations in dossier: {}.",
        ts_to_date_str(now),
        ts_to_date_str(latest),
        recent_matches,
        convs.len()
    )
}
