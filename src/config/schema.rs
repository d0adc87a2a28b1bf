use std::fs;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::config::de;
use crate::input::expand_user;

/// Column-specific build constraints loaded from a JSON config file.
///
/// Unknown or mistyped keys are load-time errors at every nesting level, so
/// a typo in a filter name cannot silently disable the filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub column_name: Option<String>,
    pub column_objective: Option<String>,
    #[serde(default)]
    pub search_terms: Vec<String>,
    #[serde(default)]
    pub thread_filters: ThreadFilters,
    #[serde(default)]
    pub segment_scoring: SegmentScoring,
    #[serde(default)]
    pub op_v2_constraints: Vec<String>,
    pub dossier_contract: Option<String>,
    #[serde(default)]
    pub control_layer_sections: ControlLayerSections,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThreadFilters {
    #[serde(default, deserialize_with = "de::deserialize_include_buckets")]
    pub include: Vec<IncludeBucket>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// One named include bucket. Buckets keep their config-file order; the first
/// bucket with a matching term decides the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeBucket {
    pub name: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentScoring {
    #[serde(default)]
    pub mechanism_terms: Vec<String>,
    #[serde(default)]
    pub bridging_terms: Vec<String>,
    #[serde(default)]
    pub context_window: u32,
    #[serde(default, deserialize_with = "de::deserialize_min_score")]
    pub min_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlLayerSections {
    pub scope_router: Option<String>,
    #[serde(default)]
    pub do_not_repeat_rules: Vec<String>,
    pub mechanism_focus: Option<String>,
    pub evidence_vs_inference: Option<String>,
    #[serde(default)]
    pub stress_tests: Vec<String>,
}

/// Load and validate a column config file. Missing files and schema
/// violations are hard errors.
pub fn load_column_config(path: &str) -> Result<ColumnConfig> {
    let path = expand_user(path);
    if !path.exists() {
        bail!("Config file not found: {}", path.display());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: ColumnConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid config schema in {}", path.display()))?;
    Ok(config)
}

/// Check a thread title against the config filters. Returns whether the
/// thread is included and, if so, the name of the first matching bucket.
/// Exclude terms win over every include bucket.
pub fn matches_thread_filter(title: &str, config: &ColumnConfig) -> (bool, Option<String>) {
    if title.is_empty() {
        return (false, None);
    }

    let title_lower = title.to_lowercase();
    for exclude_term in &config.thread_filters.exclude {
        if title_lower.contains(&exclude_term.to_lowercase()) {
            return (false, None);
        }
    }

    for bucket in &config.thread_filters.include {
        for term in &bucket.terms {
            if title_lower.contains(&term.to_lowercase()) {
                return (true, Some(bucket.name.clone()));
            }
        }
    }

    (false, None)
}

/// Derive a short machine-readable tag from a bucket name, e.g.
/// `primary_research` becomes `PRIMARY`.
pub fn short_tag(bucket_name: Option<&str>) -> String {
    let Some(name) = bucket_name else {
        return "OTHER".to_string();
    };
    let tag: String = name
        .split('_')
        .next()
        .unwrap_or("")
        .to_uppercase()
        .chars()
        .take(10)
        .collect();
    if tag.is_empty() { "OTHER".to_string() } else { tag }
}
