use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{ConversationItem, Message};

/// One conversation record as found in a normalized export file.
///
/// Upstream tooling owns raw-export parsing; this loader only accepts the
/// already-normalized shape, with a few field aliases tolerated so exports
/// from different normalizers load unchanged.
#[derive(Debug, Deserialize)]
struct ConversationRecord {
    #[serde(alias = "conversation_id", alias = "uuid")]
    id: String,
    #[serde(default, alias = "name")]
    title: String,
    #[serde(default, deserialize_with = "coerce_epoch_seconds")]
    create_time: f64,
    #[serde(default)]
    messages: Vec<MessageRecord>,
}

#[derive(Debug, Deserialize)]
struct MessageRecord {
    #[serde(default, alias = "create_time", deserialize_with = "coerce_epoch_seconds")]
    timestamp: f64,
    #[serde(default = "unknown_role")]
    role: String,
    #[serde(default)]
    text: String,
}

fn unknown_role() -> String {
    "unknown".to_string()
}

/// Accept numbers, numeric strings or null for epoch timestamps; anything
/// unusable coerces to 0.0 rather than failing the whole load.
fn coerce_epoch_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let coerced = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(coerced)
}

/// Load normalized conversation records from a JSON array file.
///
/// Empty-text messages are dropped and each record's messages are sorted by
/// timestamp (stable, so equal timestamps keep their source order).
pub fn load_conversations(path: &Path) -> Result<Vec<ConversationItem>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read conversations file: {}", path.display()))?;
    let records: Vec<ConversationRecord> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse conversations file: {}", path.display()))?;

    let mut items = Vec::with_capacity(records.len());
    for record in records {
        let mut messages: Vec<Message> = record
            .messages
            .into_iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(|m| Message { timestamp: m.timestamp, role: m.role, text: m.text })
            .collect();
        messages.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        items.push(ConversationItem::new(
            record.id,
            record.title.replace(['\t', '\n'], " ").trim().to_string(),
            record.create_time,
            messages,
        ));
    }
    Ok(items)
}
