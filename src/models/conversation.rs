use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading branch marker on forked conversation titles, e.g. "Branch · Trip",
/// "Branch - Trip" or "Branch: Trip".
static BRANCH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*branch\s*[·\-:]\s*").expect("valid regex"));

/// A single conversation message, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Epoch seconds; zero when the export carried no usable time.
    #[serde(default)]
    pub timestamp: f64,
    pub role: String,
    pub text: String,
}

/// A normalized conversation record: one root or branch thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub create_time: f64,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Title with any leading branch marker removed; derived, read-only.
    #[serde(skip)]
    pub base_title: String,
}

impl ConversationItem {
    pub fn new(id: String, title: String, create_time: f64, messages: Vec<Message>) -> Self {
        let base_title = base_title(&title);
        ConversationItem { id, title, create_time, messages, base_title }
    }

    /// The non-empty grouping key: base title, then title, then id.
    pub fn group_key(&self) -> &str {
        if !self.base_title.is_empty() {
            &self.base_title
        } else if !self.title.is_empty() {
            &self.title
        } else {
            &self.id
        }
    }

    /// Title for display, never empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() { "Untitled" } else { &self.title }
    }
}

/// Strip a leading branch marker from a title and normalize whitespace.
pub fn base_title(title: &str) -> String {
    let trimmed = title.trim();
    BRANCH_MARKER.replace(trimmed, "").trim().to_string()
}
