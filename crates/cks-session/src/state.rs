//! Session state types

use chrono::{DateTime, Utc};
use cks_core::types::{ChecklistItem, Turn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Greeting seeded as the first assistant turn of every session.
pub const GREETING: &str = "Hi! I can help you design a cloud architecture. \
Try a request like \"two EC2 instances in the Seoul region\" and I will \
sketch the architecture as a tree. What should we build?";

/// State owned by one interactive session.
///
/// The transcript is append-only: turns are never edited or removed once
/// appended. Only `current_tree` and the result fields mutate in place,
/// and the tree is always overwritten whole, never extended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// ULID identifier (26 characters, Crockford Base32)
    pub session_id: String,

    /// When this session was created
    pub created_at: DateTime<Utc>,

    /// Ordered transcript, seeded with the greeting.
    turns: Vec<Turn>,

    /// The single live architecture tree (empty until first extraction).
    current_tree: String,

    /// Path of the most recently resolved diagram image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_diagram: Option<PathBuf>,

    /// Whether a diagram was produced during this session.
    #[serde(default)]
    pub diagram_created: bool,

    /// Latest security-analysis text (empty until first analysis).
    #[serde(default)]
    pub security_analysis: String,

    /// When the latest analysis was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_timestamp: Option<DateTime<Utc>>,

    /// Checklist toggle state; items absent from the map are off.
    #[serde(default)]
    toggles: HashMap<ChecklistItem, bool>,
}

impl SessionState {
    /// Fresh session: transcript holds only the greeting, the tree and the
    /// analysis are empty, no diagram exists, and every toggle is off.
    pub fn new() -> Self {
        Self {
            session_id: ulid::Ulid::new().to_string(),
            created_at: Utc::now(),
            turns: vec![Turn::assistant(GREETING)],
            current_tree: String::new(),
            current_diagram: None,
            diagram_created: false,
            security_analysis: String::new(),
            analysis_timestamp: None,
            toggles: HashMap::new(),
        }
    }

    /// Read-only view of the transcript.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn append_user_turn(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub(crate) fn append_assistant_turn(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    pub fn current_tree(&self) -> &str {
        &self.current_tree
    }

    /// Overwrite the live tree. There is never more than one.
    pub fn replace_tree(&mut self, tree: String) {
        debug!(session = %self.session_id, chars = tree.len(), "replacing current tree");
        self.current_tree = tree;
    }

    /// Clear the live tree so the next exchange starts from scratch.
    pub fn reset_tree(&mut self) {
        debug!(session = %self.session_id, "resetting current tree");
        self.current_tree.clear();
    }

    /// Record a resolved diagram artifact for this session.
    pub fn record_diagram(&mut self, path: PathBuf) {
        self.current_diagram = Some(path);
        self.diagram_created = true;
    }

    /// Store an analysis result (or its user-visible error text) verbatim.
    pub fn record_analysis(&mut self, analysis: String, at: DateTime<Utc>) {
        self.security_analysis = analysis;
        self.analysis_timestamp = Some(at);
    }

    pub fn is_toggled(&self, item: ChecklistItem) -> bool {
        self.toggles.get(&item).copied().unwrap_or(false)
    }

    pub fn set_toggle(&mut self, item: ChecklistItem, on: bool) {
        self.toggles.insert(item, on);
    }

    /// Checked items in the checklist's declared order.
    pub fn checked_items(&self) -> Vec<ChecklistItem> {
        crate::checklist::checked_items(&self.toggles)
    }

    pub(crate) fn toggles(&self) -> &HashMap<ChecklistItem, bool> {
        &self.toggles
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
