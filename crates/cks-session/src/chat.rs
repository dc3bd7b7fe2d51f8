//! Chat and security-analysis flows against the text-generation collaborator.
//!
//! Collaborator failures never propagate out of these flows: they become
//! user-visible text inside the session (an assistant turn, or the stored
//! analysis result), and the tree is left untouched.

use chrono::Utc;
use cks_llm::TextGenerator;
use tracing::{info, warn};

use crate::extract::extract_tree;
use crate::state::SessionState;

/// Run one chat exchange.
///
/// Appends the user turn, asks the collaborator, appends the assistant
/// turn, and replaces the live tree when extraction yields text. On
/// failure the assistant turn carries an error line instead and the tree
/// is unchanged. Returns whatever was appended as the assistant turn.
pub async fn exchange(
    session: &mut SessionState,
    client: &dyn TextGenerator,
    message: &str,
) -> String {
    session.append_user_turn(message);
    let instruction = cks_prompt::build_chat_prompt(message, session.current_tree());

    match client.generate(&instruction).await {
        Ok(reply) => {
            session.append_assistant_turn(reply.clone());
            let tree = extract_tree(&reply);
            if !tree.trim().is_empty() {
                session.replace_tree(tree);
            }
            info!(session = %session.session_id, "chat exchange completed");
            reply
        }
        Err(e) => {
            warn!(session = %session.session_id, error = %e, "text generation failed");
            let message = format!("Something went wrong while generating a reply: {e}");
            session.append_assistant_turn(message.clone());
            message
        }
    }
}

/// Security Analysis Requester.
///
/// Builds the analysis instruction from the live tree and the checked
/// items, stores the reply (or a user-visible error line) verbatim with a
/// wall-clock timestamp, and returns the stored text.
pub async fn analyze(session: &mut SessionState, client: &dyn TextGenerator) -> String {
    let labels: Vec<&str> = crate::checklist::checked_items(session.toggles())
        .iter()
        .map(|item| item.label())
        .collect();
    let instruction = cks_prompt::build_analysis_prompt(session.current_tree(), &labels);

    let text = match client.generate(&instruction).await {
        Ok(reply) => {
            info!(session = %session.session_id, "security analysis completed");
            reply
        }
        Err(e) => {
            warn!(session = %session.session_id, error = %e, "security analysis failed");
            format!("Security analysis failed: {e}")
        }
    };
    session.record_analysis(text.clone(), Utc::now());
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cks_core::types::{ChecklistItem, Role};
    use cks_llm::LlmError;
    use std::sync::Mutex;

    /// Collaborator double: canned replies plus a prompt log.
    struct FakeGenerator {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, instruction: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(instruction.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(LlmError::ApiError("service unavailable".into())),
            }
        }
    }

    #[tokio::test]
    async fn test_exchange_appends_two_turns_and_updates_tree() {
        let mut session = SessionState::new();
        let client = FakeGenerator::replying("Design:\n```tree\n\u{2514}\u{2500} EC2\n```\n");
        let before = session.turns().len();

        let reply = exchange(&mut session, &client, "one instance please").await;

        assert_eq!(session.turns().len(), before + 2);
        assert_eq!(session.turns()[before].role, Role::User);
        assert_eq!(session.turns()[before + 1].role, Role::Assistant);
        assert_eq!(session.turns()[before + 1].content, reply);
        assert_eq!(session.current_tree(), "\u{2514}\u{2500} EC2");
    }

    #[tokio::test]
    async fn test_exchange_echoes_existing_tree_into_prompt() {
        let mut session = SessionState::new();
        session.replace_tree("\u{2514}\u{2500} S3".to_string());
        let client = FakeGenerator::replying("ok");

        exchange(&mut session, &client, "add a CDN").await;

        let prompt = client.last_prompt();
        assert!(prompt.contains("\u{2514}\u{2500} S3"));
        assert!(prompt.contains("add a CDN"));
    }

    #[tokio::test]
    async fn test_exchange_failure_appends_error_turn_and_keeps_tree() {
        let mut session = SessionState::new();
        session.replace_tree("\u{2514}\u{2500} RDS".to_string());
        let client = FakeGenerator::failing();
        let before = session.turns().len();

        let reply = exchange(&mut session, &client, "anything").await;

        assert_eq!(session.turns().len(), before + 2);
        assert!(reply.contains("Something went wrong"));
        assert!(reply.contains("service unavailable"));
        assert_eq!(session.current_tree(), "\u{2514}\u{2500} RDS");
    }

    #[tokio::test]
    async fn test_exchange_without_tree_in_reply_stores_full_text() {
        // No fence and no glyphs: the extractor falls back to the reply
        // itself, which becomes the live tree.
        let mut session = SessionState::new();
        let client = FakeGenerator::replying("Could you clarify the region?");

        exchange(&mut session, &client, "something vague").await;

        assert_eq!(session.current_tree(), "Could you clarify the region?");
    }

    #[tokio::test]
    async fn test_analyze_stores_reply_and_timestamp() {
        let mut session = SessionState::new();
        session.replace_tree("\u{2514}\u{2500} EC2".to_string());
        session.set_toggle(ChecklistItem::Vpc, true);
        let client = FakeGenerator::replying("Looks solid.");

        let stored = analyze(&mut session, &client).await;

        assert_eq!(stored, "Looks solid.");
        assert_eq!(session.security_analysis, "Looks solid.");
        assert!(session.analysis_timestamp.is_some());
        let prompt = client.last_prompt();
        assert!(prompt.contains("1. VPC applied"));
        assert!(prompt.contains("\u{2514}\u{2500} EC2"));
    }

    #[tokio::test]
    async fn test_analyze_with_no_checked_items_says_none() {
        let mut session = SessionState::new();
        let client = FakeGenerator::replying("ok");
        analyze(&mut session, &client).await;
        assert!(client
            .last_prompt()
            .contains("Currently applied security elements: none"));
    }

    #[tokio::test]
    async fn test_analyze_failure_stores_error_text() {
        let mut session = SessionState::new();
        let client = FakeGenerator::failing();

        let stored = analyze(&mut session, &client).await;

        assert!(stored.contains("Security analysis failed"));
        assert_eq!(session.security_analysis, stored);
        assert!(session.analysis_timestamp.is_some());
    }
}
