use std::collections::HashMap;

use uuid::Uuid;

use super::mode::ChatMode;
use super::turn::ChatTurn;

/// Per-session conversation state: one append-only history per mode plus
/// the documents retrieved by the most recent RAG turn.
///
/// One instance lives in the application state for the session's lifetime;
/// `reset` replaces its contents wholesale. Never a process-wide global.
pub struct SessionState {
    pub id: Uuid,
    histories: HashMap<ChatMode, Vec<ChatTurn>>,
    last_context: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            histories: HashMap::new(),
            last_context: Vec::new(),
        }
    }

    pub fn history(&self, mode: ChatMode) -> &[ChatTurn] {
        self.histories.get(&mode).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push_turn(&mut self, mode: ChatMode, turn: ChatTurn) {
        self.histories.entry(mode).or_default().push(turn);
    }

    pub fn last_context(&self) -> &[String] {
        &self.last_context
    }

    pub fn set_last_context(&mut self, docs: Vec<String>) {
        self.last_context = docs;
    }

    /// Drops every mode's history and the retained context; the session
    /// continues under a fresh id.
    pub fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.histories.clear();
        self.last_context.clear();
    }

    /// Flattened plain-text export of one mode's history, one
    /// `role [timestamp]: content` line per turn, chronological.
    pub fn export(&self, mode: ChatMode) -> String {
        self.history(mode)
            .iter()
            .map(ChatTurn::export_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histories_are_independent_per_mode() {
        let mut session = SessionState::new();

        session.push_turn(ChatMode::Stateless, ChatTurn::user("a", "t1"));
        session.push_turn(ChatMode::Rag, ChatTurn::user("b", "t2"));

        assert_eq!(session.history(ChatMode::Stateless).len(), 1);
        assert_eq!(session.history(ChatMode::Rag).len(), 1);
        assert!(session.history(ChatMode::Echo).is_empty());
    }

    #[test]
    fn export_is_chronological_lines() {
        let mut session = SessionState::new();
        session.push_turn(ChatMode::Echo, ChatTurn::user("hi", "t1"));
        session.push_turn(ChatMode::Echo, ChatTurn::assistant("hi", "t1"));

        let export = session.export(ChatMode::Echo);

        assert_eq!(export, "user [t1]: hi\nassistant [t1]: hi");
    }

    #[test]
    fn export_of_untouched_mode_is_empty() {
        let session = SessionState::new();

        assert_eq!(session.export(ChatMode::Rag), "");
    }

    #[test]
    fn reset_clears_everything_and_rotates_the_id() {
        let mut session = SessionState::new();
        let original_id = session.id;
        session.push_turn(ChatMode::Rag, ChatTurn::user("q", "t1"));
        session.set_last_context(vec!["doc".to_string()]);

        session.reset();

        assert!(session.history(ChatMode::Rag).is_empty());
        assert!(session.last_context().is_empty());
        assert_ne!(session.id, original_id);
    }
}
