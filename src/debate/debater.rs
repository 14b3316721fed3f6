// src/debate/debater.rs
// Per-debater conversation state

use crate::config::DebaterConfig;
use crate::llm::{ChatClient, Message, Role};

/// One participant: static configuration, its completion client, and the
/// long-lived history (opening, incoming arguments, final answers only)
pub struct Debater {
    config: DebaterConfig,
    client: Box<dyn ChatClient>,
    history: Vec<Message>,
}

impl Debater {
    pub fn new(config: DebaterConfig, client: Box<dyn ChatClient>) -> Self {
        Self {
            config,
            client,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.display_name
    }

    pub fn config(&self) -> &DebaterConfig {
        &self.config
    }

    pub fn client(&self) -> &dyn ChatClient {
        self.client.as_ref()
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Message> {
        self.history
    }

    /// Seed the history with the configured opening statement
    pub fn seed_opening(&mut self) {
        self.history
            .push(Message::assistant(self.config.opening_statement.clone()));
    }

    /// Text of the most recent assistant message (opening or final answer)
    pub fn last_answer(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(Message::text)
    }

    /// Messages for the next request: persona, history, then the opponent's
    /// pending argument. Nothing is committed until the turn completes.
    pub fn compose(&self, incoming: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(self.config.persona_text.clone()));
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(incoming));
        messages
    }

    /// Commit a completed turn: the opponent's argument and our final answer
    pub(crate) fn record_exchange(&mut self, incoming: &str, answer: &str) {
        self.history.push(Message::user(incoming));
        self.history.push(Message::assistant(answer));
    }
}
