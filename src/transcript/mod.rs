// src/transcript/mod.rs
// Session observers: console echo and the append-only transcript/tool-call logs

mod console;
mod file;

pub use console::ConsoleObserver;
pub use file::{TOOL_LOG_PREFIX, TRANSCRIPT_PREFIX, ToolCallLog, TranscriptLog};

use crate::config::DebaterConfig;
use crate::error::DebateError;
use crate::llm::ToolCall;
use crate::mcp::{ConnectReport, ToolInvocationResult};

/// Receives every observable step of a debate session. Observers never affect
/// the debate: write failures are reported through `tracing` and swallowed.
///
/// All methods default to no-ops so an observer only implements what it records.
pub trait DebateObserver: Send {
    fn session_started(&mut self, _topic: &str, _rounds: usize) {}

    fn debater_ready(&mut self, _debater: &DebaterConfig) {}

    fn tools_connected(&mut self, _report: &ConnectReport, _tool_names: &[&str]) {}

    fn opening_statement(&mut self, _debater: &str, _statement: &str) {}

    fn round_started(&mut self, _round: usize, _total: usize) {}

    /// One tool invocation finished (successfully or not)
    fn tool_invoked(&mut self, _debater: &str, _call: &ToolCall, _result: &ToolInvocationResult) {}

    /// A turn's final answer
    fn answer(&mut self, _debater: &str, _round: usize, _text: &str) {}

    fn concluded(&mut self, _rounds: usize) {}

    fn aborted(&mut self, _error: &DebateError) {}

    /// Release any open streams. Called once, on every exit path.
    fn close(&mut self) {}
}

/// Fans every event out to a list of observers, in insertion order
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn DebateObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: impl DebateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn with(mut self, observer: impl DebateObserver + 'static) -> Self {
        self.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl DebateObserver for ObserverSet {
    fn session_started(&mut self, topic: &str, rounds: usize) {
        self.observers
            .iter_mut()
            .for_each(|o| o.session_started(topic, rounds));
    }

    fn debater_ready(&mut self, debater: &DebaterConfig) {
        self.observers.iter_mut().for_each(|o| o.debater_ready(debater));
    }

    fn tools_connected(&mut self, report: &ConnectReport, tool_names: &[&str]) {
        self.observers
            .iter_mut()
            .for_each(|o| o.tools_connected(report, tool_names));
    }

    fn opening_statement(&mut self, debater: &str, statement: &str) {
        self.observers
            .iter_mut()
            .for_each(|o| o.opening_statement(debater, statement));
    }

    fn round_started(&mut self, round: usize, total: usize) {
        self.observers
            .iter_mut()
            .for_each(|o| o.round_started(round, total));
    }

    fn tool_invoked(&mut self, debater: &str, call: &ToolCall, result: &ToolInvocationResult) {
        self.observers
            .iter_mut()
            .for_each(|o| o.tool_invoked(debater, call, result));
    }

    fn answer(&mut self, debater: &str, round: usize, text: &str) {
        self.observers
            .iter_mut()
            .for_each(|o| o.answer(debater, round, text));
    }

    fn concluded(&mut self, rounds: usize) {
        self.observers.iter_mut().for_each(|o| o.concluded(rounds));
    }

    fn aborted(&mut self, error: &DebateError) {
        self.observers.iter_mut().for_each(|o| o.aborted(error));
    }

    fn close(&mut self) {
        self.observers.iter_mut().for_each(|o| o.close());
    }
}
