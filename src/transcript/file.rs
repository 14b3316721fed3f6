// src/transcript/file.rs
// Append-only session log files: debate transcript and tool-call details

use super::DebateObserver;
use crate::error::DebateError;
use crate::llm::ToolCall;
use crate::mcp::ToolInvocationResult;
use chrono::Local;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const TRANSCRIPT_PREFIX: &str = "debate";
pub const TOOL_LOG_PREFIX: &str = "debate_tools";

const WIDTH: usize = 80;

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn rule(c: char) -> String {
    let mut line = c.to_string().repeat(WIDTH);
    line.push('\n');
    line
}

/// One timestamped log file. Every write is flushed immediately so the file
/// reflects completed steps only, even if the process is killed mid-debate.
struct LogFile {
    path: PathBuf,
    file: Option<File>,
}

impl LogFile {
    fn create(dir: &Path, prefix: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let name = format!("{}_{}.log", prefix, Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(name);
        let file = File::create(&path)?;
        debug!(path = %path.display(), "Opened log file");
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    fn write(&mut self, text: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = file.write_all(text.as_bytes()).and_then(|_| file.flush()) {
            warn!(path = %self.path.display(), error = %e, "Failed to write log file");
        }
    }

    fn header(&mut self, title: &str, metadata: &[(&str, String)]) {
        let mut out = rule('=');
        out.push_str(title);
        out.push('\n');
        out.push_str(&rule('='));
        for (key, value) in metadata {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push_str(&format!("Session started: {}\n", timestamp()));
        out.push_str(&rule('='));
        out.push('\n');
        self.write(&out);
    }

    /// Write the end marker and release the handle. Returns false if already closed.
    fn finish(&mut self) -> bool {
        if self.file.is_none() {
            return false;
        }
        self.write(&format!("\nSession ended: {}\n", timestamp()));
        self.file = None;
        true
    }
}

/// Human-readable debate transcript
pub struct TranscriptLog {
    log: LogFile,
    rounds: usize,
}

impl TranscriptLog {
    /// Create `<dir>/debate_<timestamp>.log` and write the session header
    pub fn create(dir: &Path, topic: &str, rounds: usize) -> io::Result<Self> {
        let mut log = LogFile::create(dir, TRANSCRIPT_PREFIX)?;
        log.header(
            "AI DEBATE TRANSCRIPT",
            &[("Topic", topic.to_string()), ("Total Rounds", rounds.to_string())],
        );
        Ok(Self { log, rounds })
    }

    pub fn path(&self) -> &Path {
        &self.log.path
    }

    fn entry(&mut self, label: &str, text: &str) {
        self.log.write(&format!(
            "{}{}\n{}{}\n\n",
            rule('='),
            label,
            rule('-'),
            text
        ));
    }
}

impl DebateObserver for TranscriptLog {
    fn opening_statement(&mut self, debater: &str, statement: &str) {
        self.entry(&format!("{} (Opening Statement):", debater), statement);
    }

    fn round_started(&mut self, round: usize, _total: usize) {
        let text = format!("\n{}ROUND {}/{}\n{}\n", rule('='), round, self.rounds, rule('='));
        self.log.write(&text);
    }

    fn answer(&mut self, debater: &str, _round: usize, text: &str) {
        self.entry(&format!("[{}] {}:", timestamp(), debater), text);
    }

    fn concluded(&mut self, rounds: usize) {
        let text = format!(
            "{}DEBATE CONCLUDED\n{}Total rounds completed: {}\nSession ended: {}\n",
            rule('='),
            rule('='),
            rounds,
            timestamp()
        );
        self.log.write(&text);
    }

    fn aborted(&mut self, error: &DebateError) {
        let text = format!("{}DEBATE ABORTED\n{}{}\n", rule('='), rule('='), error);
        self.log.write(&text);
    }

    fn close(&mut self) {
        if self.log.finish() {
            println!("📄 Debate transcript saved to: {}", self.log.path.display());
        }
    }
}

/// Detailed record of every tool invocation
pub struct ToolCallLog {
    log: LogFile,
    calls: usize,
}

impl ToolCallLog {
    /// Create `<dir>/debate_tools_<timestamp>.log` and write the header
    pub fn create(dir: &Path) -> io::Result<Self> {
        let mut log = LogFile::create(dir, TOOL_LOG_PREFIX)?;
        log.header("AI Debate - Tool Call Log", &[]);
        Ok(Self { log, calls: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.log.path
    }

    pub fn calls_logged(&self) -> usize {
        self.calls
    }
}

/// Pretty-print the raw argument string; fall back to it verbatim if it is not JSON
fn format_arguments(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| raw.to_string())
}

fn format_result(result: &ToolInvocationResult) -> String {
    if let Some(error) = &result.error {
        return format!("  Error: {}\n", error);
    }
    match &result.output {
        Some(output) => output.describe(),
        None => format!("  {}\n", result.content),
    }
}

impl DebateObserver for ToolCallLog {
    fn tool_invoked(&mut self, debater: &str, call: &ToolCall, result: &ToolInvocationResult) {
        let text = format!(
            "[{}] {}\n{}Tool: {}\nCall ID: {}\nArguments:\n{}\nResult:\n{}{}\n",
            timestamp(),
            debater,
            rule('-'),
            call.function.name,
            call.id,
            format_arguments(&call.function.arguments),
            format_result(result),
            rule('='),
        );
        self.log.write(&text);
        self.calls += 1;
    }

    fn close(&mut self) {
        if self.log.finish() {
            println!("📝 Tool call log saved to: {}", self.log.path.display());
        }
    }
}
