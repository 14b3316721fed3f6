// src/transcript/console.rs
// Console echo of the debate

use super::DebateObserver;
use crate::config::DebaterConfig;
use crate::error::DebateError;
use crate::llm::ToolCall;
use crate::mcp::{ConnectReport, ToolInvocationResult};

const WIDTH: usize = 80;

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

/// Framed message block as printed to the terminal
pub(crate) fn render_message(debater: &str, message: &str, opening: bool) -> String {
    let label = if opening {
        format!("🔵 {} (Opening Statement):", debater)
    } else {
        format!("🔵 {}:", debater)
    };
    format!("{}\n{}\n{}\n{}\n", rule('='), label, rule('-'), message)
}

pub(crate) fn render_tool_notice(debater: &str, call: &ToolCall, result: &ToolInvocationResult) -> String {
    match &result.error {
        None => format!("   🔧 {} used tool '{}'", debater, call.function.name),
        Some(e) => format!(
            "   🔧 {} used tool '{}' (failed: {})",
            debater, call.function.name, e
        ),
    }
}

/// Prints the debate to stdout; failures go to stderr
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

impl DebateObserver for ConsoleObserver {
    fn session_started(&mut self, topic: &str, rounds: usize) {
        println!("\n{}", rule('='));
        println!("🎭 AI DEBATE APPLICATION");
        println!("{}", rule('='));
        println!("Topic: {}", topic);
        println!("Rounds: {}", rounds);
        println!("{}\n", rule('='));
    }

    fn debater_ready(&mut self, debater: &DebaterConfig) {
        println!(
            "✓ {} initialized: {}/{}",
            debater.display_name, debater.provider, debater.model_id
        );
    }

    fn tools_connected(&mut self, report: &ConnectReport, tool_names: &[&str]) {
        if report.attempted == 0 {
            println!("ℹ️  No MCP servers configured.");
        } else {
            println!("\n🔌 Connecting to {} MCP server(s)...", report.attempted);
            for id in &report.connected {
                println!("   ✓ Connected to '{}'", id);
            }
            for failure in &report.failures {
                println!("   ✗ {}", failure);
            }
            if report.connected_count() > 0 {
                println!(
                    "✓ {}/{} MCP server(s) connected successfully",
                    report.connected_count(),
                    report.attempted
                );
            } else {
                println!("⚠️  No MCP servers could be connected. Tools will not be available.");
            }
        }

        if !tool_names.is_empty() {
            println!("🔧 Available tools: {}", tool_names.join(", "));
        }
        println!("\n🎬 Starting debate...\n");
    }

    fn opening_statement(&mut self, debater: &str, statement: &str) {
        println!("{}", render_message(debater, statement, true));
    }

    fn round_started(&mut self, round: usize, total: usize) {
        println!("\n{}", rule('='));
        println!("🔄 ROUND {}/{}", round, total);
        println!("{}\n", rule('='));
    }

    fn tool_invoked(&mut self, debater: &str, call: &ToolCall, result: &ToolInvocationResult) {
        println!("{}", render_tool_notice(debater, call, result));
    }

    fn answer(&mut self, debater: &str, _round: usize, text: &str) {
        println!("{}", render_message(debater, text, false));
    }

    fn concluded(&mut self, rounds: usize) {
        println!("{}", rule('='));
        println!("🏁 DEBATE CONCLUDED");
        println!("{}", rule('='));
        println!("Total rounds completed: {}", rounds);
        println!();
    }

    fn aborted(&mut self, error: &DebateError) {
        match error {
            DebateError::Interrupted => {
                println!("\n\n⚠️  Debate interrupted by user. Exiting...\n");
            }
            DebateError::Generation { round, .. } => {
                eprintln!("\n❌ {}", error);
                eprintln!("\n❌ Debate stopped due to error in round {}", round);
            }
            other => eprintln!("\n❌ Unexpected error: {}", other),
        }
    }
}
