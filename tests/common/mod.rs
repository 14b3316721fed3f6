// tests/common/mod.rs
// Deterministic stand-ins for the completion API, tool providers and observers

#![allow(dead_code)]

use async_trait::async_trait;
use mcp_debate::config::DebaterConfig;
use mcp_debate::debate::{DebateRunner, DebateSummary, Debater};
use mcp_debate::error::{ConnectError, DebateError, LlmError};
use mcp_debate::llm::{ChatClient, ChatResult, Message, Role, Tool, ToolCall};
use mcp_debate::mcp::{
    ConnectReport, ProviderConnector, ProviderLaunchSpec, ToolDescriptor, ToolInvocationResult,
    ToolOutcome, ToolOutput, ToolProvider, ToolRegistry,
};
use mcp_debate::transcript::DebateObserver;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

// ============================================================================
// Completion client
// ============================================================================

/// One scripted model reply
#[derive(Debug, Clone)]
pub enum Step {
    Text(String),
    Tools(Vec<ToolCall>),
    /// Text content alongside tool requests
    TextAndTools(String, Vec<ToolCall>),
    ApiError(u16),
    /// Never completes
    Hang,
}

pub fn text(s: &str) -> Step {
    Step::Text(s.to_string())
}

pub fn call(id: &str, name: &str, args: Value) -> ToolCall {
    ToolCall::new(id, name, args.to_string())
}

/// A request the client received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tools: Option<Vec<Tool>>,
}

impl RecordedRequest {
    pub fn tool_messages(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.role == Role::Tool).collect()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools
            .iter()
            .flatten()
            .map(|t| t.function.name.clone())
            .collect()
    }
}

/// Replies from a script; once the script runs out it answers
/// "<label> answer <n>" so long debates need no explicit script.
pub struct ScriptedClient {
    label: String,
    script: Mutex<VecDeque<Step>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    fallback: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(label: &str, script: Vec<Step>) -> Self {
        Self {
            label: label.to_string(),
            script: Mutex::new(script.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
            fallback: AtomicUsize::new(0),
        }
    }

    /// Handle to the requests this client will receive
    pub fn requests(&self) -> Arc<Mutex<Vec<RecordedRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResult, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { messages, tools });

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Text(t)) => Ok(ChatResult::text(t)),
            Some(Step::Tools(calls)) => Ok(ChatResult::with_tool_calls(calls)),
            Some(Step::TextAndTools(t, calls)) => {
                let mut result = ChatResult::with_tool_calls(calls);
                result.content = Some(t);
                Ok(result)
            }
            Some(Step::ApiError(status)) => Err(LlmError::Api {
                status,
                body: "scripted failure".into(),
            }),
            Some(Step::Hang) => std::future::pending().await,
            None => {
                let n = self.fallback.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(ChatResult::text(format!("{} answer {}", self.label, n)))
            }
        }
    }

    fn model_name(&self) -> String {
        format!("scripted-{}", self.label)
    }
}

// ============================================================================
// Tool providers
// ============================================================================

/// How a stub tool responds
#[derive(Debug, Clone)]
pub enum Behavior {
    Text(String),
    /// Tool ran and reported failure
    ToolError(String),
    /// Call never produced a result
    Transport(String),
}

#[derive(Debug, Clone, Default)]
pub struct StubServer {
    pub tools: Vec<(String, Behavior)>,
    pub fail_connect: bool,
}

impl StubServer {
    pub fn with_tool(mut self, name: &str, behavior: Behavior) -> Self {
        self.tools.push((name.to_string(), behavior));
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            ..Default::default()
        }
    }
}

/// Shared record of what happened on the tool side
#[derive(Debug, Default)]
pub struct ToolLedger {
    /// (provider, tool, arguments) in call order
    pub calls: Mutex<Vec<(String, String, Map<String, Value>)>>,
    pub closed: Mutex<Vec<String>>,
}

impl ToolLedger {
    pub fn call_names(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, tool, _)| tool.clone())
            .collect()
    }

    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().unwrap().clone()
    }
}

struct StubProvider {
    id: String,
    descriptors: Vec<ToolDescriptor>,
    behaviors: HashMap<String, Behavior>,
    ledger: Arc<ToolLedger>,
}

#[async_trait]
impl ToolProvider for StubProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutcome, String> {
        self.ledger
            .calls
            .lock()
            .unwrap()
            .push((self.id.clone(), name.to_string(), arguments));

        match self.behaviors.get(name) {
            Some(Behavior::Text(t)) => Ok(ToolOutcome::ok(ToolOutput::Text(t.clone()))),
            Some(Behavior::ToolError(t)) => Ok(ToolOutcome::error(ToolOutput::Text(t.clone()))),
            Some(Behavior::Transport(e)) => Err(e.clone()),
            None => Err(format!("unknown tool {}", name)),
        }
    }

    async fn close(self: Box<Self>) {
        self.ledger.closed.lock().unwrap().push(self.id.clone());
    }
}

pub struct StubConnector {
    servers: HashMap<String, StubServer>,
    ledger: Arc<ToolLedger>,
}

impl StubConnector {
    pub fn new(servers: &[(&str, StubServer)]) -> (Self, Arc<ToolLedger>) {
        let ledger = Arc::new(ToolLedger::default());
        let connector = Self {
            servers: servers
                .iter()
                .map(|(id, s)| (id.to_string(), s.clone()))
                .collect(),
            ledger: ledger.clone(),
        };
        (connector, ledger)
    }
}

#[async_trait]
impl ProviderConnector for StubConnector {
    async fn connect(
        &self,
        spec: &ProviderLaunchSpec,
    ) -> Result<Box<dyn ToolProvider>, ConnectError> {
        let server = self.servers.get(&spec.id).cloned().unwrap_or_default();
        if server.fail_connect {
            return Err(ConnectError::Spawn {
                provider: spec.id.clone(),
                reason: "command not found".into(),
            });
        }

        let descriptors = server
            .tools
            .iter()
            .map(|(name, _)| {
                ToolDescriptor::new(
                    name.as_str(),
                    format!("{} tool", name),
                    json!({
                        "type": "object",
                        "properties": {"q": {"type": "string"}},
                        "required": ["q"]
                    }),
                )
            })
            .collect();

        Ok(Box::new(StubProvider {
            id: spec.id.clone(),
            descriptors,
            behaviors: server.tools.into_iter().collect(),
            ledger: self.ledger.clone(),
        }))
    }
}

pub fn launch_spec(id: &str) -> ProviderLaunchSpec {
    ProviderLaunchSpec {
        id: id.to_string(),
        command: format!("{}-server", id),
        args: vec![],
        env: HashMap::new(),
    }
}

// ============================================================================
// Observer
// ============================================================================

/// Everything observable about a session, as comparable strings
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started(usize),
    Ready(String),
    Connected { connected: usize, attempted: usize, tools: Vec<String> },
    Opening(String, String),
    Round(usize),
    Tool { debater: String, call_id: String, content: String, error: bool },
    Answer { debater: String, round: usize, text: String },
    Concluded(usize),
    Aborted(String),
    Closed,
}

#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn answers(&self) -> Vec<(String, usize, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Answer { debater, round, text } => Some((debater, round, text)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl DebateObserver for RecordingObserver {
    fn session_started(&mut self, _topic: &str, rounds: usize) {
        self.push(Event::Started(rounds));
    }

    fn debater_ready(&mut self, debater: &DebaterConfig) {
        self.push(Event::Ready(debater.display_name.clone()));
    }

    fn tools_connected(&mut self, report: &ConnectReport, tool_names: &[&str]) {
        self.push(Event::Connected {
            connected: report.connected_count(),
            attempted: report.attempted,
            tools: tool_names.iter().map(|s| s.to_string()).collect(),
        });
    }

    fn opening_statement(&mut self, debater: &str, statement: &str) {
        self.push(Event::Opening(debater.into(), statement.into()));
    }

    fn round_started(&mut self, round: usize, _total: usize) {
        self.push(Event::Round(round));
    }

    fn tool_invoked(&mut self, debater: &str, call: &ToolCall, result: &ToolInvocationResult) {
        self.push(Event::Tool {
            debater: debater.into(),
            call_id: call.id.clone(),
            content: result.content.clone(),
            error: result.is_error(),
        });
    }

    fn answer(&mut self, debater: &str, round: usize, text: &str) {
        self.push(Event::Answer {
            debater: debater.into(),
            round,
            text: text.into(),
        });
    }

    fn concluded(&mut self, rounds: usize) {
        self.push(Event::Concluded(rounds));
    }

    fn aborted(&mut self, error: &DebateError) {
        self.push(Event::Aborted(error.to_string()));
    }

    fn close(&mut self) {
        self.push(Event::Closed);
    }
}

// ============================================================================
// Session assembly
// ============================================================================

pub fn debater_config(n: u8) -> DebaterConfig {
    DebaterConfig {
        display_name: format!("Debater {}", n),
        provider: mcp_debate::llm::Provider::OpenAi,
        model_id: "gpt-4o-mini".into(),
        endpoint_override: None,
        credential: "sk-test".into(),
        persona_text: format!("You are debater {}.", n),
        opening_statement: format!("Opening from debater {}", n),
        temperature: 0.7,
        max_output_tokens: 200,
    }
}

/// A ready-to-run session plus handles for inspecting it afterwards
pub struct Harness {
    runner: Option<DebateRunner>,
    pub requests1: Arc<Mutex<Vec<RecordedRequest>>>,
    pub requests2: Arc<Mutex<Vec<RecordedRequest>>>,
    pub ledger: Arc<ToolLedger>,
    pub observer: RecordingObserver,
}

impl Harness {
    pub fn new(
        rounds: usize,
        script1: Vec<Step>,
        script2: Vec<Step>,
        servers: &[(&str, StubServer)],
    ) -> Self {
        let client1 = ScriptedClient::new("d1", script1);
        let client2 = ScriptedClient::new("d2", script2);
        let requests1 = client1.requests();
        let requests2 = client2.requests();

        let (connector, ledger) = StubConnector::new(servers);
        let specs = servers.iter().map(|(id, _)| launch_spec(id)).collect();

        let runner = DebateRunner::new(
            "testing",
            rounds,
            Debater::new(debater_config(1), Box::new(client1)),
            Debater::new(debater_config(2), Box::new(client2)),
            ToolRegistry::new(Box::new(connector)),
        )
        .with_providers(specs);

        Self {
            runner: Some(runner),
            requests1,
            requests2,
            ledger,
            observer: RecordingObserver::default(),
        }
    }

    /// Run the session once, recording into `self.observer`
    pub async fn run(&mut self) -> Result<DebateSummary, DebateError> {
        let runner = self.runner.take().expect("harness already ran");
        let mut observer = self.observer.clone();
        runner.run(&mut observer).await
    }

    /// Cancellation token of the not-yet-run session
    pub fn cancellation_token(&self) -> CancellationToken {
        self.runner
            .as_ref()
            .expect("harness already ran")
            .cancellation_token()
    }

    pub fn requests1(&self) -> Vec<RecordedRequest> {
        self.requests1.lock().unwrap().clone()
    }

    pub fn requests2(&self) -> Vec<RecordedRequest> {
        self.requests2.lock().unwrap().clone()
    }
}
