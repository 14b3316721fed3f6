// src/debate/runner.rs
// Debate loop: connect tools, openings, alternating rounds, unconditional cleanup

use super::generator::{ResponseGenerator, TurnError};
use super::Debater;
use crate::config::DebateSettings;
use crate::error::DebateError;
use crate::llm::{ChatClient, Message};
use crate::mcp::{ProviderLaunchSpec, ToolInvocationResult, ToolRegistry};
use crate::transcript::DebateObserver;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// One completed turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub round: usize,
    pub debater: String,
    pub answer: String,
    pub tool_results: Vec<ToolInvocationResult>,
}

/// Everything a finished debate produced
#[derive(Debug, Clone)]
pub struct DebateSummary {
    pub topic: String,
    pub rounds_completed: usize,
    /// Final answers in speaking order (openings excluded)
    pub turns: Vec<TurnRecord>,
    pub debater1_history: Vec<Message>,
    pub debater2_history: Vec<Message>,
}

impl DebateSummary {
    pub fn tool_call_count(&self) -> usize {
        self.turns.iter().map(|t| t.tool_results.len()).sum()
    }
}

pub struct DebateRunner {
    topic: String,
    rounds: usize,
    debater1: Debater,
    debater2: Debater,
    registry: ToolRegistry,
    providers: Vec<ProviderLaunchSpec>,
    cancel: CancellationToken,
}

impl DebateRunner {
    pub fn new(
        topic: impl Into<String>,
        rounds: usize,
        debater1: Debater,
        debater2: Debater,
        registry: ToolRegistry,
    ) -> Self {
        Self {
            topic: topic.into(),
            rounds,
            debater1,
            debater2,
            registry,
            providers: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Build from resolved settings, one completion client per debater
    pub fn from_settings(
        settings: DebateSettings,
        client1: Box<dyn ChatClient>,
        client2: Box<dyn ChatClient>,
        registry: ToolRegistry,
    ) -> Self {
        Self::new(
            settings.topic,
            settings.rounds,
            Debater::new(settings.debater1, client1),
            Debater::new(settings.debater2, client2),
            registry,
        )
    }

    /// Tool providers to connect before the first turn
    pub fn with_providers(mut self, providers: Vec<ProviderLaunchSpec>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the whole session. Registry shutdown and observer close happen
    /// exactly once, whatever the outcome.
    pub async fn run(mut self, observer: &mut dyn DebateObserver) -> Result<DebateSummary, DebateError> {
        observer.session_started(&self.topic, self.rounds);
        observer.debater_ready(self.debater1.config());
        observer.debater_ready(self.debater2.config());

        let outcome = self.drive(observer).await;

        match &outcome {
            Ok(turns) => {
                info!(rounds = self.rounds, turns = turns.len(), "Debate concluded");
                observer.concluded(self.rounds);
            }
            Err(DebateError::Interrupted) => {
                info!("Debate interrupted");
                observer.aborted(&DebateError::Interrupted);
            }
            Err(e) => {
                error!(error = %e, "Debate aborted");
                observer.aborted(e);
            }
        }

        self.registry.shutdown().await;
        observer.close();

        let turns = outcome?;
        Ok(DebateSummary {
            topic: self.topic,
            rounds_completed: self.rounds,
            turns,
            debater1_history: self.debater1.into_history(),
            debater2_history: self.debater2.into_history(),
        })
    }

    async fn drive(&mut self, observer: &mut dyn DebateObserver) -> Result<Vec<TurnRecord>, DebateError> {
        let report = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(DebateError::Interrupted),
            report = self.registry.connect(&self.providers) => report,
        };
        observer.tools_connected(&report, &self.registry.tool_names());
        if report.attempted > 0 && report.connected_count() == 0 {
            info!("No tool providers connected, continuing without tools");
        }

        for debater in [&mut self.debater1, &mut self.debater2] {
            debater.seed_opening();
            let name = debater.name().to_string();
            let opening = debater.config().opening_statement.clone();
            observer.opening_statement(&name, &opening);
        }

        let generator = ResponseGenerator::new(&self.registry, &self.cancel);
        let mut turns = Vec::with_capacity(self.rounds * 2);

        for round in 1..=self.rounds {
            info!(round, total = self.rounds, "Starting round");
            observer.round_started(round, self.rounds);

            let incoming = self.debater2.last_answer().unwrap_or_default().to_string();
            turns.push(take_turn(&generator, &mut self.debater1, &incoming, round, observer).await?);

            let incoming = self.debater1.last_answer().unwrap_or_default().to_string();
            turns.push(take_turn(&generator, &mut self.debater2, &incoming, round, observer).await?);
        }

        Ok(turns)
    }
}

async fn take_turn(
    generator: &ResponseGenerator<'_>,
    debater: &mut Debater,
    incoming: &str,
    round: usize,
    observer: &mut dyn DebateObserver,
) -> Result<TurnRecord, DebateError> {
    let outcome = generator
        .respond(debater, incoming, observer)
        .await
        .map_err(|e| match e {
            TurnError::Interrupted => DebateError::Interrupted,
            TurnError::Generation(source) => DebateError::Generation {
                debater: debater.name().to_string(),
                round,
                source,
            },
        })?;

    observer.answer(debater.name(), round, &outcome.answer);
    Ok(TurnRecord {
        round,
        debater: debater.name().to_string(),
        answer: outcome.answer,
        tool_results: outcome.tool_results,
    })
}
