// src/main.rs
// MCP Debate - command line entry point

use anyhow::Result;
use clap::Parser;
use mcp_debate::config::{self, ConfigLayer, DebaterLayer, FileConfig, ProcessEnv, defaults};
use mcp_debate::error::ConfigError;
use mcp_debate::llm::CompletionClient;
use mcp_debate::mcp::{McpConnector, ProviderConfig, ToolRegistry};
use mcp_debate::transcript::{ConsoleObserver, ObserverSet, ToolCallLog, TranscriptLog};
use mcp_debate::DebateRunner;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mcp-debate")]
#[command(about = "Two AI models debate a topic, optionally using MCP tools")]
#[command(version)]
struct Cli {
    /// JSON or TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of debate rounds (at least 1; 0 is rejected)
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Debate topic
    #[arg(short, long)]
    topic: Option<String>,

    /// Persona text shared by both debaters
    #[arg(long)]
    common_persona: Option<String>,

    /// Provider for debater 1 (openai or openrouter)
    #[arg(long)]
    debater1_provider: Option<String>,
    #[arg(long)]
    debater1_model: Option<String>,
    /// Custom API base URL for debater 1
    #[arg(long)]
    debater1_base_url: Option<String>,
    #[arg(long)]
    debater1_persona: Option<String>,
    #[arg(long)]
    debater1_opening: Option<String>,
    #[arg(long)]
    debater1_temperature: Option<f32>,
    #[arg(long)]
    debater1_max_tokens: Option<u32>,

    /// Provider for debater 2 (openai or openrouter)
    #[arg(long)]
    debater2_provider: Option<String>,
    #[arg(long)]
    debater2_model: Option<String>,
    /// Custom API base URL for debater 2
    #[arg(long)]
    debater2_base_url: Option<String>,
    #[arg(long)]
    debater2_persona: Option<String>,
    #[arg(long)]
    debater2_opening: Option<String>,
    #[arg(long)]
    debater2_temperature: Option<f32>,
    #[arg(long)]
    debater2_max_tokens: Option<u32>,

    /// MCP server config file
    #[arg(long, default_value = defaults::DEFAULT_MCP_CONFIG)]
    mcp_config: PathBuf,

    /// Directory for transcript and tool-call logs
    #[arg(long, default_value = defaults::DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Console output only, no log files
    #[arg(long)]
    no_logs: bool,

    /// Show diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            rounds: self.rounds,
            topic: self.topic.clone(),
            common_persona: self.common_persona.clone(),
            debater1: DebaterLayer {
                provider: self.debater1_provider.clone(),
                model: self.debater1_model.clone(),
                base_url: self.debater1_base_url.clone(),
                persona: self.debater1_persona.clone(),
                opening: self.debater1_opening.clone(),
                temperature: self.debater1_temperature,
                max_tokens: self.debater1_max_tokens,
            },
            debater2: DebaterLayer {
                provider: self.debater2_provider.clone(),
                model: self.debater2_model.clone(),
                base_url: self.debater2_base_url.clone(),
                persona: self.debater2_persona.clone(),
                opening: self.debater2_opening.clone(),
                temperature: self.debater2_temperature,
                max_tokens: self.debater2_max_tokens,
            },
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default = if verbose { "warn,mcp_debate=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn report_config_error(err: &ConfigError) {
    eprintln!("\n❌ Initialization error: {}", err);
    if matches!(err, ConfigError::MissingCredential { .. }) {
        eprintln!("\nPlease ensure your .env file contains the required API keys:");
        eprintln!("  - OPENAI_API_KEY (for OpenAI)");
        eprintln!("  - OPENROUTER_API_KEY (for OpenRouter)");
    }
}

/// Resolve configuration: command line > config file > environment > defaults
fn load_settings(cli: &Cli) -> Result<config::DebateSettings, ConfigError> {
    let file_layer = match &cli.config {
        Some(path) => FileConfig::load(path)?.into_layer(),
        None => ConfigLayer::default(),
    };
    let env_layer = config::env::env_layer(&ProcessEnv);
    config::resolve(cli.layer().over(file_layer).over(env_layer), &ProcessEnv)
}

fn build_observers(cli: &Cli, topic: &str, rounds: usize) -> ObserverSet {
    let mut observers = ObserverSet::new().with(ConsoleObserver::new());
    if cli.no_logs {
        return observers;
    }

    match TranscriptLog::create(&cli.log_dir, topic, rounds) {
        Ok(log) => {
            info!(path = %log.path().display(), "Writing debate transcript");
            observers.push(log);
        }
        Err(e) => warn!(dir = %cli.log_dir.display(), error = %e, "Could not create transcript log"),
    }
    match ToolCallLog::create(&cli.log_dir) {
        Ok(log) => {
            info!(path = %log.path().display(), "Writing tool call log");
            observers.push(log);
        }
        Err(e) => warn!(dir = %cli.log_dir.display(), error = %e, "Could not create tool call log"),
    }
    observers
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            report_config_error(&e);
            return Ok(ExitCode::from(1));
        }
    };

    let providers = match ProviderConfig::load(&cli.mcp_config) {
        Ok(config) => config.specs,
        Err(e) => {
            report_config_error(&e);
            return Ok(ExitCode::from(1));
        }
    };

    let client1 = CompletionClient::from_config(&settings.debater1);
    let client2 = CompletionClient::from_config(&settings.debater2);
    let mut observers = build_observers(&cli, &settings.topic, settings.rounds);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let runner = DebateRunner::from_settings(
        settings,
        Box::new(client1),
        Box::new(client2),
        ToolRegistry::new(Box::new(McpConnector)),
    )
    .with_providers(providers)
    .with_cancellation(cancel);

    match runner.run(&mut observers).await {
        Ok(summary) => {
            info!(
                rounds = summary.rounds_completed,
                tool_calls = summary.tool_call_count(),
                "Debate finished"
            );
            Ok(ExitCode::SUCCESS)
        }
        // Already reported by the console observer; an interrupt exits cleanly
        Err(e) => Ok(ExitCode::from(e.exit_code())),
    }
}
