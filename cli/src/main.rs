//! CLI entrypoint for doc-swarm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use swarm_application::{
    AgentSwarm, ConversationLogger, DocumentSource, GenerationOptions, NoConversationLogger,
    NoTurnProgress, RunTurnUseCase, SwarmConfig, TurnController, TurnOutcome,
    TurnProgressNotifier,
};
use swarm_domain::{Model, ModelConfig, OutputFormat};
use swarm_infrastructure::{
    ConfigLoader, FileConfig, GeminiGateway, JsonlConversationLogger, LocalDocumentLoader,
};
use swarm_presentation::{
    ChatRepl, Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, run_turn_interactive,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Console logging from `-v` (or `RUST_LOG`), plus a daily file when
/// `logging.log_dir` is set. The guard must live until exit.
fn init_logging(verbose: u8, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let console = fmt::layer().with_target(false).with_writer(io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "doc-swarm.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
            None
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")
}

/// Apply command-line overrides on top of the file configuration.
fn swarm_config(cli: &Cli, file: &FileConfig) -> SwarmConfig {
    let mut config = file.to_swarm_config();
    if let Some(name) = &cli.model {
        config.models = ModelConfig::uniform(Model::from_name(name));
    }
    if cli.no_review {
        config.orchestration.max_review_rounds = 0;
    }
    if cli.no_clarify {
        config.orchestration.enable_clarification = false;
    }
    config
}

fn conversation_logger(file: &FileConfig) -> Arc<dyn ConversationLogger> {
    let logger = file
        .logging
        .conversation_log
        .as_deref()
        .and_then(JsonlConversationLogger::open);
    match logger {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoConversationLogger),
    }
}

fn progress(cli: &Cli) -> Arc<dyn TurnProgressNotifier> {
    if cli.quiet {
        Arc::new(NoTurnProgress)
    } else if cli.verbose > 0 {
        // Spinners would interleave with log lines
        Arc::new(SimpleProgress)
    } else {
        Arc::new(ProgressReporter::new())
    }
}

fn read_stdin(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end().to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let file_config = load_config(&cli)?;
    let _log_guard = init_logging(cli.verbose, file_config.logging.log_dir.as_deref());

    info!("Starting doc-swarm");

    for issue in file_config.ensure_valid()? {
        warn!("{}", issue.message);
        if !cli.quiet {
            eprintln!("warning: {}", issue.message);
        }
    }

    if !file_config.output.color {
        colored::control::set_override(false);
    }

    let config = swarm_config(&cli, &file_config);
    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(file_config.output.format)
        .unwrap_or_default();
    let formatter = ConsoleFormatter::new()
        .with_reasoning(file_config.output.show_reasoning)
        .with_collaboration(file_config.output.show_collaboration);

    // === Dependency Injection ===
    let gateway = Arc::new(GeminiGateway::from_env(
        &file_config.provider.api_key_env,
        file_config.provider.base_url.clone(),
    )?);

    let agent_options = GenerationOptions::default()
        .with_temperature(config.generation.agent_temperature)
        .with_max_output_tokens(config.generation.max_output_tokens);
    let swarm = Arc::new(
        AgentSwarm::new(gateway.clone(), config.models.agent.clone(), config.retry.clone())
            .with_options(agent_options),
    );

    let use_case = RunTurnUseCase::new(gateway, swarm, config)
        .with_progress(progress(&cli))
        .with_conversation_logger(conversation_logger(&file_config));
    let controller = Arc::new(TurnController::new(use_case));

    let documents = Arc::new(LocalDocumentLoader::new());
    brief(&controller, &*documents, &cli.docs).await?;

    // Chat mode
    if cli.chat {
        ChatRepl::new(controller, documents)
            .with_formatter(formatter)
            .with_format(format)
            .run()
            .await;
        return Ok(());
    }

    // Single question mode - question is required
    let Some(question) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };
    if cli.docs.is_empty() {
        bail!("At least one document is required. Pass it with -d <PATH>.");
    }

    let outcome = run_turn_interactive(&controller, question, read_stdin).await;
    println!("{}", formatter.render_outcome(&outcome, format));

    match outcome {
        TurnOutcome::Completed(_) => Ok(()),
        TurnOutcome::Stopped => bail!("stopped"),
        TurnOutcome::Failed(message) => bail!(message),
        // run_turn_interactive answers every clarification
        TurnOutcome::Clarification(_) => bail!("clarification left unanswered"),
    }
}

async fn brief(
    controller: &TurnController,
    source: &dyn DocumentSource,
    paths: &[PathBuf],
) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    let documents = paths
        .iter()
        .map(|path| source.load(path))
        .collect::<Result<Vec<_>, _>>()?;
    let briefed = controller.brief_documents(&documents).await?;

    if briefed.is_empty() {
        bail!("No document could be briefed");
    }
    if briefed.len() < documents.len() {
        warn!(
            "{} of {} documents were briefed",
            briefed.len(),
            documents.len()
        );
    }
    Ok(())
}
