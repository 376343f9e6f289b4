//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use parley_application::{
    ConversationLogger, EventSink, ManageSessionsUseCase, MessageStore, NoConversationLogger,
    RunTurnError, RunTurnInput, RunTurnUseCase, SchedulerHandle, SummarizationScheduler,
    TurnScopes,
};
use parley_domain::{ConfigIssue, SessionId, Severity, TurnOutcome};
use parley_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiAgent, OpenAiClient,
    OpenAiSummaryModel, SqliteMessageStore, SseEventSink,
};
use parley_presentation::{
    Cli, Command, ConsoleEventSink, HistoryFormatter, JsonLinesEventSink, OutputFormat,
    SessionAction, SessionListFormatter,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Exit status of a turn stopped by Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };

    let _log_guard = init_tracing(cli.verbose, config.logging.directory.as_deref())?;
    info!("Starting parley");

    match cli.command {
        Command::Config => {
            show_config(&config, cli.config.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::History { session, limit } => {
            show_history(&config, &session, limit).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sessions => {
            list_sessions(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Session { action } => {
            manage_session(&config, action).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ask {
            query,
            session,
            title,
            format,
        } => ask(&config, query, session, title, format).await,
    }
}

/// Install the stderr subscriber, plus a daily rolling file when a log
/// directory is configured.
fn init_tracing(verbose: u8, directory: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "parley.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("error: {}", issue.message),
            Severity::Warning => eprintln!("warning: {}", issue.message),
        }
    }
}

fn show_config(config: &FileConfig, explicit: Option<&Path>) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    println!();
    println!("Database: {}", config.storage.database_path().display());
    println!();
    println!("{}", toml::to_string_pretty(config).context("Failed to render configuration")?);

    let issues = config.validate();
    if issues.is_empty() {
        println!("Configuration is valid.");
    } else {
        report_issues(&issues);
    }
    Ok(())
}

async fn show_history(config: &FileConfig, session: &str, limit: usize) -> Result<()> {
    let session_id = SessionId::new(session)?;
    let store = SqliteMessageStore::open(&config.storage.database_path())?;
    let messages = store.session_messages(&session_id, limit).await?;
    print!("{}", HistoryFormatter::format(&messages));
    Ok(())
}

fn sessions(config: &FileConfig) -> Result<ManageSessionsUseCase> {
    let store = Arc::new(SqliteMessageStore::open(&config.storage.database_path())?);
    Ok(ManageSessionsUseCase::new(store))
}

fn new_session_id() -> Result<SessionId> {
    Ok(SessionId::new(uuid::Uuid::new_v4().to_string())?)
}

async fn list_sessions(config: &FileConfig) -> Result<()> {
    let sessions = sessions(config)?.list().await?;
    print!("{}", SessionListFormatter::format(&sessions));
    Ok(())
}

async fn manage_session(config: &FileConfig, action: SessionAction) -> Result<()> {
    let use_case = sessions(config)?;
    match action {
        SessionAction::New { title } => {
            let session = use_case.open(&new_session_id()?, title.as_deref()).await?;
            println!("{}", session.id);
        }
        SessionAction::Rename { session, title } => {
            let title = use_case.rename(&SessionId::new(session)?, &title).await?;
            println!("Renamed to \"{title}\"");
        }
        SessionAction::Delete { session } => {
            let removed = use_case.delete(&SessionId::new(session)?).await?;
            println!("Deleted session and {removed} messages");
        }
    }
    Ok(())
}

fn event_sink(format: OutputFormat) -> Box<dyn EventSink> {
    match format {
        OutputFormat::Text => Box::new(ConsoleEventSink::stdio()),
        OutputFormat::Sse => Box::new(SseEventSink::stdout()),
        OutputFormat::Json => Box::new(JsonLinesEventSink::stdout()),
    }
}

fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = &config.logging.conversation_log else {
        return Arc::new(NoConversationLogger);
    };
    match JsonlConversationLogger::open(path) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            warn!(
                "Conversation log {} unavailable, continuing without it: {}",
                path.display(),
                e
            );
            Arc::new(NoConversationLogger)
        }
    }
}

/// First Ctrl-C stops the agent; a second one abandons persistence.
fn install_interrupt_handler(scopes: &TurnScopes) {
    let work = scopes.work.clone();
    let persist = scopes.persist.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, stopping the turn");
        work.cancel();

        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted again, abandoning persistence");
        persist.cancel();
    });
}

async fn stop_scheduler(handle: SchedulerHandle, config: &FileConfig) {
    let grace = config.summarization.shutdown_grace();
    match tokio::time::timeout(grace, handle.shutdown()).await {
        Ok(reports) => {
            let summarized: u64 = reports.iter().map(|r| r.summarized).sum();
            info!(workers = reports.len(), summarized, "Summarizer drained");
        }
        Err(_) => warn!(
            "Summarizer did not drain within {}s; pending summaries are lost",
            grace.as_secs()
        ),
    }
}

async fn ask(
    config: &FileConfig,
    query: String,
    session: Option<String>,
    title: Option<String>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let warnings = config.validated()?;
    report_issues(&warnings);

    // === Dependency Injection ===
    let store = Arc::new(SqliteMessageStore::open(&config.storage.database_path())?);

    let session_id = match session {
        Some(id) => SessionId::new(id)?,
        None => {
            let id = new_session_id()?;
            if format == OutputFormat::Text {
                eprintln!("session: {id}");
            }
            info!(session_id = %id, "Started new session");
            id
        }
    };
    ManageSessionsUseCase::new(store.clone())
        .open(&session_id, title.as_deref())
        .await?;
    let client = Arc::new(
        OpenAiClient::from_env(&config.agent.base_url, &config.agent.api_key_env)
            .context("Failed to create model client")?,
    );
    let tools = config.agent.to_tools().context("Failed to set up agent tools")?;
    if !tools.is_empty() {
        info!(tools = ?config.agent.tools, "Agent tools enabled");
    }
    let agent = Arc::new(
        OpenAiAgent::new(client.clone(), &config.agent.model)
            .with_tools(Arc::new(tools), config.agent.max_tool_rounds),
    );

    let scheduler = config.summarization.enabled.then(|| {
        let model = Arc::new(OpenAiSummaryModel::new(
            client.clone(),
            &config.summarization.model,
        ));
        SummarizationScheduler::new(
            store.clone(),
            model,
            config.summarization.to_summarizer_params(),
        )
        .start()
    });

    let mut use_case = RunTurnUseCase::new(agent, store)
        .with_params(config.agent.to_turn_params())
        .with_conversation_logger(conversation_logger(config));
    if let Some(handle) = &scheduler {
        use_case = use_case.with_dispatcher(Arc::new(handle.queue()));
    }

    let scopes = TurnScopes::new(CancellationToken::new(), CancellationToken::new());
    install_interrupt_handler(&scopes);

    let sink = event_sink(format);
    let result = use_case
        .execute(RunTurnInput::new(session_id, query), &scopes, sink.as_ref())
        .await;

    if let Some(handle) = scheduler {
        stop_scheduler(handle, config).await;
    }

    match result {
        Ok(output) if output.outcome == TurnOutcome::Cancelled => {
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(RunTurnError::Persist(e)) if scopes.persist.is_cancelled() => {
            warn!("Turn was not saved: {}", e);
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        // already reported through the event sink
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
