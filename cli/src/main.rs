//! CLI entrypoint for planqa
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context as _, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use planqa_application::{AnswerQuestionUseCase, NoProgress, PipelineProgressNotifier};
use planqa_infrastructure::{Adapters, ConfigLoader, Credentials, FileConfig, JsonlCycleAuditLogger};
use planqa_presentation::{AppState, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        let listing: Vec<String> = issues.iter().map(|e| format!("  - {e}")).collect();
        bail!("invalid configuration:\n{}", listing.join("\n"));
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    info!("Starting planqa");
    let pipeline = Arc::new(build_pipeline(&config)?);

    match command {
        Command::Ask {
            question,
            output,
            quiet,
        } => ask(&pipeline, &question, output, quiet).await,
        Command::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            serve(pipeline, &server.bind_address()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Console logging (stderr) plus an optional daily-rotated file.
///
/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "planqa.log");
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
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

fn build_pipeline(config: &FileConfig) -> Result<AnswerQuestionUseCase> {
    let credentials = Credentials::resolve(config)?;

    // === Dependency Injection ===
    let adapters =
        Adapters::build(config, &credentials).context("failed to build HTTP client")?;
    info!(
        model = adapters.gateway.model_name(),
        embeddings = %config.embeddings.model,
        "Adapters ready"
    );

    let mut pipeline = AnswerQuestionUseCase::new(
        adapters.gateway,
        adapters.store,
        &config.pipeline_params(),
        config.call_policy(),
    );

    if let Some(path) = &config.logging.audit_log {
        match JsonlCycleAuditLogger::new(path) {
            Some(logger) => {
                info!(path = %logger.path().display(), "Audit log enabled");
                pipeline = pipeline.with_audit_logger(Arc::new(logger));
            }
            None => warn!(path = %path.display(), "Audit log disabled"),
        }
    }

    Ok(pipeline)
}

async fn ask(
    pipeline: &AnswerQuestionUseCase,
    question: &str,
    output: OutputFormat,
    quiet: bool,
) -> Result<ExitCode> {
    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let reporter: Box<dyn PipelineProgressNotifier> = if quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    match pipeline
        .execute_with_progress(question, reporter.as_ref(), &cancellation)
        .await
    {
        Ok(result) => {
            let text = match output {
                OutputFormat::Answer => ConsoleFormatter::format_answer(&result),
                OutputFormat::Full => ConsoleFormatter::format(&result),
                OutputFormat::Json => ConsoleFormatter::format_json(&result),
            };
            println!("{}", text.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprint!("{}", ConsoleFormatter::format_error(&error));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn serve(pipeline: Arc<AnswerQuestionUseCase>, address: &str) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("could not bind {address}"))?;

    let shutdown = CancellationToken::new();
    let on_interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            on_interrupt.cancel();
        }
    });

    planqa_presentation::serve(listener, AppState::new(pipeline), shutdown).await?;
    Ok(())
}
