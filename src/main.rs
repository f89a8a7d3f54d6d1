// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SimpleLog main entry point - CLI, configuration and the HTTP server.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info, warn};

use simplelog::api::{self, AppState};
use simplelog::config::{self, CliOptions, ServerConfig};
use simplelog::telemetry::{init_telemetry, TelemetryConfig};
use simplelog::VERSION;

/// SimpleLog - structured event telemetry service.
#[derive(Parser)]
#[command(name = "simplelog")]
#[command(author, version, about = "Structured event telemetry service", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "SIMPLELOG_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SIMPLELOG_PORT")]
    port: Option<u16>,

    /// Environment name (Development, Staging, Production)
    #[arg(short, long, env = "SIMPLELOG_ENVIRONMENT")]
    environment: Option<String>,

    /// Minimum log level (debug, info, warning, error, critical)
    #[arg(long, env = "SIMPLELOG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for daily rolling log files
    #[arg(long, env = "SIMPLELOG_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Subcommands for simplelog.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Initialize a new configuration file
    Init,

    /// Show version information
    Version,
}

/// Config subcommand actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_options = CliOptions {
        host: cli.host,
        port: cli.port,
        environment: cli.environment,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    };

    match cli.command {
        Some(Commands::Serve) | None => serve(cli_options).await,
        Some(Commands::Config { action }) => match action {
            Some(ConfigAction::Show) | None => show_config(cli_options),
        },
        Some(Commands::Init) => {
            let workspace_root = std::env::current_dir()?;
            let path = config::init_config(&workspace_root, None)?;
            println!("{} {}", "Created config file:".green(), path.display());
            Ok(())
        }
        Some(Commands::Version) => {
            println!("simplelog {}", VERSION);
            Ok(())
        }
    }
}

/// The nearest ancestor holding a config file, or the current directory.
fn workspace_root() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(config::find_workspace_root(&cwd).unwrap_or(cwd))
}

fn show_config(cli_options: CliOptions) -> anyhow::Result<()> {
    let workspace_root = workspace_root()?;
    let config = config::load_config(&workspace_root, cli_options)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Load configuration, bring up telemetry and serve until shutdown.
///
/// A failure after telemetry is up is logged as critical before the log
/// writer is flushed.
async fn serve(cli_options: CliOptions) -> anyhow::Result<()> {
    let workspace_root = workspace_root()?;
    let config = config::load_config(&workspace_root, cli_options)
        .context("failed to load configuration")?;

    let guard = init_telemetry(&telemetry_config(&config)?)?;
    if config.is_development() {
        debug!(?config, "resolved configuration");
    }
    let state = AppState::with_tracing_sink(config.clone());

    let result = run(&config, state.clone()).await;
    if let Err(err) = &result {
        let cause: &(dyn std::error::Error + 'static) = err.as_ref();
        state
            .sink
            .log_critical("Application terminated unexpectedly", Some(cause));
    }

    debug!("{}", state.metrics.snapshot().format_report());
    guard.flush();
    result
}

fn telemetry_config(config: &ServerConfig) -> anyhow::Result<TelemetryConfig> {
    let severity = config.severity()?;
    let mut telemetry = TelemetryConfig::for_environment(&config.environment)
        .with_level(severity.tracing_level());
    if let Some(dir) = &config.log_dir {
        telemetry = telemetry.with_log_dir(dir, config.log_retention);
    }
    Ok(telemetry)
}

async fn run(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    state.sink.log_info(&format!(
        "{} {} listening on {} ({})",
        config.service_name,
        VERSION,
        listener.local_addr()?,
        config.environment
    ));

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!(error = %err, "unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
