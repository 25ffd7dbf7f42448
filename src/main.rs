//! Skylift - self-serve console for short-lived analysis workers.
//!
//! Main entry point for the Skylift CLI and server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use skylift_api::{AppState, create_router};
use skylift_config::{Config, ConfigLoader, ConfigValidator};

/// Skylift CLI.
#[derive(Parser)]
#[command(name = "skylift")]
#[command(about = "Self-serve console for launching short-lived analysis workers")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    /// Directory for rolling log files (stdout only when unset)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the console server in foreground (default)
    Run {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load the configuration, validate it, and report problems
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_dir.as_deref());

    let config = load_config(&cli.config)?;

    match cli.command.unwrap_or(Commands::Run {
        host: None,
        port: None,
    }) {
        Commands::Run { host, port } => run_server(config, host, port).await,
        Commands::CheckConfig => check_config(&config),
    }
}

/// Install the tracing subscriber; the returned guard keeps the file
/// appender flushing until exit.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,skylift=debug"));

    match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "skylift.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .init();
            None
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        let config = ConfigLoader::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    } else {
        warn!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config)?;

    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for error in &result.errors {
        tracing::error!(path = %error.path, "{}", error.message);
    }

    if result.is_valid() {
        info!("configuration is valid");
        Ok(())
    } else {
        bail!("configuration has {} error(s)", result.errors.len());
    }
}

async fn run_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let result = ConfigValidator::validate(&config)?;
    for warning in &result.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !result.is_valid() {
        for error in &result.errors {
            tracing::error!(path = %error.path, "{}", error.message);
        }
        bail!("refusing to start with invalid configuration");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Cloud seams are in-process; a production deployment wires real SDK
    // clients into AppState::new instead.
    warn!("using in-process cloud services, launched workers are simulated");
    let state = Arc::new(AppState::dev(config));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "console listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("console stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to install ctrl-c handler");
        return;
    }
    info!("shutdown requested");
}
