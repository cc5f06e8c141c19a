//! # Invitely Server
//!
//! Guest-list service for a single wedding.
//!
//! - **Invitees**: create, list, edit and remove guests over REST
//! - **Check-in**: mark arrivals at the venue
//! - **Live dashboard**: every change is pushed to WebSocket observers
//!
//! Records live in PostgreSQL; an in-memory backend is available for
//! demos and local development.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use invitely_config::{Config, ConfigLoad, ConfigLoader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invitely_server::{
    AppState,
    infra::startup::{connect_postgres, open_store},
    routes,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "invitely-server")]
#[command(about = "Wedding guest list with live check-in notifications")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to invitely.toml (overrides INVITELY_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli.serve)?;

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        return run_db_migrate(&config).await;
    }

    run_server(config).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(
                    message = %warning.message,
                    hint = %hint,
                    "configuration warning"
                )
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    Ok(config)
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let db = connect_postgres(config).await?;
    db.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = open_store(&config)
        .await
        .context("failed to open record store")?;

    let addr = config.bind_address();
    info!(
        backend = %config.storage.backend,
        "Starting Invitely server on {addr}"
    );

    let state = AppState::new(config, store);
    let app = routes::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
