//! Warden: authorization and session-control service
//!
//! Main entry point that wires all crates together and runs the selected command.

mod app;

use clap::{Parser, Subcommand};
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use warden_core::config::AppConfig;
use warden_core::error::AppError;
use warden_worker::CronScheduler;

use crate::app::App;

/// Warden: distributed locks, sessions and resource permissions
#[derive(Debug, Parser)]
#[command(name = "warden", version, about, long_about = None)]
struct Cli {
    /// Directory holding `default.toml` and the environment overlays
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Environment overlay to apply on top of the defaults
    #[arg(short, long, env = "WARDEN_ENV", default_value = "development")]
    env: String,

    /// Command to run
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the scheduled maintenance tasks until interrupted
    Serve,
    /// Run one resource reconciliation pass and exit
    Reconcile,
    /// Run one session expiry sweep and retention purge and exit
    Sweep,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(cli.command, config).await {
        tracing::error!(error = %e, "Warden error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Warden v{}", env!("CARGO_PKG_VERSION"));

    let app = App::build(config).await?;
    let outcome = match command {
        Commands::Serve => serve(&app).await,
        Commands::Reconcile => match app.reconcile.run().await? {
            Some(summary) => {
                println!("{summary}");
                Ok(())
            }
            None => {
                println!("skipped: reconciliation already running on another instance");
                Ok(())
            }
        },
        Commands::Sweep => {
            let expired = app.sweeper.run_sweep().await?;
            let purged = app.sweeper.run_purge().await?;
            println!("expired={expired} purged={purged}");
            Ok(())
        }
    };

    app.close().await;
    outcome
}

async fn serve(app: &App) -> Result<(), AppError> {
    // ── Step 1: Startup reconciliation ───────────────────────────
    if app.config.reconcile.run_on_startup {
        // A failed pass must not keep the service down; the schedule retries.
        let _ = app.reconcile.run().await;
    }

    // ── Step 2: Scheduled maintenance ────────────────────────────
    let mut scheduler = CronScheduler::new().await?;
    scheduler
        .register_default_tasks(
            &app.sweeper,
            &app.reconcile,
            &app.config.session,
            &app.config.reconcile,
        )
        .await?;
    scheduler.start().await?;

    // ── Step 3: Wait for shutdown ────────────────────────────────
    tracing::info!("Warden running, press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;

    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await?;
    tracing::info!("Warden stopped");
    Ok(())
}
