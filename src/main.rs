//! Smita API Server
//!
//! Run with: cargo run --bin smita -- --config ./config.toml
//!
//! Configuration comes from `--config`, else the default locations, with
//! `SMITA_*` environment overrides; see [`smita::config`]. `RUST_LOG`
//! takes precedence over the configured log level.

use clap::Parser;
use smita::api::{serve, AppState};
use smita::config::{Config, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smita")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Restaurant reservation service")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The configured subscriber depends on the config, so loading logs
    // through a plain one
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .finish();
    let mut config =
        tracing::subscriber::with_default(bootstrap, || Config::resolve(args.config.as_deref()))?;
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Smita API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        restaurant = %config.restaurant.name,
        tables = config.restaurant.tables.len(),
        time_slots = config.restaurant.time_slots.len(),
        admins = config.auth.admins.len(),
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    let background = state.spawn_background_tasks(config.booking_sweep_interval());
    let api_config = state.config.as_ref().clone();

    serve(state, &api_config).await?;

    for handle in background {
        handle.abort();
    }
    tracing::info!("Smita API server stopped");

    Ok(())
}

fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("smita={},tower_http=info", level).into())
}

fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(&logging.level));

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
