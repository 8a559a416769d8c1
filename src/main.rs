//! Telemetry Stats Agent CLI
//!
//! Windowed telemetry aggregation service.

use clap::{Parser, Subcommand};
use std::time::Duration;
use telemetry_stats_agent::{
    config::Config,
    server::{run, ServerConfig},
    VERSION,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "telemetry-stats")]
#[command(version = VERSION)]
#[command(about = "Windowed telemetry aggregation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP ingest and stats server
    Serve {
        /// Port to bind to (overrides the configured port)
        #[arg(long)]
        port: Option<u16>,

        /// Retention window in milliseconds (overrides the configured window)
        #[arg(long)]
        window_ms: Option<u64>,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, window_ms } => {
            cmd_serve(port, window_ms).await;
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

async fn cmd_serve(port: Option<u16>, window_ms: Option<u64>) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: could not load configuration: {e}");
            eprintln!("Continuing with defaults.");
            Config::default()
        }
    };
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(window_ms) = window_ms {
        config.window_duration = Duration::from_millis(window_ms);
    }

    let server_config = ServerConfig::new(config.port, config.window_duration);
    let (addr, shutdown_tx) = match run(server_config).await {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: failed to start server: {e}");
            std::process::exit(1);
        }
    };

    println!("Telemetry Stats Agent v{VERSION}");
    println!("  Listening on: http://{addr}");
    println!("  Window: {}ms", config.window_duration.as_millis());
    println!();
    println!("Press Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Error waiting for shutdown signal: {e}");
    }

    println!();
    println!("Shutting down...");
    let _ = shutdown_tx.send(());
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration file: {}", Config::config_path().display());
    println!("  Port: {}", config.port);
    println!("  Window: {}ms", config.window_duration.as_millis());
}
