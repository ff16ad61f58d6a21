use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terra_stats::api::state::AppState;
use terra_stats::calculate::Records;
use terra_stats::config::AppConfig;
use terra_stats::fetch::{Fetcher, FetcherConfig};
use terra_stats::pipeline::{self, StatsContext};
use terra_stats::storage::DataDir;

#[derive(Parser)]
#[command(name = "terra-stats")]
#[command(about = "Terraforming Mars game statistics from saved result pages")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scan the data directory and print the processed games
    Scan {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Print the records summary instead of the game list
        #[arg(long)]
        records: bool,
    },

    /// Download a finished game page into the data directory
    Fetch {
        /// Game page URL
        url: String,

        /// File name to save as (defaults to today's next free slot)
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting terra-stats v{}", env!("CARGO_PKG_VERSION"));

    let stats = StatsContext::from_config(&config)?;
    let data_dir = DataDir::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve { host, port } => {
            let fetcher = Fetcher::new(FetcherConfig::from(&config.fetch))?;
            let state = AppState {
                data_dir: Arc::new(data_dir),
                stats: Arc::new(stats),
                fetcher: Arc::new(fetcher),
                cors_origin: Some(config.server.cors_origin.clone()),
            };
            let app = terra_stats::api::build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Serving stats on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Scan { pretty, records } => {
            let report = tokio::task::spawn_blocking(move || pipeline::scan(&data_dir, &stats))
                .await??;

            for skipped in &report.skipped {
                eprintln!("skipped {}: {}", skipped.file_name, skipped.reason);
            }

            let value = if records {
                serde_json::to_value(Records::from_games(&report.games))?
            } else {
                serde_json::to_value(&report.games)?
            };
            let out = if pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{}", out);
        }
        Commands::Fetch { url, name } => {
            let fetcher = Fetcher::new(FetcherConfig::from(&config.fetch))?;
            let file_name = fetcher.save(&url, name.as_deref(), &data_dir).await?;
            println!("Saved {}", data_dir.path.join(file_name).display());
        }
    }

    Ok(())
}
