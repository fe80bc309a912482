//! `sportmap` operator CLI
//!
//! Runs against the same configuration sources as the server
//! (`config.*`, `.env`, `SPORTMAP__*`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;

use sportmap::{
    logging,
    services::GeocodingService,
    state::{connect_pool, run_migrations},
    AppState, Config,
};

#[derive(Parser)]
#[command(name = "sportmap", version, about = "Sports facility registry tools")]
struct Cli {
    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Resolve free text to candidate coordinates
    Geocode {
        /// Address or place name
        query: String,

        /// Comma-separated ISO country codes
        #[arg(long)]
        countrycodes: Option<String>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Rank facilities by distance from a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Case-insensitive activity substring
        #[arg(long)]
        sport: Option<String>,

        /// Search radius in kilometres
        #[arg(long)]
        radius: Option<f64>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Registry-wide counts and top-10 breakdowns
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_simple_logging(&cli.log_level);

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    match cli.command {
        Commands::Migrate => {
            let pool = connect_pool(&config)
                .await
                .context("Failed to connect to the database")?;
            run_migrations(&pool)
                .await
                .context("Failed to apply migrations")?;
            println!("Migrations applied");
        }
        Commands::Geocode {
            query,
            countrycodes,
            limit,
        } => {
            let service = GeocodingService::new(config.geocoding.clone())
                .context("Failed to build geocoding client")?;
            let mut params = HashMap::from([("query".to_string(), query)]);
            if let Some(codes) = countrycodes {
                params.insert("countrycodes".to_string(), codes);
            }
            if let Some(limit) = limit {
                params.insert("limit".to_string(), limit.to_string());
            }
            let result = service.geocode(&params).await.context("Geocoding failed")?;
            print_json(&result)?;
        }
        Commands::Nearby {
            lat,
            lon,
            sport,
            radius,
            limit,
        } => {
            let state = connect(config).await?;
            let mut params = HashMap::from([
                ("lat".to_string(), lat.to_string()),
                ("lon".to_string(), lon.to_string()),
            ]);
            if let Some(sport) = sport {
                params.insert("sport".to_string(), sport);
            }
            if let Some(radius) = radius {
                params.insert("radius".to_string(), radius.to_string());
            }
            if let Some(limit) = limit {
                params.insert("limit".to_string(), limit.to_string());
            }
            let result = state
                .search_service
                .nearby(&params)
                .await
                .context("Nearby search failed")?;
            print_json(&result)?;
        }
        Commands::Stats => {
            let state = connect(config).await?;
            let stats = state
                .stats_service
                .compute()
                .await
                .context("Failed to compute statistics")?;
            print_json(&stats)?;
        }
    }

    Ok(())
}

async fn connect(config: Config) -> Result<AppState> {
    AppState::new(config)
        .await
        .context("Failed to initialize application state")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
