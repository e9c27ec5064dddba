//! SaveMate CLI
//!
//! Find deals near a point, look up places, and manage favorites.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use savemate_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;
mod output;

use commands::favorites::FavoritesAction;
use commands::nearby::{Origin, Radius};
use commands::{distance, favorites, nearby, suggest, whereami};
use context::AppContext;
use output::OutputFormat;

/// Nearby deals and location lookup for SaveMate
#[derive(Parser)]
#[command(name = "savemate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (defaults to .savemate.toml lookup)
    #[arg(short, long, global = true, env = "SAVEMATE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List deals within a radius of a point or place
    Nearby {
        /// JSON file with deal records
        #[arg(short, long)]
        deals: PathBuf,

        /// Latitude of the search origin
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the search origin
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Place name to search around
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        near: Option<String>,

        /// Search radius in kilometers (defaults to search.default_radius_km)
        #[arg(short, long)]
        radius: Option<f64>,

        /// Annotate every located deal with its distance, without a radius cut
        #[arg(long, conflicts_with = "radius")]
        all: bool,

        /// Keep file order instead of nearest first
        #[arg(long)]
        no_sort: bool,
    },

    /// Suggest places for typed text
    Suggest {
        /// Text to look up
        query: String,
    },

    /// Name the place at a position
    Whereami {
        /// Latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Manage favorite deals
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Great-circle distance between two points
    Distance {
        /// Latitude of the first point
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        /// Longitude of the first point
        #[arg(allow_negative_numbers = true)]
        lng1: f64,
        /// Latitude of the second point
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        /// Longitude of the second point
        #[arg(allow_negative_numbers = true)]
        lng2: f64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = savemate_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.format)?;

    match cli.command {
        Commands::Nearby { deals, lat, lng, near, radius, all, no_sort } => {
            let origin = match (lat, lng, near) {
                (Some(lat), Some(lng), _) => Origin::Point(lat, lng),
                (_, _, Some(place)) => Origin::Place(place),
                _ => Origin::Anywhere,
            };
            let radius = match (radius, all) {
                (_, true) => Radius::Unbounded,
                (Some(km), false) => Radius::Km(km),
                (None, false) => Radius::Default,
            };
            nearby::run(&ctx, &deals, origin, radius, no_sort).await
        }
        Commands::Suggest { query } => suggest::run(&ctx, &query).await,
        Commands::Whereami { lat, lng } => whereami::run(&ctx, lat, lng).await,
        Commands::Favorites { action } => favorites::run(&ctx, action),
        Commands::Distance { lat1, lng1, lat2, lng2 } => {
            distance::run(&ctx, (lat1, lng1), (lat2, lng2))
        }
    }
}
