//! Traffic Overlay CLI - Command-line interface
//!
//! Computes traffic severity overlays for a route from JSON files, either
//! once (`overlay`) or on the periodic refresh loop (`watch`).

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::{ElementPolicy, Resolution};
use commands::overlay::OverlayArgs;
use commands::watch::WatchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "traffic-overlay")]
#[command(about = "Route traffic severity overlays", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging for the overlay engine
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the overlay for a route and an events snapshot
    Overlay {
        /// Route JSON file
        #[arg(long)]
        route: PathBuf,

        /// Traffic events JSON file
        #[arg(long)]
        events: PathBuf,

        /// Handling of route elements without an identifier
        #[arg(long, value_enum, default_value_t = ElementPolicy::Skip)]
        policy: ElementPolicy,

        /// Resolution of conflicting events on one element
        #[arg(long, value_enum, default_value_t = Resolution::LastWriteWins)]
        resolution: Resolution,

        /// Print intervals as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute the overlay periodically, re-reading the events file
    Watch {
        /// Route JSON file
        #[arg(long)]
        route: PathBuf,

        /// Traffic events JSON file, re-read on every tick
        #[arg(long)]
        events: PathBuf,

        /// Handling of route elements without an identifier
        #[arg(long, value_enum, default_value_t = ElementPolicy::Skip)]
        policy: ElementPolicy,

        /// Resolution of conflicting events on one element
        #[arg(long, value_enum, default_value_t = Resolution::LastWriteWins)]
        resolution: Resolution,

        /// Seconds between refreshes (default: 15)
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Exit after this many deliveries
        #[arg(long)]
        ticks: Option<u64>,

        /// Print intervals as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = traffic_overlay::logging::init_logging(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Overlay {
            route,
            events,
            policy,
            resolution,
            json,
        } => commands::overlay::run(OverlayArgs {
            route,
            events,
            policy,
            resolution,
            json,
        }),
        Commands::Watch {
            route,
            events,
            policy,
            resolution,
            interval_secs,
            ticks,
            json,
        } => commands::watch::run(WatchArgs {
            route,
            events,
            policy,
            resolution,
            interval_secs,
            ticks,
            json,
        }),
    }
}
