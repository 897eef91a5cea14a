//! Apexboard CLI - Formula 1 dashboard proxy
//!
//! # Main Command
//!
//! ```bash
//! apexboard serve                        # Start HTTP proxy (port 3000)
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! apexboard timeline race.json drivers.json   # Reconstruct a race timeline
//! apexboard comparison raw.json               # Build comparison series
//! ```
//!
//! The debug commands run the pure transforms over JSON files shaped like
//! the proxy's own responses, so a captured payload can be replayed
//! offline.

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use apexboard::{
    build_comparison, driver_lookup, logging::setup_logging, reconstruct, server::start_server,
    ComparisonRaw, DriverRef, RaceData,
};

#[derive(Parser)]
#[command(name = "apexboard")]
#[command(about = "Formula 1 dashboard proxy over the Ergast API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP proxy server
    Serve {
        /// Port to listen on (overrides PORT from the environment)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Reconstruct a race-event timeline from captured race data
    Timeline {
        /// Race data JSON: `{"laps": [...], "pitStops": [...]}`
        race: PathBuf,

        /// Driver roster JSON: `[{"driverId": ..., "name": ...}]`
        drivers: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build chart-ready comparison series from raw statistic values
    Comparison {
        /// Raw values JSON keyed by statistic:
        /// `{"position": [{"name": ..., "value": ...}], ...}`
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = setup_logging() {
        eprintln!("⚠️  Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port } => cmd_serve(port).await,
        Commands::Timeline { race, drivers, output } => {
            cmd_timeline(&race, &drivers, output.as_deref())
        }
        Commands::Comparison { input, output } => cmd_comparison(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = port.unwrap_or(apexboard::config::CONFIG.port);
    start_server(port).await
}

fn cmd_timeline(
    race: &Path,
    drivers: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Reconstructing timeline from: {}", race.display());

    let data: RaceData = read_json(race)?;
    let roster: Vec<DriverRef> = read_json(drivers)?;
    eprintln!(
        "   {} pit stops, {} laps, {} drivers",
        data.pit_stops.len(),
        data.laps.len(),
        roster.len()
    );

    let events = reconstruct(&data.pit_stops, &data.laps, &driver_lookup(&roster));
    if events.is_empty() {
        eprintln!("⚠️  No events reconstructed (no data for this race?)");
    } else {
        eprintln!("✅ {} events", events.len());
    }

    let json = serde_json::to_string_pretty(&events)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_comparison(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Building comparison series from: {}", input.display());

    let raw: ComparisonRaw = read_json(input)?;
    let series = build_comparison(&raw);

    let total: usize = series.values().map(Vec::len).sum();
    eprintln!("✅ {} series points across {} statistics", total, series.len());

    let json = serde_json::to_string_pretty(&series)?;
    write_output(&json, output)?;

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
