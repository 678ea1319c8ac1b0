//! routeconflate CLI - conflate road attribute interval sets per route
//!
//! Usage:
//!   routeconflate-cli conflate <routes.json> --towns <towns.json> [--output <out.json>]
//!   routeconflate-cli overlay <routes.json> --route <route_id>
//!
//! `routes.json` is an array of per-route inputs (segments, towns, speed
//! limits, lane counts), each interval set already in route measures.

use clap::{Parser, Subcommand};
use routeconflate::{
    AtomicProgressTracker, ConflateConfig, OptionExt, Rollup, RouteInputs, RouteKey, TownTable,
    atomize, conflate_routes,
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "routeconflate-cli")]
#[command(about = "Conflate linearly-referenced road attributes onto route segments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON); missing fields take defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce one summary record per segment for every route
    Conflate {
        /// JSON file with an array of route inputs
        input: PathBuf,

        /// JSON town table: [{ "town_id": 35, "town": "BOSTON" }, ...]
        #[arg(short, long)]
        towns: PathBuf,

        /// File listing allowed segment ids (comma or newline separated)
        #[arg(short, long)]
        segments: Option<PathBuf>,

        /// Output file for summary records (JSON); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only process primary-direction routes (NB / EB)
        #[arg(long)]
        primary_only: bool,
    },

    /// Print the cleaned atomic intervals of one route
    Overlay {
        /// JSON file with an array of route inputs
        input: PathBuf,

        /// Route id to overlay, e.g. "SR9 EB"
        #[arg(short, long)]
        route: String,

        /// File listing allowed segment ids (comma or newline separated)
        #[arg(short, long)]
        segments: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let result = match cli.command {
        Commands::Conflate {
            input,
            towns,
            segments,
            output,
            primary_only,
        } => run_conflate(
            &input,
            &towns,
            cli.config.as_deref(),
            segments.as_deref(),
            output.as_deref(),
            primary_only,
        ),
        Commands::Overlay {
            input,
            route,
            segments,
        } => run_overlay(&input, &route, cli.config.as_deref(), segments.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Build the run configuration from the optional config and segment list files.
fn load_config(
    config_path: Option<&Path>,
    segment_list: Option<&Path>,
) -> routeconflate::Result<ConflateConfig> {
    let config = match config_path {
        Some(path) => ConflateConfig::load(path)?,
        None => ConflateConfig::default(),
    };
    match segment_list {
        Some(path) => config.with_segment_list_file(path),
        None => Ok(config),
    }
}

fn load_routes(path: &Path) -> Result<Vec<RouteInputs>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let routes: Vec<RouteInputs> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Ok(routes)
}

/// Run the full pipeline over every route in the input file
fn run_conflate(
    input: &Path,
    towns: &Path,
    config_path: Option<&Path>,
    segment_list: Option<&Path>,
    output: Option<&Path>,
    primary_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, segment_list)?;
    let names = TownTable::load(towns)?;
    let mut routes = load_routes(input)?;

    println!("\n{}", "=".repeat(60));
    println!("CONFLATION");
    println!("{}", "=".repeat(60));
    println!("  Routes: {}", routes.len());
    println!("  Towns: {}", names.len());
    if let Some(filter) = &config.segment_filter {
        println!("  Segment filter: {} ids", filter.len());
    }

    if primary_only {
        routes.retain(|r| match RouteKey::parse(&r.route_id) {
            Ok(key) => key.is_primary(),
            Err(e) => {
                eprintln!("  [WARN] {}", e);
                false
            }
        });
        println!("  Primary-direction routes: {}", routes.len());
    }

    let progress = AtomicProgressTracker::new();
    let results = conflate_routes(&routes, &names, &config, &progress);

    let mut combined = Rollup::default();
    let mut failed = 0;

    println!("\n{}", "-".repeat(60));
    for (inputs, result) in routes.iter().zip(results) {
        match result {
            Ok(summary) => {
                println!(
                    "  [OK] {} - {} atoms, {} segments",
                    summary.route_id,
                    summary.atomic_intervals.len(),
                    summary.rollup.records.len()
                );
                combined.absorb(summary.rollup);
            }
            Err(e) => {
                eprintln!("  [ERR] {}: {}", inputs.route_id, e);
                failed += 1;
            }
        }
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &combined.records)?;
            writer.flush()?;
            println!("\nWrote {} records to {}", combined.records.len(), path.display());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&combined.records)?);
        }
    }

    println!("\n{}", "-".repeat(60));
    println!(
        "RESULTS: {} records, {} problem entries, {} failed routes",
        combined.records.len(),
        combined.problem_segments.len(),
        failed
    );
    combined.report_problems();

    if failed > 0 {
        return Err(format!("{} of {} routes failed", failed, routes.len()).into());
    }
    Ok(())
}

/// Print the cleaned atomic intervals of one route
fn run_overlay(
    input: &Path,
    route_id: &str,
    config_path: Option<&Path>,
    segment_list: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, segment_list)?;
    let routes = load_routes(input)?;
    let inputs = routes
        .iter()
        .find(|r| r.route_id == route_id)
        .ok_or_unknown_route(route_id)?;

    let atoms = atomize(inputs, &config)?;

    println!("\n{}", "=".repeat(60));
    println!("OVERLAY: {}", inputs.route_id);
    println!("{}", "=".repeat(60));
    println!(
        "  {:>10} {:>10} {:>12} {:>6} {:>6} {:>6}",
        "from", "to", "segment", "town", "speed", "lanes"
    );

    let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    for atom in &atoms {
        let attrs = &atom.attributes;
        println!(
            "  {:>10.4} {:>10.4} {:>12} {:>6} {:>6} {:>6}",
            atom.from_pos,
            atom.to_pos,
            show(attrs.segment.as_ref().map(|s| s.segment_id.clone())),
            show(attrs.town_id.map(|v| v.to_string())),
            show(attrs.speed_limit.map(|v| v.to_string())),
            show(attrs.lane_count.map(|v| v.to_string())),
        );
    }
    println!("\n  {} atomic intervals", atoms.len());
    Ok(())
}
