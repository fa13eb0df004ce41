//! Climate Risk Service - command-line entry point
//!
//! Scores flood, wildfire, wind, drought and storm risk for insured
//! properties from Open-Meteo forecast and river discharge data, and
//! derives a premium multiplier from the result.
//!
//! Usage:
//!   cargo run --release -- assess --lat 29.95 --lon -90.07
//!   cargo run --release -- assess-files --weather forecast.json --flood flood.json
//!   cargo run --release -- portfolio --properties properties.toml
//!   cargo run --release -- serve --port 8080
//!
//! Environment:
//!   RUST_LOG - log filter (default: info)

use clap::{Parser, Subcommand};
use climate_risk_service::analysis::RiskEngine;
use climate_risk_service::config::{self, RiskConfig};
use climate_risk_service::endpoint;
use climate_risk_service::evaluator::{LocationEvaluator, OpenMeteoSource};
use climate_risk_service::ingest::open_meteo;
use climate_risk_service::model::Coordinate;
use climate_risk_service::portfolio::runner::{PortfolioRunner, DEFAULT_WORKERS};
use climate_risk_service::portfolio::{OutcomeReport, PortfolioSummary};
use climate_risk_service::properties::{self, DEFAULT_PROPERTIES_PATH};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "climate_risk_service", version, about = "Multi-hazard climate risk scoring")]
struct Cli {
    /// Risk calibration file (defaults to ./risk.toml, or built-in values if absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Upstream request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and score a single coordinate
    Assess {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Score saved Open-Meteo forecast and flood responses
    AssessFiles {
        #[arg(long)]
        weather: PathBuf,
        #[arg(long)]
        flood: PathBuf,
    },
    /// Score every property in the registry
    Portfolio {
        #[arg(long, default_value = DEFAULT_PROPERTIES_PATH)]
        properties: PathBuf,
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Serve the HTTP endpoint
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Serialize)]
struct PortfolioReport {
    summary: PortfolioSummary,
    properties: Vec<OutcomeReport>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let risk_config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    let engine = RiskEngine::from_config(&risk_config);

    match cli.command {
        Command::Assess { lat, lon } => {
            let evaluator = live_evaluator(engine, cli.timeout)?;
            let assessment = evaluator.evaluate(Coordinate::new(lat, lon)?)?;
            print_json(&assessment)
        }
        Command::AssessFiles { weather, flood } => {
            let weather = open_meteo::parse_forecast_response(&fs::read_to_string(&weather)?)?;
            let hydrology = open_meteo::parse_flood_response(&fs::read_to_string(&flood)?)?;
            let assessment = engine.evaluate(&weather, &hydrology)?;
            print_json(&assessment)
        }
        Command::Portfolio { properties: path, workers } => {
            let registry = properties::load_properties_from(&path)?;
            info!(path = %path.display(), properties = registry.len(), "loaded property registry");

            let runner = PortfolioRunner::new(live_evaluator(engine, cli.timeout)?).with_workers(workers);
            let outcomes = runner.run(&registry);
            let report = PortfolioReport {
                summary: PortfolioSummary::from_outcomes(&outcomes),
                properties: outcomes.iter().map(|o| o.report()).collect(),
            };
            print_json(&report)
        }
        Command::Serve { port } => {
            log_calibration(&risk_config);
            let evaluator = live_evaluator(engine, cli.timeout)?;
            endpoint::start_endpoint_server(port, evaluator)?;
            Ok(())
        }
    }
}

fn live_evaluator(engine: RiskEngine, timeout_secs: u64) -> Result<LocationEvaluator, Box<dyn Error>> {
    let client = open_meteo::build_client(Duration::from_secs(timeout_secs))?;
    Ok(LocationEvaluator::new(Arc::new(OpenMeteoSource::new(client)), engine))
}

fn log_calibration(config: &RiskConfig) {
    let t = &config.thresholds;
    info!(
        flood_high_discharge = t.flood.high_discharge,
        wildfire_high_factor = t.wildfire.high_factor,
        wind_high_gust = t.wind.high_gust,
        drought_high_factor = t.drought.high_factor,
        storm_high_factor = t.storm.high_factor,
        premium_high = %config.premium.high,
        premium_medium = %config.premium.medium,
        "risk calibration loaded"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
