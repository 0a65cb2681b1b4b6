//! Revenue Anomaly CLI
//!
//! Reads country/month revenue observations from a JSON file, scores them and
//! writes either the ordered anomaly records or the alert decision as JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use alerting::{AlertConfig, AlertDecision, AlertEvaluator, AlertMessage, AlertScope};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use revenue_validator::{RawRevenueRow, RevenueObservation};
use scoring_engine::{AnomalyEngine, EngineConfig};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Score country/month revenue for anomalies")]
pub struct Cli {
    /// JSON array of observations
    pub input: PathBuf,

    /// TOML/JSON/YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit the alert decision instead of the scored records
    #[arg(long)]
    pub alerts: bool,

    /// Only alert on the most recent month
    #[arg(long)]
    pub latest_month: bool,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Layered settings: defaults, then the settings file, then `ANOMALY__*` env
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    pub alerts: AlertConfig,
    pub log_format: LogFormat,
}

/// Load settings, e.g. `ANOMALY__ENGINE__FLAG_THRESHOLD=60`
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_layered(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix("ANOMALY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_layered(path: Option<&Path>, env: Environment) -> Result<Settings> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let settings: Settings = builder
        .add_source(env)
        .build()
        .context("failed to load settings")?
        .try_deserialize()
        .context("invalid settings")?;
    Ok(settings)
}

/// Parse observations from JSON text
pub fn parse_observations(json: &str) -> Result<Vec<RevenueObservation>> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(json).context("input must be a JSON array of observations")?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            parse_row(row).with_context(|| format!("invalid observation at index {}", i))
        })
        .collect()
}

/// `{country, month: "YYYY-MM", revenue}`, or a raw `{country, year, month, revenue}` row
fn parse_row(row: serde_json::Value) -> Result<RevenueObservation> {
    if row.get("year").is_some() {
        let raw: RawRevenueRow = serde_json::from_value(row)?;
        Ok(RevenueObservation::try_from(raw)?)
    } else {
        Ok(serde_json::from_value(row)?)
    }
}

/// Read observations from a JSON file
pub fn read_observations(path: &Path) -> Result<Vec<RevenueObservation>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    parse_observations(&text)
}

/// JSON emitted with `--alerts`
#[derive(Debug, Serialize)]
pub struct AlertReport {
    pub decision: AlertDecision,
    pub message: Option<AlertMessage>,
    pub payload: Option<serde_json::Value>,
}

impl AlertReport {
    pub fn new(decision: AlertDecision) -> Self {
        let message = AlertMessage::from_decision(&decision);
        let payload = message.as_ref().map(AlertMessage::to_payload);
        Self {
            decision,
            message,
            payload,
        }
    }
}

/// Initialize logging on stderr; `RUST_LOG` overrides the default `info` level
pub fn init_logging(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("failed to set tracing subscriber: {}", e))
}

/// Score the input and render the requested JSON document
pub fn render(settings: &Settings, cli: &Cli, observations: &[RevenueObservation]) -> Result<String> {
    let engine = AnomalyEngine::new(settings.engine.clone())?;
    let records = engine.score(observations).context("scoring failed")?;

    let json = if cli.alerts {
        let mut alert_config = settings.alerts.clone();
        if cli.latest_month {
            alert_config.scope = AlertScope::LatestMonth;
        }
        let decision = AlertEvaluator::new(alert_config).evaluate(&records);
        serde_json::to_string_pretty(&AlertReport::new(decision))?
    } else {
        serde_json::to_string_pretty(&records)?
    };
    Ok(json)
}

/// Entry point shared by the binary
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(cli.log_format.unwrap_or(settings.log_format))?;

    info!("=== Revenue Anomaly v{} ===", env!("CARGO_PKG_VERSION"));
    let observations = read_observations(&cli.input)?;
    info!(
        "Loaded {} observations from {}",
        observations.len(),
        cli.input.display()
    );

    let json = render(&settings, &cli, &observations)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
            info!("Wrote results to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
