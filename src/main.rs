//! CLI entry point for the NPS trends tool.
//!
//! Loads the HubSpot and Google Form survey exports, prints NPS/CSAT tables,
//! trend series and the annual gauge, and can publish the full report to S3.

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use nps_trends::analyzers::analyzer::{Prepared, analyze_prepared};
use nps_trends::analyzers::trend::{available_years, gauge_for_year, trend_series};
use nps_trends::analyzers::types::{TrendDataset, TrendSeries};
use nps_trends::analyzers::writetos3::write_json_to_s3;
use nps_trends::config::AnalysisConfig;
use nps_trends::fetch::load_source;
use nps_trends::output::{render_gauge, render_report, render_trend, write_report_files};
use nps_trends::parser::{RawTable, parse_table};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "nps_trends")]
#[command(about = "NPS and CSAT analysis of training programme survey exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("sources")
        .args(["hubspot", "form"])
        .required(true)
        .multiple(true)
))]
struct SourceArgs {
    /// HubSpot survey export (path or URL)
    #[arg(long, value_name = "FILE_OR_URL")]
    hubspot: Option<String>,

    /// Google Form export (path or URL)
    #[arg(long, value_name = "FILE_OR_URL")]
    form: Option<String>,

    /// JSON config with thresholds and column names (falls back to NPS_CONFIG)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DatasetArg {
    Combined,
    Hubspot,
    Forms,
}

impl From<DatasetArg> for TrendDataset {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Combined => TrendDataset::Combined,
            DatasetArg::Hubspot => TrendDataset::HubSpotOnly,
            DatasetArg::Forms => TrendDataset::FormsOnly,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every survey, CSAT and period table
    Report {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print the report as JSON instead of text tables
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write one CSV per table plus report.json into this directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the quarterly and yearly NPS trend series
    Trend {
        #[command(flatten)]
        sources: SourceArgs,

        /// Which responses feed the series
        #[arg(short, long, value_enum, default_value_t = DatasetArg::Combined)]
        dataset: DatasetArg,
    },
    /// Print the annual NPS gauge for one year (latest by default)
    Gauge {
        #[command(flatten)]
        sources: SourceArgs,

        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Upload the full report as JSON to S3
    Publish {
        #[command(flatten)]
        sources: SourceArgs,

        /// S3 bucket name (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: String,

        /// Object key for the report
        #[arg(long, default_value = "aggregates/nps_report.json")]
        key: String,

        /// Gzip compress the JSON before uploading
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nps_trends.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nps_trends.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            sources,
            json,
            out_dir,
        } => {
            let (prepared, config) = prepare(&sources).await?;
            let report = analyze_prepared(prepared, &config);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report)?);
            }

            if let Some(dir) = out_dir {
                write_report_files(&dir, &report)?;
            }
        }
        Commands::Trend { sources, dataset } => {
            let (prepared, _) = prepare(&sources).await?;
            print_warnings(&prepared);

            let dataset = TrendDataset::from(dataset);
            let series = TrendSeries {
                dataset: dataset.to_string(),
                points: trend_series(&prepared.dataset(dataset)),
            };
            print!("{}", render_trend(&series)?);
        }
        Commands::Gauge { sources, year } => {
            let (prepared, _) = prepare(&sources).await?;
            print_warnings(&prepared);

            let rows = prepared.dataset(TrendDataset::Combined);
            let years = available_years(&rows);
            let Some(year) = year.or_else(|| years.first().copied()) else {
                println!("No dated responses to chart.");
                return Ok(());
            };

            match gauge_for_year(&rows, year) {
                Some(gauge) => print!("{}", render_gauge(&gauge)),
                None => {
                    let listed: Vec<String> = years.iter().map(i32::to_string).collect();
                    println!(
                        "No responses in {year}. Available years: {}",
                        listed.join(", ")
                    );
                }
            }
        }
        Commands::Publish {
            sources,
            s3_bucket,
            key,
            gzip,
        } => {
            let (prepared, config) = prepare(&sources).await?;
            let report = analyze_prepared(prepared, &config);

            let aws = aws_config::load_from_env().await;
            let s3 = aws_sdk_s3::Client::new(&aws);
            let key = write_json_to_s3(&s3, &s3_bucket, &key, &report, gzip).await?;
            println!("Report uploaded to s3://{s3_bucket}/{key}.");
        }
    }

    Ok(())
}

/// Resolves the config and loads and normalizes whichever sources were given.
async fn prepare(sources: &SourceArgs) -> Result<(Prepared, AnalysisConfig)> {
    let config = AnalysisConfig::resolve(sources.config.as_deref())?;
    let token = std::env::var("SOURCE_BEARER_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());

    let hubspot = load_table(sources.hubspot.as_deref(), token.as_deref()).await?;
    let form = load_table(sources.form.as_deref(), token.as_deref()).await?;

    let prepared = Prepared::new(hubspot.as_ref(), form.as_ref(), &config);
    Ok((prepared, config))
}

async fn load_table(location: Option<&str>, token: Option<&str>) -> Result<Option<RawTable>> {
    let Some(location) = location else {
        return Ok(None);
    };
    let bytes = load_source(location, token).await?;
    let table = parse_table(&bytes)?;
    info!(source = location, rows = table.len(), "Export loaded");
    Ok(Some(table))
}

fn print_warnings(prepared: &Prepared) {
    for warning in &prepared.warnings {
        warn!(%warning, "Source warning");
        println!("Warning: {warning}");
    }
}
