//! CLI entry point for the AQI trend tool.
//!
//! Loads air-quality records from a file or the air-data API and prints the
//! yearly trend report or just the summary statistics.

use anyhow::{Context, Result};
use aqi_trend::analyzers::analyzer::analyze_source;
use aqi_trend::analyzers::types::{AnalysisConfig, DEFAULT_HORIZON};
use aqi_trend::fetch::BasicClient;
use aqi_trend::fetch::auth::ApiKey;
use aqi_trend::output::{print_pretty, write_json, write_series_csv, write_table};
use aqi_trend::parser::RecordFormat;
use aqi_trend::services::record_store::{FileStore, HttpStore, RecordStore};
use aqi_trend::stats::Summary;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aqi_trend")]
#[command(about = "Yearly air-quality trend and short-horizon forecast", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full trend report: summary, yearly series and forecast
    Analyze {
        /// Path to a JSON/CSV file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Input format (inferred from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        /// Number of periods to forecast past the last observed year
        #[arg(long, default_value_t = DEFAULT_HORIZON)]
        horizon: usize,

        /// How to print the report
        #[arg(short, long, value_enum, default_value_t = OutputMode::Json)]
        output: OutputMode,
    },
    /// Print only the summary statistics
    Summary {
        /// Path to a JSON/CSV file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Input format (inferred from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    Json,
    Csv,
}

impl From<InputFormat> for RecordFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Json => RecordFormat::Json,
            InputFormat::Csv => RecordFormat::Csv,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputMode {
    /// Pretty-printed JSON
    Json,
    /// Plain-text table
    Pretty,
    /// CSV of the chart series
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aqi_trend.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aqi_trend.log"));

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
    let stdout = std::io::stdout();

    match cli.command {
        Commands::Analyze {
            source,
            format,
            horizon,
            output,
        } => {
            let store = open_store(&source, format)?;
            let config = AnalysisConfig { horizon };
            let report = analyze_source(store.as_ref(), &config).await?;
            print_pretty(&report);

            debug!(?output, "Writing report");
            match output {
                OutputMode::Json => write_json(stdout.lock(), &report)?,
                OutputMode::Pretty => write_table(stdout.lock(), &report)?,
                OutputMode::Csv => write_series_csv(stdout.lock(), &report.series)?,
            }
        }
        Commands::Summary { source, format } => {
            let store = open_store(&source, format)?;
            let measurements = store.load().await?;
            let summary = Summary::from_measurements(&measurements);

            info!(
                records = summary.record_count,
                average_index = summary.average_index,
                trend_slope = summary.trend_slope,
                "Summary computed"
            );
            write_json(stdout.lock(), &summary)?;
        }
    }

    Ok(())
}

/// Picks a file or HTTP store for `source`.
///
/// URL sources send `AQI_API_TOKEN` as a bearer token when it is set.
fn open_store(source: &str, format: Option<InputFormat>) -> Result<Box<dyn RecordStore>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let format = format.map_or(RecordFormat::Json, RecordFormat::from);
        let client = BasicClient::new()?;
        let store: Box<dyn RecordStore> = match std::env::var("AQI_API_TOKEN") {
            Ok(token) => {
                let client = ApiKey::bearer(client, &token)
                    .context("AQI_API_TOKEN cannot be sent as a bearer token")?;
                Box::new(HttpStore::new(client, source).with_format(format))
            }
            Err(_) => {
                info!("AQI_API_TOKEN not set, fetching without authentication");
                Box::new(HttpStore::new(client, source).with_format(format))
            }
        };
        Ok(store)
    } else {
        let store = FileStore::new(source);
        Ok(Box::new(match format {
            Some(format) => store.with_format(format.into()),
            None => store,
        }))
    }
}
