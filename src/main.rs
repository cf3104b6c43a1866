//! CLI entry point for the student score analyzer.
//!
//! Fetches scores (or falls back to the built-in sample), prints a ranked
//! summary and saves a four-panel chart. Every flag has an environment
//! fallback; with none set the defaults reproduce the plain run.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use student_scores::chart::DEFAULT_CHART_PATH;
use student_scores::fetch::{BasicClient, DEFAULT_TIMEOUT, DEFAULT_URL};
use student_scores::{Analyzer, AnalyzerConfig, SubjectSchema};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "student_scores")]
#[command(about = "Summarise and chart student scores", long_about = None)]
struct Cli {
    /// Endpoint returning a JSON array of student objects
    #[arg(long, env = "SCORES_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, env = "SCORES_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Where to save the chart image
    #[arg(short, long, env = "SCORES_CHART_PATH", default_value = DEFAULT_CHART_PATH)]
    output: PathBuf,

    /// Comma-separated subjects to accept (default: any key besides "name")
    #[arg(long, env = "SCORES_SUBJECTS")]
    subjects: Option<String>,

    /// Optional CSV file for per-student averages and ranks
    #[arg(long, env = "SCORES_EXPORT_PATH")]
    export: Option<String>,

    /// Save the chart without opening a viewer
    #[arg(long, env = "SCORES_NO_SHOW", default_value_t = false)]
    no_show: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/student_scores.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("student_scores.log"));

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

    let client = BasicClient::with_timeout(Duration::from_secs(cli.timeout_secs));
    let config = AnalyzerConfig {
        url: cli.url,
        schema: cli
            .subjects
            .as_deref()
            .map(SubjectSchema::from_list)
            .unwrap_or_default(),
        chart_path: cli.output,
        export_path: cli.export,
        show: !cli.no_show,
    };

    let source = Analyzer::new(client, config).run().await?;
    info!(source = source.label(), records = source.records().len(), "Run complete");
    Ok(())
}
