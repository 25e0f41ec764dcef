mod config;
mod engine;
mod models;
mod source;
mod types;

use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Config, OutputFormat, USAGE};
use crate::engine::ReconciliationEngine;
use crate::models::ReconciliationReport;
use crate::source::CsvRecordSource;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}\n");
            eprintln!("{USAGE}");
            exit(1);
        }
    };

    setup_logging(config.log_level);

    let mut engine = ReconciliationEngine::new(Arc::new(CsvRecordSource::new()));

    if let Some(limit) = config.load_timeout {
        engine = engine.with_load_timeout(limit);
    }

    let timer = Instant::now();
    let report = engine.run(&config.system_path, &config.bank_paths, config.range).await?;
    let duration = timer.elapsed();

    info!("Reconciled in: {duration:?}");

    write_report_to_stdout(&report, config.format)?;

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the report, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_report_to_stdout(report: &ReconciliationReport, format: OutputFormat) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    match format {
        OutputFormat::Text => report.write_summary(&mut output)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut output, report)?;
            writeln!(output)?;
        }
    }

    output.flush()?;

    Ok(())
}
