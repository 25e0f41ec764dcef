mod errors;

use std::path::PathBuf;
use std::time::Duration;

use tracing::level_filters::LevelFilter;

use crate::types::DateRange;

pub use errors::ConfigError;

pub const USAGE: &str = "\
Usage: reconciliation-engine <system>.csv <start> <end> <bank>.csv [<bank>.csv ...] [options]

Dates are inclusive and formatted as YYYY-MM-DD.

Options:
  --log-level <level>   error, warn, info, debug, trace (default: warn)
  --format <format>     text, json (default: text)
  --timeout <seconds>   abort if loading takes longer than this";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Json
}

/// Settings for a single reconciliation run, read from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub system_path: PathBuf,
    pub bank_paths: Vec<PathBuf>,
    pub range: DateRange,
    pub log_level: LevelFilter,
    pub format: OutputFormat,
    pub load_timeout: Option<Duration>
}

impl Config {
    /// Parses arguments, excluding the program name.
    ///
    /// Options may appear anywhere; everything else is positional.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        //NOTE: If the surface grows past a handful of flags the clap crate would be a better fit here.
        let mut args = args.into_iter();
        let mut positional = Vec::new();
        let mut log_level = LevelFilter::WARN;
        let mut format = OutputFormat::Text;
        let mut load_timeout = None;

        while let Some(arg) = args.next() {
            if !arg.starts_with("--") {
                positional.push(arg);
                continue;
            }

            let value = args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;

            match arg.as_str() {
                "--log-level" => log_level = parse_log_level(&value)?,
                "--format" => format = parse_format(&value)?,
                "--timeout" => load_timeout = Some(parse_timeout(&value)?),
                _ => return Err(ConfigError::UnknownOption(arg))
            }
        }

        let mut positional = positional.into_iter();
        let system_path = positional.next().ok_or(ConfigError::MissingArgument("system.csv"))?;
        let start = positional.next().ok_or(ConfigError::MissingArgument("start"))?;
        let end = positional.next().ok_or(ConfigError::MissingArgument("end"))?;
        let range = DateRange::parse(&start, &end)?;
        let bank_paths: Vec<PathBuf> = positional.map(PathBuf::from).collect();

        if bank_paths.is_empty() {
            return Err(ConfigError::MissingArgument("bank.csv"));
        }

        Ok(Self {
            system_path: PathBuf::from(system_path),
            bank_paths,
            range,
            log_level,
            format,
            load_timeout
        })
    }
}

fn parse_log_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string()))
    }
}

fn parse_format(format: &str) -> Result<OutputFormat, ConfigError> {
    match format.to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => Err(ConfigError::InvalidFormat(format.to_string()))
    }
}

fn parse_timeout(seconds: &str) -> Result<Duration, ConfigError> {
    seconds.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .and_then(|value| Duration::try_from_secs_f64(value).ok())
        .ok_or_else(|| ConfigError::InvalidTimeout(seconds.to_string()))
}
