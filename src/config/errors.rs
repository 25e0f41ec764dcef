use thiserror::Error;

use crate::types::DateRangeError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required argument <{0}>")]
    MissingArgument(&'static str),
    #[error("Unknown option '{0}'")]
    UnknownOption(String),
    #[error("Option '{0}' requires a value")]
    MissingValue(String),
    #[error("Invalid log level '{0}' (expected error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
    #[error("Invalid output format '{0}' (expected text or json)")]
    InvalidFormat(String),
    #[error("Invalid timeout '{0}' (expected a positive number of seconds)")]
    InvalidTimeout(String),
    #[error(transparent)]
    DateRange(#[from] DateRangeError)
}
