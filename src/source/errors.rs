use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not open source [{}]: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: io::Error
    },
    #[error("Source [{}] has no header row", .path.display())]
    MissingHeader {
        path: PathBuf
    },
    #[error("Failed to read source [{}]: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: csv::Error
    }
}

impl SourceError {
    pub fn open(path: &Path, source: io::Error) -> Self {
        Self::Open { path: path.to_path_buf(), source }
    }

    pub fn missing_header(path: &Path) -> Self {
        Self::MissingHeader { path: path.to_path_buf() }
    }

    pub fn read(path: &Path, source: csv::Error) -> Self {
        Self::Read { path: path.to_path_buf(), source }
    }
}

/// A single row that could not be turned into a record. Logged and skipped.
#[derive(Debug, Error)]
#[error("Skipping malformed record in [{}] at line {line}: {reason}", .path.display())]
pub struct MalformedRecord {
    pub path: PathBuf,
    pub line: u64,
    pub reason: String
}
