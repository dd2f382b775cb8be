//! Harness error type.

use std::path::PathBuf;

use strfmt_core::FormatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read or write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid argument '{0}': expected <int|uint|float|char|str|ptr>:<value>")]
    InvalidArg(String),
    #[error("invalid allocation cap '{0}'")]
    InvalidCap(String),
    #[error("no fixture JSON files found in '{}'", .0.display())]
    NoFixtures(PathBuf),
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
