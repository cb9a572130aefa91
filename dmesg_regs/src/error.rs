use std::{io, num::ParseIntError, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("input log not found: {0}")]
    InputNotFound(PathBuf),
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("report encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Wrap an I/O failure on `path`, folding `NotFound` into `InputNotFound`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            return Self::InputNotFound(path);
        }
        Self::Io { path, source }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Encode(err.to_string())
    }
}

/// A single register token whose value could not be turned into a `u64`.
///
/// Never fatal: the scanner logs it and moves on to the rest of the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("register {name}: cannot parse hex value {raw:?}: {reason}")]
pub struct ValueError {
    pub name: String,
    pub raw: String,
    pub reason: String,
}

impl ValueError {
    pub fn new(name: &str, raw: &str, source: ParseIntError) -> Self {
        Self {
            name: name.to_string(),
            raw: raw.to_string(),
            reason: source.to_string(),
        }
    }
}
