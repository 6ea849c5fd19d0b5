//! Library error type.
use thiserror::Error;

use crate::gofmt::FormatError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The assembled declaration is not valid Go. Either the type/package
    /// name is not an identifier or synthesis produced a malformed type.
    #[error("generated source does not format: {0}")]
    Format(#[from] FormatError),

    #[error("invalid config at {path}: {message}")]
    Config { path: String, message: String },

    #[error("JSON pointer {pointer:?} selects nothing")]
    Pointer { pointer: String },

    #[error("jq: {message}")]
    Jq { message: String },

    #[error("{message}")]
    Glob { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
