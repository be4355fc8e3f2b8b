//! Crate-wide error types.
//!
//! Each concern has its own enum so callers can match on the failure they
//! care about; [`Error`] folds them together for code that just propagates.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::Format;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Configuration file loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config format '{suffix}' for {}", .path.display())]
    UnsupportedFormat { suffix: String, path: PathBuf },

    #[error("json parse error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("toml parse error in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("conf parse error in {}: {message}", .path.display())]
    Ini { path: PathBuf, message: String },

    /// A text format whose bytes are not UTF-8.
    #[error("{format:?} decode error in {}: {source}", .path.display())]
    Encoding {
        format: Format,
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Transaction lifecycle failures.
#[derive(Debug, Error)]
pub enum TxError {
    /// The driver could not begin, commit or roll back.
    #[error("connection error: {op}: {source}")]
    Connection {
        op: &'static str,
        #[source]
        source: BoxError,
    },

    /// The context already committed or rolled back its transaction.
    #[error("transaction already finished")]
    Finished,

    #[error("execution context cancelled")]
    Cancelled,

    #[error("execution context deadline exceeded")]
    DeadlineExceeded,
}

impl TxError {
    /// Wrap a driver failure for the named lifecycle operation.
    pub fn connection(op: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Connection { op, source: source.into() }
    }
}

/// Synthetic request construction failures.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed url '{url}': {message}")]
    MalformedUrl { url: String, message: String },

    #[error("invalid method '{0}'")]
    InvalidMethod(String),

    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },
}

#[derive(Debug, Error)]
#[error("logger error: {0}")]
pub struct LoggerError(pub String);

/// Aggregate of every error this crate returns.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
