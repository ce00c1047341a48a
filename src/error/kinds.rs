use std::{fmt, io};

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`ExportError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Top-level error type for export operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum ExportError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Request-shape errors (bad format, unparseable query).
    Request(RequestError),

    /// Permission denied for the requested collection.
    Unauthorized(String),

    /// Another export is already in flight.
    Busy,

    /// Data-source failures discovered mid-pagination.
    Upstream(UpstreamError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors from the output sink.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// Not currently connected to MongoDB.
    NotConnected,

    /// Ping command failed.
    PingFailed(String),
}

/// Request-shape errors.
///
/// These are always client errors: they are detected before any bytes are
/// written to the output sink.
#[derive(Debug)]
pub enum RequestError {
    /// No `format` parameter was supplied.
    MissingFormat,

    /// No `query` parameter was supplied.
    MissingQuery,

    /// Unknown export format.
    InvalidFormat {
        /// The format string the client sent.
        given: String,
        /// The supported format names, for the error message.
        valid: &'static [&'static str],
    },

    /// The query envelope failed to parse as JSON.
    InvalidQuery(String),

    /// The custom icon map failed to parse as JSON.
    InvalidIconMap(String),
}

/// Upstream data-source errors.
#[derive(Debug)]
pub enum UpstreamError {
    /// A page query failed.
    QueryFailed(String),

    /// A page fetch exceeded the configured timeout.
    PageTimeout(u64),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Connection(e) => write!(f, "Connection error: {e}"),
            ExportError::Request(e) => write!(f, "{e}"),
            ExportError::Unauthorized(msg) => write!(f, "Access denied: {msg}"),
            ExportError::Busy => {
                write!(f, "Busy exporting. Please try again in a couple of minutes.")
            }
            ExportError::Upstream(e) => write!(f, "Upstream error: {e}"),
            ExportError::Config(e) => write!(f, "Configuration error: {e}"),
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::MongoDb(e) => format_mongodb_error(f, e),
            ExportError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingFormat => write!(f, "no format given"),
            RequestError::MissingQuery => write!(f, "no query given"),
            RequestError::InvalidFormat { given, valid } => {
                write!(
                    f,
                    "invalid format \"{given}\". Valid formats are: {}",
                    valid.join(", ")
                )
            }
            RequestError::InvalidQuery(msg) => write!(f, "failed to parse query: {msg}"),
            RequestError::InvalidIconMap(msg) => {
                write!(f, "failed to parse custom icon map: {msg}")
            }
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::QueryFailed(msg) => write!(f, "page query failed: {msg}"),
            UpstreamError::PageTimeout(secs) => {
                write!(f, "page fetch exceeded {secs}s timeout")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for ExportError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for RequestError {}
impl std::error::Error for UpstreamError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to ExportError ========================= */

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<mongodb::error::Error> for ExportError {
    fn from(err: mongodb::error::Error) -> Self {
        ExportError::MongoDb(err)
    }
}

impl From<ConnectionError> for ExportError {
    fn from(err: ConnectionError) -> Self {
        ExportError::Connection(err)
    }
}

impl From<RequestError> for ExportError {
    fn from(err: RequestError) -> Self {
        ExportError::Request(err)
    }
}

impl From<UpstreamError> for ExportError {
    fn from(err: UpstreamError) -> Self {
        ExportError::Upstream(err)
    }
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        ExportError::Config(err)
    }
}

impl From<String> for ExportError {
    fn from(msg: String) -> Self {
        ExportError::Generic(msg)
    }
}

impl From<&str> for ExportError {
    fn from(msg: &str) -> Self {
        ExportError::Generic(msg.to_owned())
    }
}
