use std::fmt;

/// Custom error types for trip cleaning and image fetching
#[derive(Debug)]
pub enum TripError {
    /// I/O errors
    Io(std::io::Error),
    /// CSV reader/writer errors
    Csv(csv::Error),
    /// Parse errors with context
    Parse(String),
    /// Timestamp not in a recognised format
    InvalidTimestamp(String),
    /// Required CSV column absent from the header
    MissingColumn(String),
    /// Invalid paths or option combinations
    Config(String),
    /// Transport-level failure talking to the image service
    Http(String),
    /// Export format error
    Export(String),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::Io(err) => write!(f, "I/O error: {}", err),
            TripError::Csv(err) => write!(f, "CSV error: {}", err),
            TripError::Parse(msg) => write!(f, "Parse error: {}", msg),
            TripError::InvalidTimestamp(ts) => write!(f, "Invalid timestamp: '{}'", ts),
            TripError::MissingColumn(name) => write!(f, "Missing required column: {}", name),
            TripError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TripError::Http(msg) => write!(f, "HTTP error: {}", msg),
            TripError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TripError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TripError::Io(err) => Some(err),
            TripError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TripError {
    fn from(err: std::io::Error) -> Self {
        TripError::Io(err)
    }
}

impl From<csv::Error> for TripError {
    fn from(err: csv::Error) -> Self {
        TripError::Csv(err)
    }
}

impl From<anyhow::Error> for TripError {
    fn from(err: anyhow::Error) -> Self {
        TripError::Parse(err.to_string())
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for TripError {
    fn from(err: reqwest::Error) -> Self {
        TripError::Http(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for TripError {
    fn from(err: serde_json::Error) -> Self {
        TripError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TripError>;
