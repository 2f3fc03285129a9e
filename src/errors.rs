use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller handed the core data that violates its preconditions.
    /// Malformed on-chain bytes never produce this - they degrade to
    /// `Unrecognized` records instead.
    #[error("Caller contract violation: {0}")]
    ContractViolation(String),

    /// External feed operations (indexer, price API, delivery channel)
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Error types for the external collaborators (indexer, price, delivery)
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP transport failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the remote service
    #[error("{service} returned status {status}")]
    Status { service: String, status: u16 },

    /// Response body did not have the expected shape
    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },

    /// Retry limit exceeded for a feed operation
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for AppError {
    fn from(err: hex::FromHexError) -> Self {
        AppError::InvalidData(format!("Hex error: {}", err))
    }
}
