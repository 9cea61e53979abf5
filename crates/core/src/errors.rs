//! Core error types for the aggregation layer.
//!
//! Provider failures are translated here into the public taxonomy. Each
//! variant has a fixed HTTP status and a stable `error_code` that the server
//! puts in its error envelope.

use std::time::Duration;

use stockdesk_market_data::MarketDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the aggregation layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid ticker symbol: {0}")]
    InvalidSymbol(String),

    #[error("No {data_type} data found for symbol: {symbol}")]
    DataNotFound { symbol: String, data_type: String },

    #[error("Request timeout. Please try again.")]
    Timeout,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Market data provider failed: {0}")]
    Provider(String),

    #[error("Brokerage request failed: {0}")]
    Broker(String),

    #[error("Failed to load reference data: {0}")]
    Reference(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn not_found(symbol: impl Into<String>, data_type: impl Into<String>) -> Self {
        Error::DataNotFound {
            symbol: symbol.into(),
            data_type: data_type.into(),
        }
    }

    /// Translate a provider failure for `symbol` while fetching `data_type`.
    pub fn from_source(err: MarketDataError, symbol: &str, data_type: &str) -> Self {
        match err {
            MarketDataError::InvalidSymbol(_) => Error::InvalidSymbol(symbol.to_string()),
            MarketDataError::NoData(_) => Error::not_found(symbol, data_type),
            MarketDataError::RateLimited { .. } => Error::RateLimited,
            other => Error::Provider(other.to_string()),
        }
    }

    /// HTTP status the server reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidSymbol(_) => 400,
            Error::DataNotFound { .. } => 404,
            Error::Timeout => 408,
            Error::RateLimited => 429,
            Error::Provider(_) | Error::Broker(_) | Error::Reference(_) | Error::Unexpected(_) => {
                500
            }
        }
    }

    /// Stable machine-readable code for the error envelope.
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidSymbol(_) => "INVALID_SYMBOL",
            Error::DataNotFound { .. } => "DATA_NOT_FOUND",
            Error::Timeout => "REQUEST_TIMEOUT",
            Error::RateLimited => "RATE_LIMIT_EXCEEDED",
            Error::Provider(_) | Error::Broker(_) | Error::Reference(_) | Error::Unexpected(_) => {
                "INTERNAL_ERROR"
            }
        }
    }
}

/// Failure of a unit of work submitted to the
/// [`BoundedExecutor`](crate::executor::BoundedExecutor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Unit of work timed out after {0:?}")]
    Timeout(Duration),

    #[error("Worker pool is closed")]
    Closed,

    #[error("Unit of work aborted: {0}")]
    Aborted(String),
}

impl From<ExecutorError> for Error {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Timeout(_) => Error::Timeout,
            other => Error::Unexpected(other.to_string()),
        }
    }
}
