//! Error types for the market data crate.
//!
//! Every quote source reports failures through [`MarketDataError`]. The
//! aggregation layer decides what a failure means for the request (abort a
//! single-symbol call, or count a miss inside a batch); nothing here retries.

use thiserror::Error;

/// Errors that can occur while talking to a quote source.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the requested symbol.
    #[error("Invalid ticker symbol: {0}")]
    InvalidSymbol(String),

    /// The symbol exists but the provider returned no rows for the
    /// requested window or data kind.
    #[error("No data returned for symbol: {0}")]
    NoData(String),

    /// The provider rejected the request with HTTP 429.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// Transport or payload failure reported by the provider.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Shorthand for a [`MarketDataError::ProviderError`].
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` when the failure says something about the symbol itself
    /// rather than about the provider being unavailable.
    pub fn is_symbol_error(&self) -> bool {
        matches!(self, Self::InvalidSymbol(_) | Self::NoData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MarketDataError::InvalidSymbol("XYZ".to_string());
        assert_eq!(error.to_string(), "Invalid ticker symbol: XYZ");

        let error = MarketDataError::NoData("AAPL".to_string());
        assert_eq!(error.to_string(), "No data returned for symbol: AAPL");

        let error = MarketDataError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.to_string(), "Rate limited: YAHOO");

        let error = MarketDataError::provider("YAHOO", "API error");
        assert_eq!(error.to_string(), "Provider error: YAHOO - API error");
    }

    #[test]
    fn test_symbol_errors() {
        assert!(MarketDataError::InvalidSymbol("X".into()).is_symbol_error());
        assert!(MarketDataError::NoData("X".into()).is_symbol_error());
        assert!(!MarketDataError::provider("YAHOO", "boom").is_symbol_error());
        assert!(!MarketDataError::RateLimited {
            provider: "YAHOO".into()
        }
        .is_symbol_error());
    }
}
