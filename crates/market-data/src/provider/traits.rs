//! Quote source trait definition.
//!
//! This module defines the `QuoteSource` trait that every market data
//! provider implements.

use crate::errors::MarketDataError;
use crate::models::{
    AssetProfile, Bar, Dividend, FinancialStatements, Interval, Period, RecommendationTrend, Split,
};

/// A single-symbol, blocking market data provider.
///
/// Every method performs network I/O and blocks the calling thread until the
/// provider answers. Callers must run these methods on a thread that is
/// allowed to block (for example inside `tokio::task::spawn_blocking`), never
/// directly on an async worker.
///
/// Implementations convert provider failures into [`MarketDataError`]:
/// - unknown symbol: [`MarketDataError::InvalidSymbol`]
/// - symbol known but nothing for the requested window: [`MarketDataError::NoData`]
/// - anything else: [`MarketDataError::ProviderError`] or [`MarketDataError::Network`]
///
/// # Example
///
/// ```ignore
/// use stockdesk_market_data::provider::QuoteSource;
///
/// struct MySource;
///
/// impl QuoteSource for MySource {
///     fn id(&self) -> &'static str {
///         "MY_SOURCE"
///     }
///
///     // ... implement fetch methods
/// }
/// ```
pub trait QuoteSource: Send + Sync {
    /// Unique identifier for this source, e.g. "YAHOO". Used for logging.
    fn id(&self) -> &'static str;

    /// Fetch company profile and key statistics.
    fn profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError>;

    /// Fetch OHLCV bars for the given window, oldest first.
    fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError>;

    /// Fetch quarterly and yearly income statements, balance sheet and cash flow.
    fn financials(&self, symbol: &str) -> Result<FinancialStatements, MarketDataError>;

    /// Fetch the full dividend history, oldest first.
    fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>, MarketDataError>;

    /// Fetch the full split history, oldest first.
    fn splits(&self, symbol: &str) -> Result<Vec<Split>, MarketDataError>;

    /// Fetch analyst recommendation trends, most recent period first.
    fn recommendations(&self, symbol: &str) -> Result<Vec<RecommendationTrend>, MarketDataError>;
}
