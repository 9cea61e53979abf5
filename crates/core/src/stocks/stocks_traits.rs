use async_trait::async_trait;
use stockdesk_market_data::{Interval, Period};

use super::stocks_model::{
    BatchResult, CompanyInfo, DividendHistory, Financials, HistoricalData, Recommendations,
    SearchResults, SplitHistory, StockPrice, StockSnapshot,
};
use crate::errors::Result;

/// Trait for per-symbol stock data operations
#[async_trait]
pub trait StockServiceTrait: Send + Sync {
    async fn get_stock_price(&self, symbol: &str) -> Result<StockPrice>;

    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo>;

    /// Company info for several symbols. Individual failures are tallied,
    /// never propagated.
    async fn get_multiple_company_info(&self, symbols: &[String]) -> BatchResult<CompanyInfo>;

    async fn get_historical_data(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<HistoricalData>;

    async fn get_financials(&self, symbol: &str) -> Result<Financials>;

    async fn get_dividends(&self, symbol: &str) -> Result<DividendHistory>;

    async fn get_splits(&self, symbol: &str) -> Result<SplitHistory>;

    async fn get_recommendations(&self, symbol: &str) -> Result<Recommendations>;

    /// Snapshots for several symbols, ranked by market cap.
    async fn get_multiple_stocks(&self, symbols: &[String]) -> BatchResult<StockSnapshot>;

    /// Like [`get_multiple_stocks`](Self::get_multiple_stocks) but with
    /// valuation ratios attached to each snapshot.
    async fn get_stock_snapshots_with_ratios(&self, symbols: &[String])
        -> BatchResult<StockSnapshot>;

    fn search_stocks(&self, query: &str) -> SearchResults;
}
