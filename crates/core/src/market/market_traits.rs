use async_trait::async_trait;

use super::market_model::{MarketIndices, MarketOverview, StockLookup, TrendingStocks};
use crate::errors::Result;

/// Trait for market-wide listings
#[async_trait]
pub trait MarketServiceTrait: Send + Sync {
    async fn get_trending_stocks(&self) -> TrendingStocks;

    async fn get_market_indices(&self) -> MarketIndices;

    /// Trending stocks and indices, fetched concurrently.
    async fn get_market_overview(&self) -> MarketOverview;

    /// Resolve a company name or ticker through the reference table, then
    /// load its company info.
    async fn search_stock(&self, query: &str) -> Result<StockLookup>;
}
