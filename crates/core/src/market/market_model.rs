use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockdesk_market_data::Bar;

use crate::errors::{Error, Result};
use crate::stocks::{BatchResult, CompanyInfo, StockSnapshot};
use crate::utils::{price_change, round2};

/// Latest level of a market index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
}

impl IndexQuote {
    /// Build from recent daily bars, oldest first.
    pub fn from_bars(symbol: &str, name: &str, bars: &[Bar]) -> Result<Self> {
        let last = bars
            .last()
            .ok_or_else(|| Error::not_found(symbol, "index"))?;
        let previous = if bars.len() > 1 {
            bars[bars.len() - 2].close
        } else {
            last.close
        };
        let (change, change_percent) = price_change(last.close, previous);

        Ok(Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price: round2(last.close),
            change,
            change_percent,
            volume: last.volume,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingStocks {
    pub trending_stocks: Vec<StockSnapshot>,
    pub total_requested: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<BatchResult<StockSnapshot>> for TrendingStocks {
    fn from(batch: BatchResult<StockSnapshot>) -> Self {
        Self {
            trending_stocks: batch.results,
            total_requested: batch.total_requested,
            successful_requests: batch.successful_requests,
            failed_requests: batch.failed_requests,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndices {
    pub market_indices: Vec<IndexQuote>,
    pub total_requested: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<BatchResult<IndexQuote>> for MarketIndices {
    fn from(batch: BatchResult<IndexQuote>) -> Self {
        Self {
            market_indices: batch.results,
            total_requested: batch.total_requested,
            successful_requests: batch.successful_requests,
            failed_requests: batch.failed_requests,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub trending_stocks: TrendingStocks,
    pub market_indices: MarketIndices,
    pub timestamp: DateTime<Utc>,
}

/// Result of a reference-table lookup. A miss is a value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockLookup {
    Found(CompanyInfo),
    NotFound { error: String },
}

impl StockLookup {
    pub fn not_found() -> Self {
        StockLookup::NotFound {
            error: "Stock not found.".to_string(),
        }
    }
}
