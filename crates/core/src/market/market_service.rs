use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use stockdesk_market_data::{Interval, Period, QuoteSource};

use super::market_model::{IndexQuote, MarketIndices, MarketOverview, StockLookup, TrendingStocks};
use super::market_traits::MarketServiceTrait;
use crate::batch::fan_out;
use crate::constants::{MARKET_INDICES, TRENDING_SYMBOLS};
use crate::errors::{Error, Result};
use crate::executor::BoundedExecutor;
use crate::reference::ReferenceTable;
use crate::stocks::{BatchResult, StockServiceTrait};

/// Service for the trending board, index levels and reference search.
pub struct MarketService {
    stocks: Arc<dyn StockServiceTrait>,
    source: Arc<dyn QuoteSource>,
    executor: Arc<BoundedExecutor>,
    reference: Arc<ReferenceTable>,
}

impl MarketService {
    pub fn new(
        stocks: Arc<dyn StockServiceTrait>,
        source: Arc<dyn QuoteSource>,
        executor: Arc<BoundedExecutor>,
        reference: Arc<ReferenceTable>,
    ) -> Self {
        Self {
            stocks,
            source,
            executor,
            reference,
        }
    }
}

#[async_trait]
impl MarketServiceTrait for MarketService {
    async fn get_trending_stocks(&self) -> TrendingStocks {
        let symbols: Vec<String> = TRENDING_SYMBOLS.iter().map(|s| s.to_string()).collect();
        self.stocks
            .get_stock_snapshots_with_ratios(&symbols)
            .await
            .into()
    }

    async fn get_market_indices(&self) -> MarketIndices {
        let symbols: Vec<String> = MARKET_INDICES.iter().map(|(s, _)| s.to_string()).collect();
        let outcomes = fan_out(
            &self.executor,
            &self.source,
            &symbols,
            |_| None,
            |source, symbol| {
                let name = MARKET_INDICES
                    .iter()
                    .find(|(s, _)| *s == symbol)
                    .map(|(_, name)| *name)
                    .unwrap_or(symbol);
                let bars = source
                    .history(symbol, Period::FiveDays, Interval::OneDay)
                    .map_err(|e| Error::from_source(e, symbol, "index"))?;
                IndexQuote::from_bars(symbol, name, &bars)
            },
        )
        .await;

        let batch = BatchResult::collect(
            outcomes
                .into_iter()
                .map(|outcome| (outcome.symbol, outcome.result))
                .collect(),
        );
        info!(
            "Fetched {}/{} market indices",
            batch.successful_requests, batch.total_requested
        );
        batch.into()
    }

    async fn get_market_overview(&self) -> MarketOverview {
        let (trending_stocks, market_indices) =
            tokio::join!(self.get_trending_stocks(), self.get_market_indices());
        MarketOverview {
            trending_stocks,
            market_indices,
            timestamp: Utc::now(),
        }
    }

    async fn search_stock(&self, query: &str) -> Result<StockLookup> {
        let Some(entry) = self.reference.find_ticker(query) else {
            debug!("No reference entry matches '{}'", query.trim());
            return Ok(StockLookup::not_found());
        };
        let info = self.stocks.get_company_info(&entry.ticker).await?;
        Ok(StockLookup::Found(info))
    }
}
