use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use stockdesk_market_data::{Interval, Period, QuoteSource};

use super::search::search_universe;
use super::stocks_model::{
    BatchResult, Cacheable, CachedPayload, CompanyInfo, DataKind, DividendHistory, Financials,
    HistoricalData, HistoryPoint, Recommendations, SearchResults, SplitHistory, StockPrice,
    StockSnapshot,
};
use super::stocks_traits::StockServiceTrait;
use crate::batch::fan_out;
use crate::cache::{cache_key, ExpiringCache};
use crate::constants::SEARCH_UNIVERSE;
use crate::errors::{Error, Result};
use crate::executor::BoundedExecutor;
use crate::symbols::Symbol;

/// Window used to derive the latest close and the one before it.
const PRICE_PERIOD: Period = Period::FiveDays;
const PRICE_INTERVAL: Interval = Interval::OneDay;

/// Stock data service backed by a blocking quote source.
///
/// Every provider call runs on the shared [`BoundedExecutor`]; per-symbol
/// results are kept in the shared cache under `SYMBOL:kind[:params]` keys.
pub struct StockService {
    source: Arc<dyn QuoteSource>,
    cache: Arc<ExpiringCache<CachedPayload>>,
    executor: Arc<BoundedExecutor>,
}

impl StockService {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        cache: Arc<ExpiringCache<CachedPayload>>,
        executor: Arc<BoundedExecutor>,
    ) -> Self {
        Self {
            source,
            cache,
            executor,
        }
    }

    /// Validate, look up the cache, otherwise fetch through the executor and
    /// remember the result. Failures are never cached.
    async fn cached<T, F>(&self, raw_symbol: &str, params: &[(&str, &str)], fetch: F) -> Result<T>
    where
        T: Cacheable,
        F: FnOnce(&dyn QuoteSource, &str) -> Result<T> + Send + 'static,
    {
        let symbol = Symbol::parse(raw_symbol)?;
        let key = cache_key(symbol.as_str(), T::KIND.as_str(), params);

        if let Some(hit) = self.cache.get(&key).and_then(T::from_payload) {
            return Ok(hit);
        }

        let source = self.source.clone();
        let name = symbol.to_string();
        let value = self
            .executor
            .run(move || fetch(source.as_ref(), &name))
            .await??;

        self.cache.put(key, value.clone().into_payload());
        Ok(value)
    }

    async fn snapshots(&self, symbols: &[String], with_ratios: bool) -> BatchResult<StockSnapshot> {
        let outcomes = fan_out(
            &self.executor,
            &self.source,
            symbols,
            |_| None,
            move |source, symbol| {
                let profile = source
                    .profile(symbol)
                    .map_err(|e| Error::from_source(e, symbol, DataKind::Price.label()))?;
                let bars = source
                    .history(symbol, PRICE_PERIOD, PRICE_INTERVAL)
                    .map_err(|e| Error::from_source(e, symbol, DataKind::Price.label()))?;
                let snapshot = StockSnapshot::from_parts(symbol, &profile, &bars)?;
                Ok(if with_ratios {
                    snapshot.with_ratios(&profile)
                } else {
                    snapshot
                })
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
            "Fetched {}/{} stock snapshots",
            batch.successful_requests, batch.total_requested
        );
        batch.ranked_by_market_cap()
    }
}

#[async_trait]
impl StockServiceTrait for StockService {
    async fn get_stock_price(&self, symbol: &str) -> Result<StockPrice> {
        self.cached(symbol, &[], |source, symbol| {
            let profile = source
                .profile(symbol)
                .map_err(|e| Error::from_source(e, symbol, DataKind::Price.label()))?;
            let bars = source
                .history(symbol, PRICE_PERIOD, PRICE_INTERVAL)
                .map_err(|e| Error::from_source(e, symbol, DataKind::Price.label()))?;
            StockPrice::from_parts(symbol, &profile, &bars)
        })
        .await
    }

    async fn get_company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        self.cached(symbol, &[], fetch_company_info).await
    }

    async fn get_multiple_company_info(&self, symbols: &[String]) -> BatchResult<CompanyInfo> {
        let kind = CompanyInfo::KIND.as_str();
        let outcomes = fan_out(
            &self.executor,
            &self.source,
            symbols,
            |symbol| {
                self.cache
                    .get(&cache_key(symbol.as_str(), kind, &[]))
                    .and_then(CompanyInfo::from_payload)
            },
            fetch_company_info,
        )
        .await;

        for outcome in &outcomes {
            if let (true, Ok(info)) = (outcome.fetched, &outcome.result) {
                self.cache.put(
                    cache_key(&outcome.symbol, kind, &[]),
                    info.clone().into_payload(),
                );
            }
        }

        let batch = BatchResult::collect(
            outcomes
                .into_iter()
                .map(|outcome| (outcome.symbol, outcome.result))
                .collect(),
        );
        info!(
            "Fetched company info for {}/{} symbols",
            batch.successful_requests, batch.total_requested
        );
        batch
    }

    async fn get_historical_data(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<HistoricalData> {
        let params = [("interval", interval.as_str()), ("period", period.as_str())];
        self.cached(symbol, &params, move |source, symbol| {
            let bars = source
                .history(symbol, period, interval)
                .map_err(|e| Error::from_source(e, symbol, DataKind::History.label()))?;
            if bars.is_empty() {
                return Err(Error::not_found(symbol, DataKind::History.label()));
            }
            Ok(HistoricalData {
                symbol: symbol.to_string(),
                period,
                interval,
                data: bars.iter().map(HistoryPoint::from).collect(),
            })
        })
        .await
    }

    async fn get_financials(&self, symbol: &str) -> Result<Financials> {
        self.cached(symbol, &[], |source, symbol| {
            let statements = source
                .financials(symbol)
                .map_err(|e| Error::from_source(e, symbol, DataKind::Financials.label()))?;
            if statements.is_empty() {
                return Err(Error::not_found(symbol, DataKind::Financials.label()));
            }
            Ok(Financials::from_statements(symbol, statements))
        })
        .await
    }

    async fn get_dividends(&self, symbol: &str) -> Result<DividendHistory> {
        self.cached(symbol, &[], |source, symbol| {
            let events = source
                .dividends(symbol)
                .map_err(|e| Error::from_source(e, symbol, DataKind::Dividends.label()))?;
            if events.is_empty() {
                return Err(Error::not_found(symbol, DataKind::Dividends.label()));
            }
            Ok(DividendHistory::from_events(symbol, &events))
        })
        .await
    }

    async fn get_splits(&self, symbol: &str) -> Result<SplitHistory> {
        self.cached(symbol, &[], |source, symbol| {
            let events = source
                .splits(symbol)
                .map_err(|e| Error::from_source(e, symbol, DataKind::Splits.label()))?;
            if events.is_empty() {
                return Err(Error::not_found(symbol, DataKind::Splits.label()));
            }
            Ok(SplitHistory::from_events(symbol, &events))
        })
        .await
    }

    async fn get_recommendations(&self, symbol: &str) -> Result<Recommendations> {
        self.cached(symbol, &[], |source, symbol| {
            let recommendations = source
                .recommendations(symbol)
                .map_err(|e| Error::from_source(e, symbol, DataKind::Recommendations.label()))?;
            if recommendations.is_empty() {
                return Err(Error::not_found(symbol, DataKind::Recommendations.label()));
            }
            Ok(Recommendations {
                symbol: symbol.to_string(),
                recommendations,
            })
        })
        .await
    }

    async fn get_multiple_stocks(&self, symbols: &[String]) -> BatchResult<StockSnapshot> {
        self.snapshots(symbols, false).await
    }

    async fn get_stock_snapshots_with_ratios(
        &self,
        symbols: &[String],
    ) -> BatchResult<StockSnapshot> {
        self.snapshots(symbols, true).await
    }

    fn search_stocks(&self, query: &str) -> SearchResults {
        search_universe(query, SEARCH_UNIVERSE)
    }
}

fn fetch_company_info(source: &dyn QuoteSource, symbol: &str) -> Result<CompanyInfo> {
    let profile = source
        .profile(symbol)
        .map_err(|e| Error::from_source(e, symbol, DataKind::CompanyInfo.label()))?;
    CompanyInfo::from_profile(symbol, profile)
}
