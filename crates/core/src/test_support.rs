//! In-memory quote source shared by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use stockdesk_market_data::{
    AssetProfile, Bar, Dividend, FinancialStatements, Interval, MarketDataError, Period,
    QuoteSource, RecommendationTrend, Split,
};

#[derive(Default)]
pub(crate) struct FakeSource {
    profiles: HashMap<String, AssetProfile>,
    closes: HashMap<String, Vec<f64>>,
    dividends: HashMap<String, Vec<Dividend>>,
    delay: Option<Duration>,
    slow: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a symbol with a name, market cap and daily closes (oldest first).
    pub(crate) fn with_stock(
        mut self,
        symbol: &str,
        name: &str,
        market_cap: Option<f64>,
        closes: &[f64],
    ) -> Self {
        let mut profile = AssetProfile::with_name(name).sector("Technology");
        profile.market_cap = market_cap;
        profile.pe_ratio = Some(25.0);
        profile.beta = Some(1.1);
        self.profiles.insert(symbol.to_string(), profile);
        self.closes.insert(symbol.to_string(), closes.to_vec());
        self
    }

    pub(crate) fn with_dividends(mut self, symbol: &str, amounts: &[f64]) -> Self {
        let events = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| Dividend {
                date: Utc.with_ymd_and_hms(2024, 1 + i as u32, 15, 0, 0, 0).unwrap(),
                amount: *amount,
            })
            .collect();
        self.dividends.insert(symbol.to_string(), events);
        self
    }

    /// Make every call sleep before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make calls for one symbol sleep before answering.
    pub(crate) fn with_slow_symbol(mut self, symbol: &str, delay: Duration) -> Self {
        self.slow.insert(symbol.to_string(), delay);
        self
    }

    /// Number of provider calls made so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, symbol: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.slow.get(symbol).copied().or(self.delay) {
            std::thread::sleep(delay);
        }
    }

    fn known(&self, symbol: &str) -> Result<(), MarketDataError> {
        if self.profiles.contains_key(symbol) {
            Ok(())
        } else {
            Err(MarketDataError::InvalidSymbol(symbol.to_string()))
        }
    }
}

impl QuoteSource for FakeSource {
    fn id(&self) -> &'static str {
        "FAKE"
    }

    fn profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        self.record(symbol);
        self.known(symbol)?;
        Ok(self.profiles[symbol].clone())
    }

    fn history(
        &self,
        symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError> {
        self.record(symbol);
        self.known(symbol)?;
        let bars: Vec<Bar> = self.closes[symbol]
            .iter()
            .enumerate()
            .map(|(i, close)| {
                Bar::flat(
                    Utc.with_ymd_and_hms(2024, 3, 1 + i as u32, 0, 0, 0).unwrap(),
                    *close,
                    1_000,
                )
            })
            .collect();
        if bars.is_empty() {
            return Err(MarketDataError::NoData(symbol.to_string()));
        }
        Ok(bars)
    }

    fn financials(&self, symbol: &str) -> Result<FinancialStatements, MarketDataError> {
        self.record(symbol);
        self.known(symbol)?;
        Ok(FinancialStatements::default())
    }

    fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>, MarketDataError> {
        self.record(symbol);
        self.known(symbol)?;
        Ok(self.dividends.get(symbol).cloned().unwrap_or_default())
    }

    fn splits(&self, symbol: &str) -> Result<Vec<Split>, MarketDataError> {
        self.record(symbol);
        self.known(symbol)?;
        Ok(Vec::new())
    }

    fn recommendations(&self, symbol: &str) -> Result<Vec<RecommendationTrend>, MarketDataError> {
        self.record(symbol);
        self.known(symbol)?;
        Ok(vec![RecommendationTrend {
            period: "0m".to_string(),
            strong_buy: 10,
            buy: 20,
            hold: 5,
            sell: 1,
            strong_sell: 0,
        }])
    }
}
