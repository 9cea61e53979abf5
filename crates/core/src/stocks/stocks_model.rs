//! Domain models for stock data aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockdesk_market_data::{
    AssetProfile, Bar, Dividend, FinancialStatements, Interval, Period, RecommendationTrend, Split,
    Statement,
};

use crate::errors::{Error, Result};
use crate::utils::{price_change, round2};

/// Operation kinds that own a slot in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Price,
    CompanyInfo,
    History,
    Financials,
    Dividends,
    Splits,
    Recommendations,
}

impl DataKind {
    /// Segment used in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Price => "price",
            DataKind::CompanyInfo => "company_info",
            DataKind::History => "history",
            DataKind::Financials => "financials",
            DataKind::Dividends => "dividends",
            DataKind::Splits => "splits",
            DataKind::Recommendations => "recommendations",
        }
    }

    /// Wording used in "No {label} data found" messages.
    pub fn label(&self) -> &'static str {
        match self {
            DataKind::Price => "price",
            DataKind::CompanyInfo => "company info",
            DataKind::History => "historical",
            DataKind::Financials => "financial",
            DataKind::Dividends => "dividend",
            DataKind::Splits => "splits",
            DataKind::Recommendations => "recommendations",
        }
    }
}

/// Latest price with day and 52-week ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl StockPrice {
    /// Build from a profile and a recent daily history (oldest bar first).
    ///
    /// The previous close is the next-to-last bar's close, or the last close
    /// when only one bar is available.
    pub fn from_parts(symbol: &str, profile: &AssetProfile, bars: &[Bar]) -> Result<Self> {
        let last = bars
            .last()
            .ok_or_else(|| Error::not_found(symbol, DataKind::Price.label()))?;
        let current = last.close;
        let previous = if bars.len() > 1 {
            bars[bars.len() - 2].close
        } else {
            current
        };
        let (change, change_percent) = price_change(current, previous);

        Ok(Self {
            symbol: symbol.to_string(),
            current_price: round2(current),
            previous_close: round2(previous),
            change,
            change_percent,
            volume: Some(last.volume),
            market_cap: profile.market_cap,
            day_high: profile.day_high,
            day_low: profile.day_low,
            fifty_two_week_high: profile.week_52_high,
            fifty_two_week_low: profile.week_52_low,
        })
    }
}

/// Company profile and key ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub business_summary: Option<String>,
    pub market_cap: Option<f64>,
    pub employees: Option<u64>,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub revenue: Option<f64>,
    pub profit_margin: Option<f64>,
    pub book_value: Option<f64>,
    pub price_to_book: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

impl CompanyInfo {
    /// A profile without any name is treated as missing data.
    pub fn from_profile(symbol: &str, profile: AssetProfile) -> Result<Self> {
        let name = profile
            .display_name()
            .map(str::to_string)
            .ok_or_else(|| Error::not_found(symbol, DataKind::CompanyInfo.label()))?;

        Ok(Self {
            symbol: symbol.to_string(),
            name,
            sector: profile.sector,
            industry: profile.industry,
            country: profile.country,
            website: profile.website,
            business_summary: profile.description,
            market_cap: profile.market_cap,
            employees: profile.employees,
            dividend_yield: profile.dividend_yield,
            pe_ratio: profile.pe_ratio,
            beta: profile.beta,
            revenue: profile.revenue,
            profit_margin: profile.profit_margin,
            book_value: profile.book_value,
            price_to_book: profile.price_to_book,
            quick_ratio: profile.quick_ratio,
            debt_to_equity: profile.debt_to_equity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&Bar> for HistoryPoint {
    fn from(bar: &Bar) -> Self {
        Self {
            date: bar.timestamp,
            open: round2(bar.open),
            high: round2(bar.high),
            low: round2(bar.low),
            close: round2(bar.close),
            volume: bar.volume,
        }
    }
}

/// Price history for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
    pub data: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    pub symbol: String,
    pub quarterly_financials: Statement,
    pub yearly_financials: Statement,
    pub balance_sheet: Statement,
    pub cash_flow: Statement,
}

impl Financials {
    pub fn from_statements(symbol: &str, statements: FinancialStatements) -> Self {
        Self {
            symbol: symbol.to_string(),
            quarterly_financials: statements.quarterly_income,
            yearly_financials: statements.yearly_income,
            balance_sheet: statements.balance_sheet,
            cash_flow: statements.cash_flow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEntry {
    pub date: DateTime<Utc>,
    pub dividend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    pub symbol: String,
    pub dividends: Vec<DividendEntry>,
}

impl DividendHistory {
    pub fn from_events(symbol: &str, events: &[Dividend]) -> Self {
        Self {
            symbol: symbol.to_string(),
            dividends: events
                .iter()
                .map(|d| DividendEntry {
                    date: d.date,
                    dividend: d.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub date: DateTime<Utc>,
    pub split_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitHistory {
    pub symbol: String,
    pub splits: Vec<SplitEntry>,
}

impl SplitHistory {
    pub fn from_events(symbol: &str, events: &[Split]) -> Self {
        Self {
            symbol: symbol.to_string(),
            splits: events
                .iter()
                .map(|s| SplitEntry {
                    date: s.date,
                    split_ratio: s.ratio(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub symbol: String,
    pub recommendations: Vec<RecommendationTrend>,
}

/// Compact quote used by batch and trending listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl StockSnapshot {
    pub fn from_parts(symbol: &str, profile: &AssetProfile, bars: &[Bar]) -> Result<Self> {
        let price = StockPrice::from_parts(symbol, profile, bars)?;
        Ok(Self {
            symbol: symbol.to_string(),
            name: profile.display_name().unwrap_or(symbol).to_string(),
            current_price: price.current_price,
            change: price.change,
            change_percent: price.change_percent,
            volume: price.volume,
            market_cap: profile.market_cap,
            sector: profile.sector.clone(),
            pe_ratio: None,
            beta: None,
        })
    }

    /// Attach valuation ratios, as shown on the trending board.
    pub fn with_ratios(mut self, profile: &AssetProfile) -> Self {
        self.pe_ratio = profile.pe_ratio;
        self.beta = profile.beta;
        self
    }
}

/// Entries that can be ranked by market capitalization.
pub trait MarketCapRanked {
    fn market_cap(&self) -> Option<f64>;
}

impl MarketCapRanked for StockSnapshot {
    fn market_cap(&self) -> Option<f64> {
        self.market_cap
    }
}

impl MarketCapRanked for CompanyInfo {
    fn market_cap(&self) -> Option<f64> {
        self.market_cap
    }
}

/// A batch item that did not make it into the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub symbol: String,
    pub error: String,
}

/// Outcome of a fan-out over several symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult<T> {
    pub results: Vec<T>,
    pub total_requested: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub failures: Vec<BatchFailure>,
}

impl<T> BatchResult<T> {
    /// Tally per-item outcomes, keeping successes in arrival order.
    pub fn collect(outcomes: Vec<(String, Result<T>)>) -> Self {
        let total_requested = outcomes.len();
        let mut results = Vec::with_capacity(total_requested);
        let mut failures = Vec::new();

        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(value) => results.push(value),
                Err(e) => failures.push(BatchFailure {
                    symbol,
                    error: e.to_string(),
                }),
            }
        }

        Self {
            total_requested,
            successful_requests: results.len(),
            failed_requests: failures.len(),
            results,
            failures,
        }
    }
}

impl<T: MarketCapRanked> BatchResult<T> {
    /// Sort results by market cap, largest first. Missing caps count as zero
    /// and equal caps keep their arrival order.
    pub fn ranked_by_market_cap(mut self) -> Self {
        self.results.sort_by(|a, b| {
            let a = a.market_cap().unwrap_or(0.0);
            let b = b.market_cap().unwrap_or(0.0);
            b.total_cmp(&a)
        });
        self
    }
}

/// Free-text search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub search_results: Vec<SearchHit>,
    pub total_results: usize,
    pub query: String,
}

/// Values held by the shared cache, one variant per cached operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    Price(StockPrice),
    CompanyInfo(CompanyInfo),
    History(HistoricalData),
    Financials(Financials),
    Dividends(DividendHistory),
    Splits(SplitHistory),
    Recommendations(Recommendations),
}

/// Typed access to a [`CachedPayload`] variant.
pub trait Cacheable: Clone + Send + 'static {
    const KIND: DataKind;

    fn into_payload(self) -> CachedPayload;

    fn from_payload(payload: CachedPayload) -> Option<Self>;
}

macro_rules! impl_cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            const KIND: DataKind = DataKind::$variant;

            fn into_payload(self) -> CachedPayload {
                CachedPayload::$variant(self)
            }

            fn from_payload(payload: CachedPayload) -> Option<Self> {
                match payload {
                    CachedPayload::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

impl_cacheable!(StockPrice, Price);
impl_cacheable!(CompanyInfo, CompanyInfo);
impl_cacheable!(HistoricalData, History);
impl_cacheable!(Financials, Financials);
impl_cacheable!(DividendHistory, Dividends);
impl_cacheable!(SplitHistory, Splits);
impl_cacheable!(Recommendations, Recommendations);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> Bar {
        Bar::flat(Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(), close, 1_000)
    }

    fn snapshot(symbol: &str, market_cap: Option<f64>) -> StockSnapshot {
        StockSnapshot {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            current_price: 1.0,
            change: 0.0,
            change_percent: 0.0,
            volume: None,
            market_cap,
            sector: None,
            pe_ratio: None,
            beta: None,
        }
    }

    #[test]
    fn test_price_uses_last_two_closes() {
        let profile = AssetProfile::with_name("Apple Inc.").market_cap(3.0e12);
        let bars = vec![bar(1, 170.0), bar(4, 180.0), bar(5, 189.0)];

        let price = StockPrice::from_parts("AAPL", &profile, &bars).unwrap();
        assert_eq!(price.current_price, 189.0);
        assert_eq!(price.previous_close, 180.0);
        assert_eq!(price.change, 9.0);
        assert_eq!(price.change_percent, 5.0);
        assert_eq!(price.market_cap, Some(3.0e12));
        assert_eq!(price.volume, Some(1_000));
    }

    #[test]
    fn test_price_volume_comes_from_latest_bar() {
        let mut profile = AssetProfile::with_name("Apple Inc.");
        profile.volume = Some(999);
        let bars = vec![bar(4, 180.0), bar(5, 189.0)];

        let price = StockPrice::from_parts("AAPL", &profile, &bars).unwrap();
        assert_eq!(price.volume, Some(1_000));
    }

    #[test]
    fn test_price_single_bar_has_no_change() {
        let price =
            StockPrice::from_parts("AAPL", &AssetProfile::default(), &[bar(5, 189.123)]).unwrap();
        assert_eq!(price.current_price, 189.12);
        assert_eq!(price.previous_close, 189.12);
        assert_eq!(price.change, 0.0);
    }

    #[test]
    fn test_price_without_bars_is_not_found() {
        let err = StockPrice::from_parts("AAPL", &AssetProfile::default(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "No price data found for symbol: AAPL");
    }

    #[test]
    fn test_company_info_requires_a_name() {
        let err = CompanyInfo::from_profile("AAPL", AssetProfile::default()).unwrap_err();
        assert!(matches!(err, Error::DataNotFound { .. }));

        let profile = AssetProfile {
            short_name: Some("Apple".into()),
            description: Some("Makes phones".into()),
            ..Default::default()
        };
        let info = CompanyInfo::from_profile("AAPL", profile).unwrap();
        assert_eq!(info.name, "Apple");
        assert_eq!(info.business_summary.as_deref(), Some("Makes phones"));
    }

    #[test]
    fn test_batch_collect_counts() {
        let batch = BatchResult::collect(vec![
            ("A".to_string(), Ok(1)),
            ("B".to_string(), Err(Error::Timeout)),
            ("C".to_string(), Ok(3)),
        ]);
        assert_eq!(batch.results, vec![1, 3]);
        assert_eq!(batch.total_requested, 3);
        assert_eq!(batch.successful_requests, 2);
        assert_eq!(batch.failed_requests, 1);
        assert_eq!(batch.failures[0].symbol, "B");
    }

    #[test]
    fn test_ranking_is_stable_and_treats_missing_as_zero() {
        let batch = BatchResult::collect(vec![
            ("A".to_string(), Ok(snapshot("A", None))),
            ("B".to_string(), Ok(snapshot("B", Some(5.0)))),
            ("C".to_string(), Ok(snapshot("C", Some(0.0)))),
            ("D".to_string(), Ok(snapshot("D", Some(5.0)))),
            ("E".to_string(), Ok(snapshot("E", None))),
        ])
        .ranked_by_market_cap();

        let order: Vec<&str> = batch.results.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["B", "D", "A", "C", "E"]);
    }

    #[test]
    fn test_payload_round_trip_rejects_other_variant() {
        let info = CompanyInfo::from_profile("AAPL", AssetProfile::with_name("Apple Inc.")).unwrap();
        let payload = info.clone().into_payload();
        assert_eq!(CompanyInfo::from_payload(payload.clone()), Some(info));
        assert_eq!(StockPrice::from_payload(payload), None);
    }

    #[test]
    fn test_snapshot_serialization_hides_missing_ratios() {
        let json = serde_json::to_value(snapshot("A", Some(1.0))).unwrap();
        assert!(json.get("pe_ratio").is_none());
        assert!(json.get("market_cap").is_some());
    }
}
