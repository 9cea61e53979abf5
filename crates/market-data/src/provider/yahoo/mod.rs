//! Yahoo Finance quote source.
//!
//! Price history, dividends and splits come from the chart API through
//! `yahoo_finance_api`. Profiles, statements and analyst trends come from the
//! quoteSummary API, which requires a cookie/crumb pair.
//!
//! The provider is asynchronous internally and exposes the blocking
//! [`QuoteSource`] contract by driving each request on a captured runtime
//! handle. Call it from a blocking thread only.

mod models;

use std::future::Future;
use std::sync::RwLock;

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use reqwest::{header, StatusCode};
use tokio::runtime::Handle;
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{
    AssetProfile, Bar, Dividend, FinancialStatements, Interval, Period, RecommendationTrend, Split,
    Statement,
};
use crate::provider::QuoteSource;

use models::{raw, YahooQuoteSummaryResponse, YahooQuoteSummaryResult, YahooStatementEntry};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

const PROFILE_MODULES: &[&str] = &[
    "price",
    "summaryProfile",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
];

const FINANCIAL_MODULES: &[&str] = &[
    "incomeStatementHistory",
    "incomeStatementHistoryQuarterly",
    "balanceSheetHistory",
    "cashflowStatementHistory",
];

const RECOMMENDATION_MODULES: &[&str] = &["recommendationTrend"];

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote source.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
    crumb: RwLock<Option<CrumbData>>,
    runtime: Handle,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider that drives its requests on `runtime`.
    pub fn new(runtime: Handle) -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            connector,
            client,
            crumb: RwLock::new(None),
            runtime,
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = self.crumb.read().unwrap_or_else(|poisoned| {
                warn!("Yahoo crumb lock poisoned, recovering");
                poisoned.into_inner()
            });
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = self.crumb.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = self.crumb.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }

    // ========================================================================
    // quoteSummary API
    // ========================================================================

    async fn fetch_summary(
        &self,
        symbol: &str,
        modules: &[&str],
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}/{}?modules={}&crumb={}",
            QUOTE_SUMMARY_URL,
            encode(symbol),
            modules.join(","),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(MarketDataError::provider(
                    PROVIDER_ID,
                    "Yahoo authentication expired",
                ));
            }
            StatusCode::NOT_FOUND => return Err(MarketDataError::InvalidSymbol(symbol.to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(MarketDataError::provider(
                    PROVIDER_ID,
                    format!("quoteSummary returned HTTP {}", status),
                ))
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to parse quoteSummary response: {}", e),
            )
        })?;

        if let Some(error) = data.quote_summary.error {
            return match error.code.as_deref() {
                Some("Not Found") => Err(MarketDataError::InvalidSymbol(symbol.to_string())),
                _ => Err(MarketDataError::provider(
                    PROVIDER_ID,
                    error
                        .description
                        .unwrap_or_else(|| "Unknown quoteSummary error".to_string()),
                )),
            };
        }

        data.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::InvalidSymbol(symbol.to_string()))
    }

    // ========================================================================
    // Chart API
    // ========================================================================

    async fn fetch_chart(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<yahoo::YResponse, MarketDataError> {
        self.connector
            .get_quote_range(symbol, interval, range)
            .await
            .map_err(|e| map_chart_error(symbol, e))
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError> {
        let response = self
            .fetch_chart(symbol, interval.as_str(), period.as_str())
            .await?;

        let quotes = response.quotes().map_err(|e| map_chart_error(symbol, e))?;
        let bars: Vec<Bar> = quotes.into_iter().filter_map(to_bar).collect();

        if bars.is_empty() {
            warn!(
                "No history returned for '{}' (period={}, interval={})",
                symbol, period, interval
            );
            return Err(MarketDataError::NoData(symbol.to_string()));
        }

        Ok(bars)
    }

    async fn fetch_dividends(&self, symbol: &str) -> Result<Vec<Dividend>, MarketDataError> {
        let response = self.fetch_chart(symbol, "1mo", "max").await?;
        let mut dividends: Vec<Dividend> = response
            .dividends()
            .map_err(|e| map_chart_error(symbol, e))?
            .into_iter()
            .filter_map(|d| {
                Some(Dividend {
                    date: from_epoch(d.date as i64)?,
                    amount: d.amount as f64,
                })
            })
            .collect();
        dividends.sort_by_key(|d| d.date);
        Ok(dividends)
    }

    async fn fetch_splits(&self, symbol: &str) -> Result<Vec<Split>, MarketDataError> {
        let response = self.fetch_chart(symbol, "1mo", "max").await?;
        let mut splits: Vec<Split> = response
            .splits()
            .map_err(|e| map_chart_error(symbol, e))?
            .into_iter()
            .filter_map(|s| {
                Some(Split {
                    date: from_epoch(s.date as i64)?,
                    numerator: s.numerator as f64,
                    denominator: s.denominator as f64,
                })
            })
            .collect();
        splits.sort_by_key(|s| s.date);
        Ok(splits)
    }
}

// ============================================================================
// QuoteSource Implementation
// ============================================================================

impl QuoteSource for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        debug!("Fetching profile for {} from Yahoo", symbol);
        let result = self.block_on(self.fetch_summary(symbol, PROFILE_MODULES))?;
        Ok(map_profile(&result))
    }

    fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError> {
        debug!(
            "Fetching {} history for {} at {} from Yahoo",
            period, symbol, interval
        );
        self.block_on(self.fetch_history(symbol, period, interval))
    }

    fn financials(&self, symbol: &str) -> Result<FinancialStatements, MarketDataError> {
        debug!("Fetching financials for {} from Yahoo", symbol);
        let result = self.block_on(self.fetch_summary(symbol, FINANCIAL_MODULES))?;
        Ok(map_financials(&result))
    }

    fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>, MarketDataError> {
        debug!("Fetching dividends for {} from Yahoo", symbol);
        self.block_on(self.fetch_dividends(symbol))
    }

    fn splits(&self, symbol: &str) -> Result<Vec<Split>, MarketDataError> {
        debug!("Fetching splits for {} from Yahoo", symbol);
        self.block_on(self.fetch_splits(symbol))
    }

    fn recommendations(&self, symbol: &str) -> Result<Vec<RecommendationTrend>, MarketDataError> {
        debug!("Fetching recommendations for {} from Yahoo", symbol);
        let result = self.block_on(self.fetch_summary(symbol, RECOMMENDATION_MODULES))?;
        Ok(map_recommendations(result))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn map_chart_error(symbol: &str, error: yahoo::YahooError) -> MarketDataError {
    match error {
        yahoo::YahooError::NoQuotes => MarketDataError::NoData(symbol.to_string()),
        yahoo::YahooError::NoResult => MarketDataError::InvalidSymbol(symbol.to_string()),
        other => {
            let message = other.to_string();
            if message.contains("Not Found") || message.contains("delisted") {
                MarketDataError::InvalidSymbol(symbol.to_string())
            } else {
                MarketDataError::provider(PROVIDER_ID, message)
            }
        }
    }
}

fn from_epoch(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

fn to_bar(quote: yahoo::Quote) -> Option<Bar> {
    if !quote.close.is_finite() {
        return None;
    }
    Some(Bar {
        timestamp: from_epoch(quote.timestamp as i64)?,
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        volume: quote.volume,
    })
}

fn map_profile(result: &YahooQuoteSummaryResult) -> AssetProfile {
    let price = result.price.as_ref();
    let summary = result.summary_profile.as_ref();
    let detail = result.summary_detail.as_ref();
    let stats = result.default_key_statistics.as_ref();
    let financial = result.financial_data.as_ref();

    AssetProfile {
        source: Some(PROVIDER_ID.to_string()),
        long_name: price.and_then(|p| p.long_name.as_deref()).map(clean_name),
        short_name: price.and_then(|p| p.short_name.as_deref()).map(clean_name),
        sector: summary
            .and_then(|s| s.sector.as_deref())
            .map(format_sector),
        industry: summary.and_then(|s| s.industry.clone()),
        country: summary.and_then(|s| s.country.clone()),
        website: summary.and_then(|s| s.website.clone()),
        description: summary.and_then(|s| s.long_business_summary.clone()),
        employees: summary.and_then(|s| s.full_time_employees),
        market_cap: detail
            .and_then(|d| raw(&d.market_cap))
            .or_else(|| price.and_then(|p| raw(&p.market_cap))),
        volume: detail
            .and_then(|d| raw(&d.volume))
            .or_else(|| price.and_then(|p| raw(&p.regular_market_volume)))
            .map(|v| v.max(0.0) as u64),
        day_high: detail
            .and_then(|d| raw(&d.day_high))
            .or_else(|| price.and_then(|p| raw(&p.regular_market_day_high))),
        day_low: detail
            .and_then(|d| raw(&d.day_low))
            .or_else(|| price.and_then(|p| raw(&p.regular_market_day_low))),
        week_52_high: detail.and_then(|d| raw(&d.fifty_two_week_high)),
        week_52_low: detail.and_then(|d| raw(&d.fifty_two_week_low)),
        pe_ratio: detail.and_then(|d| raw(&d.trailing_pe)),
        beta: detail
            .and_then(|d| raw(&d.beta))
            .or_else(|| stats.and_then(|s| raw(&s.beta))),
        dividend_yield: detail.and_then(|d| raw(&d.dividend_yield)),
        revenue: financial.and_then(|f| raw(&f.total_revenue)),
        profit_margin: financial.and_then(|f| raw(&f.profit_margins)),
        book_value: stats.and_then(|s| raw(&s.book_value)),
        price_to_book: stats.and_then(|s| raw(&s.price_to_book)),
        quick_ratio: financial.and_then(|f| raw(&f.quick_ratio)),
        debt_to_equity: financial.and_then(|f| raw(&f.debt_to_equity)),
    }
}

fn map_financials(result: &YahooQuoteSummaryResult) -> FinancialStatements {
    FinancialStatements {
        quarterly_income: result
            .income_statement_history_quarterly
            .as_ref()
            .map(|h| collect_statement(&h.income_statement_history))
            .unwrap_or_default(),
        yearly_income: result
            .income_statement_history
            .as_ref()
            .map(|h| collect_statement(&h.income_statement_history))
            .unwrap_or_default(),
        balance_sheet: result
            .balance_sheet_history
            .as_ref()
            .map(|h| collect_statement(&h.balance_sheet_statements))
            .unwrap_or_default(),
        cash_flow: result
            .cashflow_statement_history
            .as_ref()
            .map(|h| collect_statement(&h.cashflow_statements))
            .unwrap_or_default(),
    }
}

/// Pivot period rows into line item -> period -> value.
fn collect_statement(entries: &[YahooStatementEntry]) -> Statement {
    let mut statement = Statement::new();
    for entry in entries {
        let Some(date) = entry.end_date.as_ref().and_then(|d| {
            d.fmt
                .clone()
                .or_else(|| d.raw.and_then(from_epoch).map(|t| t.format("%Y-%m-%d").to_string()))
        }) else {
            continue;
        };

        for (item, value) in &entry.items {
            if let Some(raw_value) = value.get("raw").and_then(|v| v.as_f64()) {
                statement
                    .entry(item.clone())
                    .or_default()
                    .insert(date.clone(), raw_value);
            }
        }
    }
    statement
}

fn map_recommendations(result: YahooQuoteSummaryResult) -> Vec<RecommendationTrend> {
    result
        .recommendation_trend
        .map(|t| t.trend)
        .unwrap_or_default()
        .into_iter()
        .map(|t| RecommendationTrend {
            period: t.period,
            strong_buy: t.strong_buy,
            buy: t.buy,
            hold: t.hold,
            sell: t.sell,
            strong_sell: t.strong_sell,
        })
        .collect()
}

fn clean_name(name: &str) -> String {
    name.replace("&amp;", "&").trim().to_string()
}

/// Convert snake_case sector to Title Case.
fn format_sector(sector: &str) -> String {
    sector
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================
