#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use stockdesk_core::{
    holdings::HoldingsSourceTrait,
    reference::{ReferenceEntry, ReferenceTable},
    ServiceSettings,
};
use stockdesk_market_data::{
    AssetProfile, Bar, Dividend, FinancialStatements, Interval, MarketDataError, Period,
    QuoteSource, RecommendationTrend, Split,
};
use stockdesk_server::{api::app_router, assemble_state, auth::AuthManager, config::Config};
use tower::ServiceExt;

/// Quote source answering from fixed tables.
#[derive(Default)]
pub struct StaticQuotes {
    profiles: HashMap<String, AssetProfile>,
    closes: HashMap<String, Vec<f64>>,
    delay: Option<Duration>,
}

impl StaticQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock(mut self, symbol: &str, name: &str, market_cap: f64, closes: &[f64]) -> Self {
        self.profiles.insert(
            symbol.to_string(),
            AssetProfile::with_name(name)
                .sector("Technology")
                .market_cap(market_cap),
        );
        self.closes.insert(symbol.to_string(), closes.to_vec());
        self
    }

    /// Sleep before answering profile and history calls.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn pause(&self) {
        if let Some(delay) = self.delay {
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

impl QuoteSource for StaticQuotes {
    fn id(&self) -> &'static str {
        "STATIC"
    }

    fn profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        self.pause();
        self.known(symbol)?;
        Ok(self.profiles[symbol].clone())
    }

    fn history(
        &self,
        symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<Vec<Bar>, MarketDataError> {
        self.pause();
        self.known(symbol)?;
        Ok(self.closes[symbol]
            .iter()
            .enumerate()
            .map(|(i, close)| {
                Bar::flat(
                    Utc.with_ymd_and_hms(2024, 3, 1 + i as u32, 0, 0, 0).unwrap(),
                    *close,
                    1_000,
                )
            })
            .collect())
    }

    fn financials(&self, symbol: &str) -> Result<FinancialStatements, MarketDataError> {
        self.known(symbol)?;
        Ok(FinancialStatements::default())
    }

    fn dividends(&self, symbol: &str) -> Result<Vec<Dividend>, MarketDataError> {
        self.known(symbol)?;
        Ok(Vec::new())
    }

    fn splits(&self, symbol: &str) -> Result<Vec<Split>, MarketDataError> {
        self.known(symbol)?;
        Ok(Vec::new())
    }

    fn recommendations(&self, symbol: &str) -> Result<Vec<RecommendationTrend>, MarketDataError> {
        self.known(symbol)?;
        Ok(Vec::new())
    }
}

pub fn sample_quotes() -> StaticQuotes {
    StaticQuotes::new()
        .with_stock("AAPL", "Apple Inc.", 3.0e12, &[185.92, 187.44])
        .with_stock("MSFT", "Microsoft Corporation", 3.1e12, &[410.0, 415.5])
        .with_stock("RELIANCE.NS", "Reliance Industries Limited", 2.0e13, &[2900.0, 2950.0])
}

pub fn sample_reference() -> ReferenceTable {
    ReferenceTable::from_entries(vec![ReferenceEntry {
        company: "Reliance Industries Limited".to_string(),
        ticker: "RELIANCE.NS".to_string(),
    }])
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        max_workers: 4,
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(60),
    }
}

pub fn build_router(
    holdings_sources: Vec<Arc<dyn HoldingsSourceTrait>>,
    auth: Option<Arc<AuthManager>>,
) -> Router {
    let state = assemble_state(
        Arc::new(sample_quotes()),
        holdings_sources,
        sample_reference(),
        &test_settings(),
        auth,
    );
    app_router(state, &Config::default())
}

/// Router over the given quotes with a custom server config and no auth.
pub fn build_router_with(quotes: StaticQuotes, config: &Config) -> Router {
    let state = assemble_state(
        Arc::new(quotes),
        Vec::new(),
        sample_reference(),
        &test_settings(),
        None,
    );
    app_router(state, config)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, HeaderMap, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
