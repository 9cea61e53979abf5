//! Stockdesk Market Data Crate
//!
//! Single-symbol access to a third-party market data provider.
//!
//! # Overview
//!
//! A [`QuoteSource`] answers one question about one symbol per call (profile,
//! price history, statements, dividends, splits, analyst trends) and blocks
//! until the provider responds. Provider failures come back as a typed
//! [`MarketDataError`] so callers can tell an unknown symbol apart from an
//! empty window or a transport failure.
//!
//! Concurrency, caching and timeouts are the caller's business; see the
//! `stockdesk-core` crate.
//!
//! # Core Types
//!
//! - [`QuoteSource`] - Blocking provider contract
//! - [`YahooProvider`] - Yahoo Finance implementation
//! - [`AssetProfile`] - Company profile and key statistics
//! - [`Bar`] - OHLCV history row
//! - [`Period`] / [`Interval`] - History window vocabulary

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{
    AssetProfile, Bar, Dividend, FinancialStatements, Interval, Period, RangeParseError,
    RecommendationTrend, Split, Statement,
};
pub use provider::yahoo::YahooProvider;
pub use provider::QuoteSource;
