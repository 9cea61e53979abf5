//! Market data models
//!
//! Provider-level data returned by a [`QuoteSource`](crate::provider::QuoteSource):
//! - `quote` - OHLCV bars (Bar)
//! - `range` - history window vocabulary (Period, Interval)
//! - `profile` - company profile and key statistics (AssetProfile)
//! - `fundamentals` - financial statements and analyst trends
//! - `corporate_actions` - dividends and splits

mod corporate_actions;
mod fundamentals;
mod profile;
mod quote;
mod range;

pub use corporate_actions::{Dividend, Split};
pub use fundamentals::{FinancialStatements, RecommendationTrend, Statement};
pub use profile::AssetProfile;
pub use quote::Bar;
pub use range::{Interval, Period, RangeParseError};
