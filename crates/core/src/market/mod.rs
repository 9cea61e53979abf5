//! Market module - trending board, index levels and reference search.

mod market_model;
mod market_service;
mod market_traits;


pub use market_model::{IndexQuote, MarketIndices, MarketOverview, StockLookup, TrendingStocks};
pub use market_service::MarketService;
pub use market_traits::MarketServiceTrait;
