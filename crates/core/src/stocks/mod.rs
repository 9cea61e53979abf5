//! Stocks module - per-symbol aggregation, batch fan-out and search.

mod search;
mod stocks_model;
mod stocks_service;
mod stocks_traits;


pub use search::{score, search_universe};
pub use stocks_model::{
    BatchFailure, BatchResult, Cacheable, CachedPayload, CompanyInfo, DataKind, DividendEntry,
    DividendHistory, Financials, HistoricalData, HistoryPoint, MarketCapRanked, Recommendations,
    SearchHit, SearchResults, SplitEntry, SplitHistory, StockPrice, StockSnapshot,
};
pub use stocks_service::StockService;
pub use stocks_traits::StockServiceTrait;
