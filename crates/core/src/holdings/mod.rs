//! Holdings module - brokerage positions joined with market data.

mod holdings_model;
mod holdings_service;
mod holdings_traits;


pub use holdings_model::{quote_key, BrokerStatus, EnrichedHolding, EnrichedHoldings, HoldingRow};
pub use holdings_service::HoldingsService;
pub use holdings_traits::{HoldingsServiceTrait, HoldingsSourceTrait};
