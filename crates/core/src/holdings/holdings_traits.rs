use async_trait::async_trait;

use super::holdings_model::{EnrichedHoldings, HoldingRow};
use crate::errors::Result;

/// A brokerage account that can list its positions.
#[async_trait]
pub trait HoldingsSourceTrait: Send + Sync {
    /// Lowercase broker identifier, also used as `brokerName` on each row.
    fn broker_name(&self) -> &'static str;

    async fn fetch_holdings(&self) -> Result<Vec<HoldingRow>>;
}

/// Trait for holdings enrichment operations
#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    async fn get_enriched_holdings(&self) -> EnrichedHoldings;
}
