use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{info, warn};

use super::holdings_model::{BrokerStatus, EnrichedHolding, EnrichedHoldings, HoldingRow};
use super::holdings_traits::{HoldingsServiceTrait, HoldingsSourceTrait};
use crate::stocks::StockServiceTrait;

/// Merges brokerage positions with batch price and company info results.
pub struct HoldingsService {
    sources: Vec<Arc<dyn HoldingsSourceTrait>>,
    stocks: Arc<dyn StockServiceTrait>,
}

impl HoldingsService {
    pub fn new(
        sources: Vec<Arc<dyn HoldingsSourceTrait>>,
        stocks: Arc<dyn StockServiceTrait>,
    ) -> Self {
        Self { sources, stocks }
    }

    /// Query every source concurrently. A failing source is reported in its
    /// status and contributes no rows.
    async fn collect_rows(&self) -> (Vec<HoldingRow>, Vec<BrokerStatus>) {
        let fetched = join_all(self.sources.iter().map(|source| async move {
            (source.broker_name(), source.fetch_holdings().await)
        }))
        .await;

        let mut rows = Vec::new();
        let mut brokers = Vec::with_capacity(fetched.len());
        for (name, outcome) in fetched {
            match outcome {
                Ok(mut batch) => {
                    brokers.push(BrokerStatus {
                        name: name.to_string(),
                        holdings: batch.len(),
                        error: None,
                    });
                    rows.append(&mut batch);
                }
                Err(e) => {
                    warn!("Holdings source {} failed: {}", name, e);
                    brokers.push(BrokerStatus {
                        name: name.to_string(),
                        holdings: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }
        (rows, brokers)
    }
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    async fn get_enriched_holdings(&self) -> EnrichedHoldings {
        let (rows, brokers) = self.collect_rows().await;

        let keyed: Vec<(String, HoldingRow)> =
            rows.into_iter().map(|row| (row.quote_key(), row)).collect();

        let mut seen = HashSet::new();
        let quotes: Vec<String> = keyed
            .iter()
            .filter(|(quote, _)| seen.insert(quote.clone()))
            .map(|(quote, _)| quote.clone())
            .collect();

        let (prices, infos) = if quotes.is_empty() {
            (HashMap::new(), HashMap::new())
        } else {
            let (prices, infos) = tokio::join!(
                self.stocks.get_multiple_stocks(&quotes),
                self.stocks.get_multiple_company_info(&quotes)
            );
            (
                prices
                    .results
                    .into_iter()
                    .map(|s| (s.symbol.clone(), s))
                    .collect::<HashMap<_, _>>(),
                infos
                    .results
                    .into_iter()
                    .map(|i| (i.symbol.clone(), i))
                    .collect::<HashMap<_, _>>(),
            )
        };

        let holdings: Vec<EnrichedHolding> = keyed
            .into_iter()
            .map(|(quote, holding)| EnrichedHolding {
                price: prices.get(&quote).cloned(),
                info: infos.get(&quote).cloned(),
                quote,
                holding,
            })
            .collect();

        info!(
            "Enriched {} holdings across {} quotes",
            holdings.len(),
            quotes.len()
        );

        EnrichedHoldings {
            total_holdings: holdings.len(),
            holdings,
            brokers,
        }
    }
}
