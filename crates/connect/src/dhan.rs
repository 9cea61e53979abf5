//! Dhan holdings source.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use stockdesk_core::holdings::{HoldingRow, HoldingsSourceTrait};

use crate::errors::BrokerError;

pub const DEFAULT_DHAN_URL: &str = "https://api.dhan.co/v2";

const BROKER_NAME: &str = "dhan";

#[derive(Debug, Clone)]
pub struct DhanConfig {
    pub access_token: String,
    pub client_id: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DhanHolding {
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    trading_symbol: Option<String>,
    #[serde(default)]
    security_id: Option<String>,
    #[serde(default)]
    isin: Option<String>,
    #[serde(default)]
    total_qty: Option<f64>,
    #[serde(default)]
    available_qty: Option<f64>,
    #[serde(default)]
    avg_cost_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DhanErrorResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

pub struct DhanSource {
    config: DhanConfig,
    client: Client,
}

impl DhanSource {
    pub fn new(config: DhanConfig) -> Result<Self, BrokerError> {
        if config.access_token.trim().is_empty() {
            return Err(BrokerError::MissingCredentials(
                "Dhan access token is empty".into(),
            ));
        }
        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    async fn holdings(&self) -> Result<Vec<HoldingRow>, BrokerError> {
        let url = format!("{}/holdings", self.config.base_url.trim_end_matches('/'));
        debug!("[Dhan] GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("access-token", &self.config.access_token)
            .header("Accept", "application/json");
        if let Some(client_id) = &self.config.client_id {
            request = request.header("client-id", client_id);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<DhanErrorResponse>(&body)
                .ok()
                .and_then(|e| match (e.error_code, e.error_message) {
                    (Some(code), Some(msg)) => Some(format!("{}: {}", code, msg)),
                    (None, Some(msg)) => Some(msg),
                    (Some(code), None) => Some(code),
                    (None, None) => None,
                })
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(BrokerError::ApiRequestFailed(message));
        }

        let holdings: Vec<DhanHolding> = serde_json::from_str(&body)?;
        Ok(holdings.into_iter().map(to_row).collect())
    }
}

#[async_trait]
impl HoldingsSourceTrait for DhanSource {
    fn broker_name(&self) -> &'static str {
        BROKER_NAME
    }

    async fn fetch_holdings(&self) -> stockdesk_core::Result<Vec<HoldingRow>> {
        Ok(self.holdings().await?)
    }
}

fn to_row(item: DhanHolding) -> HoldingRow {
    let defaults = HoldingRow::empty(BROKER_NAME);
    HoldingRow {
        exchange: item.exchange.unwrap_or(defaults.exchange),
        trading_symbol: item.trading_symbol.unwrap_or(defaults.trading_symbol),
        security_id: item.security_id.unwrap_or(defaults.security_id),
        available_qty: item.available_qty.unwrap_or(defaults.available_qty),
        total_qty: item.total_qty.unwrap_or(defaults.total_qty),
        isin: item.isin.unwrap_or(defaults.isin),
        avg_cost_price: item.avg_cost_price,
        broker_name: defaults.broker_name,
    }
}
