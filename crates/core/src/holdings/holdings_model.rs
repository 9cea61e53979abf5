use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{BSE_QUOTED_SYMBOLS, NSE_EXCHANGES};
use crate::stocks::{CompanyInfo, StockSnapshot};

/// A brokerage position in the shape shared by every holdings source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRow {
    pub exchange: String,
    pub trading_symbol: String,
    pub security_id: String,
    pub available_qty: f64,
    pub total_qty: f64,
    pub isin: String,
    pub avg_cost_price: Option<f64>,
    pub broker_name: String,
}

impl HoldingRow {
    /// A row with every field at its "unknown" default.
    pub fn empty(broker_name: impl Into<String>) -> Self {
        Self {
            exchange: "UNKNOWN".to_string(),
            trading_symbol: "UNKNOWN".to_string(),
            security_id: "NA".to_string(),
            available_qty: 0.0,
            total_qty: 0.0,
            isin: "NA".to_string(),
            avg_cost_price: None,
            broker_name: broker_name.into(),
        }
    }

    /// Ticker used to quote this row.
    pub fn quote_key(&self) -> String {
        quote_key(&self.trading_symbol, &self.exchange)
    }
}

/// `SYM.NS` for NSE listings, `SYM.BO` for everything else and for the few
/// NSE symbols the quote source only carries on the BSE feed.
pub fn quote_key(trading_symbol: &str, exchange: &str) -> String {
    let symbol = trading_symbol.trim().to_uppercase();
    let exchange = exchange.trim().to_uppercase();
    let on_nse = NSE_EXCHANGES.contains(&exchange.as_str())
        && !BSE_QUOTED_SYMBOLS.contains(&symbol.as_str());
    if on_nse {
        format!("{symbol}.NS")
    } else {
        format!("{symbol}.BO")
    }
}

/// A holding joined with its market data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedHolding {
    #[serde(flatten)]
    pub holding: HoldingRow,
    pub quote: String,
    #[serde(serialize_with = "some_or_empty_object")]
    pub price: Option<StockSnapshot>,
    #[serde(serialize_with = "some_or_empty_object")]
    pub info: Option<CompanyInfo>,
}

/// Outcome of one holdings source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerStatus {
    pub name: String,
    pub holdings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedHoldings {
    pub holdings: Vec<EnrichedHolding>,
    pub total_holdings: usize,
    pub brokers: Vec<BrokerStatus>,
}

fn some_or_empty_object<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_key_suffixes() {
        assert_eq!(quote_key("RELIANCE", "NSE"), "RELIANCE.NS");
        assert_eq!(quote_key("tcs", "ALL"), "TCS.NS");
        assert_eq!(quote_key("INDIGRID", "NSE"), "INDIGRID.BO");
        assert_eq!(quote_key("SBIN", "BSE"), "SBIN.BO");
        assert_eq!(quote_key("UNKNOWN", "UNKNOWN"), "UNKNOWN.BO");
    }

    #[test]
    fn test_empty_row_defaults() {
        let row = HoldingRow::empty("dhan");
        assert_eq!(row.exchange, "UNKNOWN");
        assert_eq!(row.total_qty, 0.0);
        assert_eq!(row.avg_cost_price, None);
        assert_eq!(row.quote_key(), "UNKNOWN.BO");
    }

    #[test]
    fn test_unmatched_holding_serializes_empty_objects() {
        let holding = EnrichedHolding {
            quote: "ZZZ.BO".to_string(),
            holding: HoldingRow::empty("shoonya"),
            price: None,
            info: None,
        };
        let value = serde_json::to_value(&holding).unwrap();
        assert_eq!(value["price"], json!({}));
        assert_eq!(value["info"], json!({}));
        assert_eq!(value["tradingSymbol"], "UNKNOWN");
        assert_eq!(value["brokerName"], "shoonya");
        assert_eq!(value["avgCostPrice"], serde_json::Value::Null);
    }
}
