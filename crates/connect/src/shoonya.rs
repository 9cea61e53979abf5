//! Shoonya (Finvasia) holdings source over the Noren REST API.
//!
//! Every call is a POST whose body is `jData=<json>`, plus `&jKey=<token>`
//! once logged in. Numeric fields come back as strings.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use stockdesk_core::holdings::{HoldingRow, HoldingsSourceTrait};

use crate::errors::BrokerError;
use crate::totp::totp_now;

pub const DEFAULT_SHOONYA_URL: &str = "https://api.shoonya.com/NorenWClientTP";

const BROKER_NAME: &str = "shoonya";

#[derive(Debug, Clone)]
pub struct ShoonyaConfig {
    pub user_id: String,
    pub password: String,
    pub totp_secret: String,
    pub vendor_code: String,
    pub api_key: String,
    pub imei: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    stat: String,
    #[serde(default)]
    susertoken: Option<String>,
    #[serde(default)]
    actid: Option<String>,
    #[serde(default)]
    emsg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    emsg: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HoldingsResponse {
    Rows(Vec<ShoonyaHolding>),
    Status(StatusResponse),
}

#[derive(Debug, Deserialize)]
struct ShoonyaHolding {
    #[serde(default)]
    exch_tsym: Vec<ExchangeListing>,
    #[serde(default)]
    npoadqty: Option<Value>,
    #[serde(default)]
    upldprc: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ExchangeListing {
    #[serde(default)]
    exch: Option<String>,
    #[serde(default)]
    tsym: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    isin: Option<String>,
}

#[derive(Debug)]
struct Session {
    token: String,
    account_id: String,
}

pub struct ShoonyaSource {
    config: ShoonyaConfig,
    client: Client,
}

impl ShoonyaSource {
    pub fn new(config: ShoonyaConfig) -> Result<Self, BrokerError> {
        if config.user_id.trim().is_empty() || config.password.is_empty() {
            return Err(BrokerError::MissingCredentials(
                "Shoonya user id and password are required".into(),
            ));
        }
        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    async fn post(&self, endpoint: &str, body: String) -> Result<String, BrokerError> {
        let url = self.url(endpoint);
        debug!("[Shoonya] POST {}", url);
        let resp = self.client.post(&url).body(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(BrokerError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }
        Ok(text)
    }

    async fn login(&self) -> Result<Session, BrokerError> {
        let factor2 = totp_now(&self.config.totp_secret)?;
        let payload = json!({
            "source": "API",
            "apkversion": "1.0.0",
            "uid": self.config.user_id,
            "pwd": sha256_hex(&self.config.password),
            "factor2": factor2,
            "vc": self.config.vendor_code,
            "appkey": sha256_hex(&format!("{}|{}", self.config.user_id, self.config.api_key)),
            "imei": self.config.imei,
        });

        let body = self.post("QuickAuth", format!("jData={}", payload)).await?;
        let login: LoginResponse = serde_json::from_str(&body)?;
        if login.stat != "Ok" {
            return Err(BrokerError::AuthenticationFailed(
                login.emsg.unwrap_or_else(|| "login rejected".to_string()),
            ));
        }
        let token = login.susertoken.ok_or_else(|| {
            BrokerError::InvalidApiResponse("login response has no session token".into())
        })?;
        info!("[Shoonya] Logged in as {}", self.config.user_id);
        Ok(Session {
            token,
            account_id: login
                .actid
                .unwrap_or_else(|| self.config.user_id.clone()),
        })
    }

    async fn holdings(&self) -> Result<Vec<HoldingRow>, BrokerError> {
        let session = self.login().await?;
        let payload = json!({
            "uid": self.config.user_id,
            "actid": session.account_id,
            "prd": "C",
        });
        let body = self
            .post(
                "Holdings",
                format!("jData={}&jKey={}", payload, session.token),
            )
            .await?;

        match serde_json::from_str::<HoldingsResponse>(&body)? {
            HoldingsResponse::Rows(rows) => Ok(rows.into_iter().map(to_row).collect()),
            // An account without positions answers Not_Ok / "no data"
            HoldingsResponse::Status(status) => match status.emsg {
                Some(msg) if msg.to_lowercase().contains("no data") => Ok(Vec::new()),
                Some(msg) => Err(BrokerError::ApiRequestFailed(msg)),
                None => Err(BrokerError::InvalidApiResponse(
                    "unexpected holdings response".into(),
                )),
            },
        }
    }
}

#[async_trait]
impl HoldingsSourceTrait for ShoonyaSource {
    fn broker_name(&self) -> &'static str {
        BROKER_NAME
    }

    async fn fetch_holdings(&self) -> stockdesk_core::Result<Vec<HoldingRow>> {
        Ok(self.holdings().await?)
    }
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

fn number(value: &Option<Value>) -> Option<f64> {
    match value.as_ref()? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_row(item: ShoonyaHolding) -> HoldingRow {
    let mut row = HoldingRow::empty(BROKER_NAME);
    let qty = number(&item.npoadqty).unwrap_or(0.0);
    row.available_qty = qty;
    row.total_qty = qty;
    row.avg_cost_price = number(&item.upldprc);

    if let Some(listing) = item.exch_tsym.into_iter().next() {
        if let Some(exch) = listing.exch {
            row.exchange = exch;
        }
        if let Some(tsym) = listing.tsym {
            // "RELIANCE-EQ" -> "RELIANCE"
            row.trading_symbol = tsym.split('-').next().unwrap_or_default().to_string();
        }
        if let Some(token) = listing.token {
            row.security_id = token;
        }
        if let Some(isin) = listing.isin {
            row.isin = isin;
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_mapping_uses_first_listing() {
        let item: ShoonyaHolding = serde_json::from_value(json!({
            "exch_tsym": [
                {"exch": "NSE", "tsym": "RELIANCE-EQ", "token": "2885", "isin": "INE002A01018"},
                {"exch": "BSE", "tsym": "RELIANCE", "token": "500325", "isin": "INE002A01018"}
            ],
            "holdqty": "12",
            "npoadqty": "10",
            "upldprc": "2450.75"
        }))
        .unwrap();

        let row = to_row(item);
        assert_eq!(row.exchange, "NSE");
        assert_eq!(row.trading_symbol, "RELIANCE");
        assert_eq!(row.security_id, "2885");
        assert_eq!(row.isin, "INE002A01018");
        assert_eq!(row.total_qty, 10.0);
        assert_eq!(row.available_qty, 10.0);
        assert_eq!(row.avg_cost_price, Some(2450.75));
        assert_eq!(row.broker_name, "shoonya");
        assert_eq!(row.quote_key(), "RELIANCE.NS");
    }

    #[test]
    fn test_row_mapping_defaults_missing_fields() {
        let item: ShoonyaHolding = serde_json::from_value(json!({})).unwrap();
        let row = to_row(item);
        assert_eq!(row, HoldingRow::empty("shoonya"));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_credentials() {
        let config = ShoonyaConfig {
            user_id: " ".into(),
            password: String::new(),
            totp_secret: String::new(),
            vendor_code: String::new(),
            api_key: String::new(),
            imei: String::new(),
            base_url: DEFAULT_SHOONYA_URL.into(),
        };
        assert!(matches!(
            ShoonyaSource::new(config),
            Err(BrokerError::MissingCredentials(_))
        ));
    }
}
