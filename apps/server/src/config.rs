use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use stockdesk_connect::{
    BrokerCredentials, DhanConfig, ShoonyaConfig, DEFAULT_DHAN_URL, DEFAULT_SHOONYA_URL,
};
use stockdesk_core::{
    constants::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECONDS},
    ServiceSettings,
};

use crate::auth::{AzureAuthConfig, DEFAULT_AUTHORITY_URL, DEFAULT_SCOPE};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub service: ServiceSettings,
    /// Path or http(s) URL of the company reference CSV
    pub reference_csv: Option<String>,
    pub auth: Option<AzureAuthConfig>,
    pub brokers: BrokerCredentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(60_000),
            service: ServiceSettings::default(),
            reference_csv: None,
            auth: None,
            brokers: BrokerCredentials::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |key: &str, default: u64| {
            var(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };

        let listen_addr: SocketAddr = var("SD_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string())
            .parse()
            .context("Invalid SD_LISTEN_ADDR")?;
        let cors_allow = var("SD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let service = ServiceSettings {
            max_workers: number("SD_MAX_WORKERS", DEFAULT_MAX_WORKERS as u64) as usize,
            timeout: Duration::from_secs(number("SD_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)),
            cache_ttl: Duration::from_secs(number("SD_CACHE_TIMEOUT", DEFAULT_CACHE_TTL_SECONDS)),
        };

        let auth = match (
            var("SD_AUTH_TENANT_ID"),
            var("SD_AUTH_CLIENT_ID"),
            var("SD_AUTH_CLIENT_SECRET"),
        ) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Some(AzureAuthConfig {
                tenant_id,
                client_id,
                client_secret,
                scope: var("SD_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
                authority_url: var("SD_AUTH_AUTHORITY_URL")
                    .unwrap_or_else(|| DEFAULT_AUTHORITY_URL.to_string()),
            }),
            _ => None,
        };

        let shoonya = match (var("SD_SHOONYA_USER"), var("SD_SHOONYA_PASSWORD")) {
            (Some(user_id), Some(password)) => Some(ShoonyaConfig {
                user_id,
                password,
                totp_secret: var("SD_SHOONYA_TOTP_SECRET").unwrap_or_default(),
                vendor_code: var("SD_SHOONYA_VENDOR_CODE").unwrap_or_default(),
                api_key: var("SD_SHOONYA_API_KEY").unwrap_or_default(),
                imei: var("SD_SHOONYA_IMEI").unwrap_or_default(),
                base_url: var("SD_SHOONYA_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SHOONYA_URL.to_string()),
            }),
            _ => None,
        };
        let dhan = var("SD_DHAN_ACCESS_TOKEN").map(|access_token| DhanConfig {
            access_token,
            client_id: var("SD_DHAN_CLIENT_ID"),
            base_url: var("SD_DHAN_BASE_URL").unwrap_or_else(|| DEFAULT_DHAN_URL.to_string()),
        });

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(number("SD_REQUEST_TIMEOUT_MS", 60_000)),
            service,
            reference_csv: var("SD_REFERENCE_CSV"),
            auth,
            brokers: BrokerCredentials { shoonya, dhan },
        })
    }
}
