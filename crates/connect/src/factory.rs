use std::sync::Arc;

use log::{info, warn};
use stockdesk_core::holdings::HoldingsSourceTrait;

use crate::dhan::{DhanConfig, DhanSource};
use crate::shoonya::{ShoonyaConfig, ShoonyaSource};

/// Credentials for every brokerage the server may query.
#[derive(Debug, Clone, Default)]
pub struct BrokerCredentials {
    pub shoonya: Option<ShoonyaConfig>,
    pub dhan: Option<DhanConfig>,
}

pub struct HoldingsSourceFactory;

impl HoldingsSourceFactory {
    /// Build a source for each configured brokerage. Sources whose
    /// credentials are rejected up front are skipped with a warning.
    pub fn from_credentials(credentials: BrokerCredentials) -> Vec<Arc<dyn HoldingsSourceTrait>> {
        let mut sources: Vec<Arc<dyn HoldingsSourceTrait>> = Vec::new();

        if let Some(config) = credentials.shoonya {
            match ShoonyaSource::new(config) {
                Ok(source) => sources.push(Arc::new(source)),
                Err(e) => warn!("Shoonya holdings source disabled: {}", e),
            }
        }
        if let Some(config) = credentials.dhan {
            match DhanSource::new(config) {
                Ok(source) => sources.push(Arc::new(source)),
                Err(e) => warn!("Dhan holdings source disabled: {}", e),
            }
        }

        info!("{} holdings source(s) configured", sources.len());
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dhan::DEFAULT_DHAN_URL;

    #[test]
    fn test_no_credentials_no_sources() {
        assert!(HoldingsSourceFactory::from_credentials(BrokerCredentials::default()).is_empty());
    }

    #[test]
    fn test_invalid_credentials_are_skipped() {
        let credentials = BrokerCredentials {
            shoonya: None,
            dhan: Some(DhanConfig {
                access_token: String::new(),
                client_id: None,
                base_url: DEFAULT_DHAN_URL.into(),
            }),
        };
        assert!(HoldingsSourceFactory::from_credentials(credentials).is_empty());

        let credentials = BrokerCredentials {
            shoonya: None,
            dhan: Some(DhanConfig {
                access_token: "token".into(),
                client_id: None,
                base_url: DEFAULT_DHAN_URL.into(),
            }),
        };
        let sources = HoldingsSourceFactory::from_credentials(credentials);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].broker_name(), "dhan");
    }
}
